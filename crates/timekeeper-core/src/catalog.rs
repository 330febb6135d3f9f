//! Static puzzle catalog and canonical solve ordering.
//!
//! Every puzzle is a tagged definition: an act, display text, an optional
//! gate, and a requirement. Requirements fall into two families --
//! deterministic shapes over the displayed time, and checks that need
//! telemetry beyond the clock. The engine dispatches over these variants
//! exhaustively; there are no string comparisons anywhere in evaluation.
//!
//! Each act carries a strict total order of puzzle ids. At most one puzzle
//! per act is active at any time: the first id in the current act's order
//! not yet solved.

use timekeeper_types::{Act, ClockReading, PuzzleId};

// ---------------------------------------------------------------------------
// Predicate thresholds
// ---------------------------------------------------------------------------

/// `mini_paradox`: offset magnitude must stay under one minute.
pub const SMALL_OFFSET_MS: u64 = 60_000;

/// `split`: authority and real clocks within one second.
pub const NEAR_ZERO_OFFSET_MS: u64 = 1_000;

/// `alignment`: authority and real clocks within half a second.
pub const EXACT_OFFSET_MS: u64 = 500;

/// `let_go`: hands off the controls for ten seconds.
pub const LET_GO_IDLE_MS: u64 = 10_000;

/// `departure`: a full minute of stillness.
pub const DEPARTURE_IDLE_MS: u64 = 60_000;

/// `attunement`: the dial must pass this value.
pub const ATTUNEMENT_SIGNAL: u8 = 80;

/// `fractured_moments`: solves above this many cumulative adjustments.
pub const FRACTURE_CHEAT_COUNT: u32 = 20;

/// `fractured_moments` is not even considered below this usage level.
pub const FRACTURE_GATE_CHEAT_COUNT: u32 = 10;

/// `destruction`: hour-adjustments required inside the trailing window.
pub const DESTRUCTION_RAPID_CLICKS: u32 = 10;

/// `echo_of_the_hour`: same-act solves required before the secret opens.
pub const ECHO_GATE_ACT1_SOLVES: usize = 3;

// ---------------------------------------------------------------------------
// Evaluation context
// ---------------------------------------------------------------------------

/// Everything beyond the clock reading that a gate or requirement may
/// consult, assembled by the session once per evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalContext {
    /// Player-applied offset of authority time, in milliseconds.
    pub offset_ms: i64,
    /// Milliseconds since the last qualifying interaction.
    pub idle_ms: u64,
    /// Hour-adjustments within the trailing five-second window.
    pub rapid_clicks: u32,
    /// Current dial value (0-100).
    pub signal_strength: u8,
    /// Cumulative manual adjustments.
    pub cheat_count: u32,
    /// Transiently true while a backward adjustment is handled.
    pub moved_backward: bool,
    /// Sticky: the player adjusted the clock during act 1.
    pub has_cheated_in_act1: bool,
    /// Sticky: the player adjusted the clock during act 2.
    pub has_cheated_in_act2: bool,
    /// How many act-1 puzzles are already solved.
    pub act1_solves: usize,
}

// ---------------------------------------------------------------------------
// Requirements
// ---------------------------------------------------------------------------

/// A deterministic predicate over the displayed hour/minute/second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeShape {
    /// `hour + minute == n`.
    HourPlusMinute(u32),
    /// `second` is a multiple of `n` (00, 11, 22, ... for n = 11).
    SecondMultipleOf(u32),
    /// The minute is odd.
    MinuteOdd,
    /// `minute == 0 && second == 0`: the pure hour.
    TopOfHour,
    /// `second == 0`.
    SecondZero,
    /// `minute == n`.
    MinuteEquals(u32),
    /// Night: `hour < 6 || hour >= 23`.
    NightHours,
    /// Hour, minute, and second all even.
    AllEven,
    /// Strictly ascending: `hour < minute < second`.
    Ascending,
    /// No two of hour, minute, second equal.
    AllDistinct,
    /// `hour == 0 && minute == 0`: the first minute of the day.
    ZeroHourMinute,
    /// Exactly 00:00:00.
    MidnightExact,
}

impl TimeShape {
    /// Whether the shape holds for a reading.
    pub fn holds(self, r: ClockReading) -> bool {
        match self {
            Self::HourPlusMinute(n) => r.hour.saturating_add(r.minute) == n,
            Self::SecondMultipleOf(n) => r.second.checked_rem(n) == Some(0),
            Self::MinuteOdd => r.minute.checked_rem(2) == Some(1),
            Self::TopOfHour => r.minute == 0 && r.second == 0,
            Self::SecondZero => r.second == 0,
            Self::MinuteEquals(n) => r.minute == n,
            Self::NightHours => r.hour < 6 || r.hour >= 23,
            Self::AllEven => {
                r.hour.checked_rem(2) == Some(0)
                    && r.minute.checked_rem(2) == Some(0)
                    && r.second.checked_rem(2) == Some(0)
            }
            Self::Ascending => r.hour < r.minute && r.minute < r.second,
            Self::AllDistinct => {
                r.hour != r.minute && r.minute != r.second && r.hour != r.second
            }
            Self::ZeroHourMinute => r.hour == 0 && r.minute == 0,
            Self::MidnightExact => r.hour == 0 && r.minute == 0 && r.second == 0,
        }
    }
}

/// A predicate over telemetry beyond the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCheck {
    /// The clock was just moved backwards (action-driven; never true
    /// during frame evaluation).
    MovedBackward,
    /// `0 < |offset| < n` milliseconds.
    OffsetNonZeroWithin(u64),
    /// `|offset| < n` milliseconds.
    OffsetWithin(u64),
    /// Idle time strictly above `n` milliseconds.
    IdleAbove(u64),
    /// Signal strength strictly above `n`.
    SignalAbove(u8),
    /// Cheat count strictly above `n`.
    CheatCountAbove(u32),
    /// At least `n` hour-adjustments inside the trailing window.
    RapidClicksAtLeast(u32),
}

impl MetaCheck {
    /// Whether the check holds against the current telemetry.
    pub const fn holds(self, ctx: &EvalContext) -> bool {
        let magnitude = ctx.offset_ms.unsigned_abs();
        match self {
            Self::MovedBackward => ctx.moved_backward,
            Self::OffsetNonZeroWithin(n) => magnitude > 0 && magnitude < n,
            Self::OffsetWithin(n) => magnitude < n,
            Self::IdleAbove(n) => ctx.idle_ms > n,
            Self::SignalAbove(n) => ctx.signal_strength > n,
            Self::CheatCountAbove(n) => ctx.cheat_count > n,
            Self::RapidClicksAtLeast(n) => ctx.rapid_clicks >= n,
        }
    }
}

/// The raw predicate of a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Deterministic shape over the displayed time only.
    TimeShape(TimeShape),
    /// Needs telemetry beyond the clock.
    Meta(MetaCheck),
}

impl Requirement {
    /// Whether the raw predicate holds.
    pub fn holds(self, reading: ClockReading, ctx: &EvalContext) -> bool {
        match self {
            Self::TimeShape(shape) => shape.holds(reading),
            Self::Meta(check) => check.holds(ctx),
        }
    }
}

/// Extra gating a secret puzzle requires before its raw predicate is even
/// consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// No cheating during act 1, and a minimum of same-act solves.
    UntouchedAct1 {
        /// Required act-1 solve count.
        min_solves: usize,
    },
    /// The player has cheated during act 2.
    CheatedInAct2,
    /// Cumulative cheat count strictly above `n`.
    CheatCountAbove(u32),
}

impl Gate {
    /// Whether the gate is open.
    pub const fn is_open(self, ctx: &EvalContext) -> bool {
        match self {
            Self::UntouchedAct1 { min_solves } => {
                !ctx.has_cheated_in_act1 && ctx.act1_solves >= min_solves
            }
            Self::CheatedInAct2 => ctx.has_cheated_in_act2,
            Self::CheatCountAbove(n) => ctx.cheat_count > n,
        }
    }
}

// ---------------------------------------------------------------------------
// Puzzle definitions
// ---------------------------------------------------------------------------

/// An immutable puzzle definition from the static catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Puzzle {
    /// Unique identifier.
    pub id: PuzzleId,
    /// The act in which the puzzle is evaluated.
    pub act: Act,
    /// Descriptive prompt shown as the active protocol.
    pub prompt: &'static str,
    /// Requirement hint shown beneath the prompt.
    pub hint: &'static str,
    /// Narrative flavor line announced on solve.
    pub narrative: &'static str,
    /// Supporting flavor line.
    pub narrative_detail: &'static str,
    /// Extra gating, for the secret puzzles.
    pub gate: Option<Gate>,
    /// The raw predicate.
    pub requirement: Requirement,
}

impl Puzzle {
    /// Compound evaluation: the gate (if any) must be open AND the raw
    /// predicate must hold.
    pub fn is_satisfied(&self, reading: ClockReading, ctx: &EvalContext) -> bool {
        let gated = match self.gate {
            Some(gate) => gate.is_open(ctx),
            None => true,
        };
        gated && self.requirement.holds(reading, ctx)
    }
}

/// The complete catalog, in global canonical order.
pub static CATALOG: [Puzzle; 22] = [
    // --- Act 1 ---
    Puzzle {
        id: PuzzleId::Agreement,
        act: Act::One,
        prompt: "When hours and minutes agree.",
        hint: "HH + MM = 42 (e.g., 20:22)",
        narrative: "Harmony found.",
        narrative_detail: "The numbers align.",
        gate: None,
        requirement: Requirement::TimeShape(TimeShape::HourPlusMinute(42)),
    },
    Puzzle {
        id: PuzzleId::Reflection,
        act: Act::One,
        prompt: "Time likes symmetry.",
        hint: "Seconds must repeat (00, 11, 22...)",
        narrative: "Symmetry observed.",
        narrative_detail: "Time reflects itself.",
        gate: None,
        requirement: Requirement::TimeShape(TimeShape::SecondMultipleOf(11)),
    },
    Puzzle {
        id: PuzzleId::Imbalance,
        act: Act::One,
        prompt: "Balance is suspicious.",
        hint: "Solve when minutes are ODD",
        narrative: "Imbalance corrected.",
        narrative_detail: "Oddity accepted.",
        gate: None,
        requirement: Requirement::TimeShape(TimeShape::MinuteOdd),
    },
    Puzzle {
        id: PuzzleId::EchoOfTheHour,
        act: Act::One,
        prompt: "The pure hour approaches.",
        hint: "Wait for exactly HH:00:00",
        narrative: "Pure Time.",
        narrative_detail: "You respected the flow. The Timekeeper nods.",
        gate: Some(Gate::UntouchedAct1 {
            min_solves: ECHO_GATE_ACT1_SOLVES,
        }),
        requirement: Requirement::TimeShape(TimeShape::TopOfHour),
    },
    // --- Act 2 ---
    Puzzle {
        id: PuzzleId::Stillness,
        act: Act::Two,
        prompt: "Forward is not progress.",
        hint: "Move the clock BACKWARDS",
        narrative: "Regression.",
        narrative_detail: "You made time retreat.",
        gate: None,
        requirement: Requirement::Meta(MetaCheck::MovedBackward),
    },
    Puzzle {
        id: PuzzleId::Precision,
        act: Act::Two,
        prompt: "No room for error.",
        hint: "Solve exactly when seconds are 00",
        narrative: "Perfect precision.",
        narrative_detail: "The moment is exact.",
        gate: None,
        requirement: Requirement::TimeShape(TimeShape::SecondZero),
    },
    Puzzle {
        id: PuzzleId::Threshold,
        act: Act::Two,
        prompt: "Between one hour and the next.",
        hint: "Wait for minute 30",
        narrative: "The half hour.",
        narrative_detail: "Balanced on the divide.",
        gate: None,
        requirement: Requirement::TimeShape(TimeShape::MinuteEquals(30)),
    },
    Puzzle {
        id: PuzzleId::OutsideTime,
        act: Act::Two,
        prompt: "This is not the right time.",
        hint: "Set time to Night (23:00-06:00)",
        narrative: "Beyond the boundary.",
        narrative_detail: "You stepped outside.",
        gate: None,
        requirement: Requirement::TimeShape(TimeShape::NightHours),
    },
    Puzzle {
        id: PuzzleId::Attunement,
        act: Act::Two,
        prompt: "Find the frequency.",
        hint: "Raise signal strength above 80",
        narrative: "Signal locked.",
        narrative_detail: "The frequency answers.",
        gate: None,
        requirement: Requirement::Meta(MetaCheck::SignalAbove(ATTUNEMENT_SIGNAL)),
    },
    Puzzle {
        id: PuzzleId::MiniParadox,
        act: Act::Two,
        prompt: "A ripple in the flow.",
        hint: "Align clocks with cheat",
        narrative: "A small fracture.",
        narrative_detail: "You bent the rules.",
        gate: Some(Gate::CheatedInAct2),
        requirement: Requirement::Meta(MetaCheck::OffsetNonZeroWithin(SMALL_OFFSET_MS)),
    },
    // --- Act 3 ---
    Puzzle {
        id: PuzzleId::Split,
        act: Act::Three,
        prompt: "Both are correct.",
        hint: "Align Authority Clock and Real Clock",
        narrative: "Convergence.",
        narrative_detail: "Two timelines become one.",
        gate: None,
        requirement: Requirement::Meta(MetaCheck::OffsetWithin(NEAR_ZERO_OFFSET_MS)),
    },
    Puzzle {
        id: PuzzleId::Equilibrium,
        act: Act::Three,
        prompt: "Nothing odd may remain.",
        hint: "Hour, minute, second all even",
        narrative: "Even ground.",
        narrative_detail: "Every figure settles.",
        gate: None,
        requirement: Requirement::TimeShape(TimeShape::AllEven),
    },
    Puzzle {
        id: PuzzleId::Ascension,
        act: Act::Three,
        prompt: "Each greater than the last.",
        hint: "HH < MM < SS",
        narrative: "Ascent.",
        narrative_detail: "Each figure climbs past the last.",
        gate: None,
        requirement: Requirement::TimeShape(TimeShape::Ascending),
    },
    Puzzle {
        id: PuzzleId::Divergence,
        act: Act::Three,
        prompt: "No two alike.",
        hint: "Hour, minute, second all different",
        narrative: "Divergence.",
        narrative_detail: "The figures refuse each other.",
        gate: None,
        requirement: Requirement::TimeShape(TimeShape::AllDistinct),
    },
    Puzzle {
        id: PuzzleId::ZeroHour,
        act: Act::Three,
        prompt: "Where the day is born.",
        hint: "Reach hour 00, minute 00",
        narrative: "The zero hour.",
        narrative_detail: "The day begins again.",
        gate: None,
        requirement: Requirement::TimeShape(TimeShape::ZeroHourMinute),
    },
    Puzzle {
        id: PuzzleId::LetGo,
        act: Act::Three,
        prompt: "Stop fixing it.",
        hint: "Do nothing for 10s",
        narrative: "Released.",
        narrative_detail: "You stopped fighting the flow.",
        gate: None,
        requirement: Requirement::Meta(MetaCheck::IdleAbove(LET_GO_IDLE_MS)),
    },
    Puzzle {
        id: PuzzleId::FracturedMoments,
        act: Act::Three,
        prompt: "Break it all.",
        hint: "Heavy manipulation",
        narrative: "REALITY BREAK.",
        narrative_detail: "You broke the simulator.",
        gate: Some(Gate::CheatCountAbove(FRACTURE_GATE_CHEAT_COUNT)),
        requirement: Requirement::Meta(MetaCheck::CheatCountAbove(FRACTURE_CHEAT_COUNT)),
    },
    // --- Act 4 ---
    Puzzle {
        id: PuzzleId::Judgment,
        act: Act::Four,
        prompt: "Face the truth.",
        hint: "Wait for 00 seconds",
        narrative: "Judgment.",
        narrative_detail: "The Timekeeper turns to face you.",
        gate: None,
        requirement: Requirement::TimeShape(TimeShape::SecondZero),
    },
    Puzzle {
        id: PuzzleId::Acceptance,
        act: Act::Four,
        prompt: "Return to the source.",
        hint: "Set the time to exactly 00:00:00",
        narrative: "Acceptance.",
        narrative_detail: "You returned to the source.",
        gate: None,
        requirement: Requirement::TimeShape(TimeShape::MidnightExact),
    },
    Puzzle {
        id: PuzzleId::Destruction,
        act: Act::Four,
        prompt: "Shatter the clock.",
        hint: "Rapidly change the hour 10 times in 5 seconds",
        narrative: "Destruction.",
        narrative_detail: "The clock lies in pieces.",
        gate: None,
        requirement: Requirement::Meta(MetaCheck::RapidClicksAtLeast(
            DESTRUCTION_RAPID_CLICKS,
        )),
    },
    Puzzle {
        id: PuzzleId::Alignment,
        act: Act::Four,
        prompt: "Perfect alignment.",
        hint: "Match HH:MM:SS with real time exactly",
        narrative: "Alignment.",
        narrative_detail: "Authority and truth agree at last.",
        gate: None,
        requirement: Requirement::Meta(MetaCheck::OffsetWithin(EXACT_OFFSET_MS)),
    },
    Puzzle {
        id: PuzzleId::Departure,
        act: Act::Four,
        prompt: "Leave the stream.",
        hint: "Close your eyes (Wait 60s)",
        narrative: "Departure.",
        narrative_detail: "You left the stream.",
        gate: None,
        requirement: Requirement::Meta(MetaCheck::IdleAbove(DEPARTURE_IDLE_MS)),
    },
];

/// Canonical solve order for act 1.
pub const ACT1_ORDER: [PuzzleId; 4] = [
    PuzzleId::Agreement,
    PuzzleId::Reflection,
    PuzzleId::Imbalance,
    PuzzleId::EchoOfTheHour,
];

/// Canonical solve order for act 2.
pub const ACT2_ORDER: [PuzzleId; 6] = [
    PuzzleId::Stillness,
    PuzzleId::Precision,
    PuzzleId::Threshold,
    PuzzleId::OutsideTime,
    PuzzleId::Attunement,
    PuzzleId::MiniParadox,
];

/// Canonical solve order for act 3. Act 4 requires all of these.
pub const ACT3_ORDER: [PuzzleId; 7] = [
    PuzzleId::Split,
    PuzzleId::Equilibrium,
    PuzzleId::Ascension,
    PuzzleId::Divergence,
    PuzzleId::ZeroHour,
    PuzzleId::LetGo,
    PuzzleId::FracturedMoments,
];

/// The four terminal ending puzzles.
pub const ENDINGS: [PuzzleId; 4] = [
    PuzzleId::Acceptance,
    PuzzleId::Destruction,
    PuzzleId::Alignment,
    PuzzleId::Departure,
];

/// Look up a puzzle definition.
///
/// The catalog is a closed set, so this always succeeds for a valid
/// [`PuzzleId`]; callers still treat `None` as a skip, never a crash.
pub fn puzzle(id: PuzzleId) -> Option<&'static Puzzle> {
    CATALOG.iter().find(|p| p.id == id)
}

/// The act a puzzle belongs to.
pub fn act_of(id: PuzzleId) -> Option<Act> {
    puzzle(id).map(|p| p.act)
}

/// The canonical order for an act's main progression. Act 4's order is
/// `judgment` followed by telemetry-selected endings, which the frame
/// loop handles itself.
pub const fn act_order(act: Act) -> &'static [PuzzleId] {
    match act {
        Act::One => &ACT1_ORDER,
        Act::Two => &ACT2_ORDER,
        Act::Three => &ACT3_ORDER,
        Act::Four => &[PuzzleId::Judgment],
    }
}

/// How many solved ids belong to the given act.
pub fn solved_count_in_act(act: Act, solved: &[PuzzleId]) -> usize {
    solved
        .iter()
        .filter(|id| act_of(**id) == Some(act))
        .count()
}

/// The single active puzzle for the current act: the first id in the
/// act's canonical order not yet solved.
pub fn active_puzzle(act: Act, solved: &[PuzzleId]) -> Option<PuzzleId> {
    act_order(act)
        .iter()
        .find(|id| !solved.contains(id))
        .copied()
}
