//! Enumeration types for the Timekeeper progression engine.
//!
//! The puzzle catalog is a closed, statically-known set, so puzzle
//! identifiers are an enum rather than strings: the engine dispatches via
//! exhaustive pattern matching and the compiler enforces that every puzzle
//! is handled.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Acts
// ---------------------------------------------------------------------------

/// A narrative act. Progression is monotonically non-decreasing; the act is
/// always derived from the solved set, never stored independently of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Act {
    /// Act I: Observation. The clock runs; the player watches.
    One,
    /// Act II: Control. The authority interface unlocks.
    Two,
    /// Act III: Resistance. The timelines fracture.
    Three,
    /// Act IV: Judgment, then one of four endings.
    Four,
}

impl Act {
    /// The act as a 1-based number for display and logging.
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }
}

impl core::fmt::Display for Act {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.number())
    }
}

// ---------------------------------------------------------------------------
// Puzzles
// ---------------------------------------------------------------------------

/// Identifier of a puzzle in the static catalog.
///
/// Serialized names are the snake_case ids the presentation layer displays
/// (`agreement`, `echo_of_the_hour`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum PuzzleId {
    // --- Act 1 ---
    /// Hours and minutes agree: HH + MM == 42.
    Agreement,
    /// Seconds repeat: SS is a multiple of 11 (00, 11, 22, ...).
    Reflection,
    /// Minutes are odd.
    Imbalance,
    /// Secret: the pure hour, HH:00:00, reserved for players who never cheat.
    EchoOfTheHour,

    // --- Act 2 ---
    /// Move the clock backwards. Solved by the adjustment action itself,
    /// never by the frame loop.
    Stillness,
    /// Seconds are exactly 00.
    Precision,
    /// The half hour: minute is exactly 30.
    Threshold,
    /// Night hours: before 06:00 or from 23:00.
    OutsideTime,
    /// Signal strength raised above 80.
    Attunement,
    /// Secret: a small offset, 0 < |offset| < 60s, after cheating in act 2.
    MiniParadox,

    // --- Act 3 ---
    /// Authority and real clocks within one second of each other.
    Split,
    /// Hour, minute, and second all even.
    Equilibrium,
    /// Strictly ascending components: HH < MM < SS.
    Ascension,
    /// No two of hour, minute, second equal.
    Divergence,
    /// The first minute of the day: hour 00, minute 00.
    ZeroHour,
    /// Do nothing for ten seconds.
    LetGo,
    /// Heavy manipulation: more than twenty adjustments.
    FracturedMoments,

    // --- Act 4 ---
    /// Face the truth: seconds at 00. Required before any ending.
    Judgment,
    /// Ending: the clock at exactly 00:00:00.
    Acceptance,
    /// Ending: ten hour-adjustments within five seconds.
    Destruction,
    /// Ending: authority time within half a second of real time.
    Alignment,
    /// Ending: a full minute of stillness.
    Departure,
}

impl PuzzleId {
    /// The snake_case id string used in events and display.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agreement => "agreement",
            Self::Reflection => "reflection",
            Self::Imbalance => "imbalance",
            Self::EchoOfTheHour => "echo_of_the_hour",
            Self::Stillness => "stillness",
            Self::Precision => "precision",
            Self::Threshold => "threshold",
            Self::OutsideTime => "outside_time",
            Self::Attunement => "attunement",
            Self::MiniParadox => "mini_paradox",
            Self::Split => "split",
            Self::Equilibrium => "equilibrium",
            Self::Ascension => "ascension",
            Self::Divergence => "divergence",
            Self::ZeroHour => "zero_hour",
            Self::LetGo => "let_go",
            Self::FracturedMoments => "fractured_moments",
            Self::Judgment => "judgment",
            Self::Acceptance => "acceptance",
            Self::Destruction => "destruction",
            Self::Alignment => "alignment",
            Self::Departure => "departure",
        }
    }

    /// The ending this id represents, if it is one of the four terminal
    /// puzzles.
    pub const fn as_ending(self) -> Option<Ending> {
        match self {
            Self::Acceptance => Some(Ending::Acceptance),
            Self::Destruction => Some(Ending::Destruction),
            Self::Alignment => Some(Ending::Alignment),
            Self::Departure => Some(Ending::Departure),
            _ => None,
        }
    }
}

impl core::fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Endings
// ---------------------------------------------------------------------------

/// One of the four terminal outcomes of a session.
///
/// Exactly one ending puzzle is ever solved per session; which candidate is
/// offered each frame is decided by playstyle telemetry once `judgment` has
/// been solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    /// Return to the source: the purist's ending.
    Acceptance,
    /// Shatter the clock: the vandal's ending.
    Destruction,
    /// Perfect alignment: authority and real time reconciled.
    Alignment,
    /// Leave the stream: the ending of stillness.
    Departure,
}

impl Ending {
    /// The puzzle id carrying this ending in the catalog.
    pub const fn puzzle_id(self) -> PuzzleId {
        match self {
            Self::Acceptance => PuzzleId::Acceptance,
            Self::Destruction => PuzzleId::Destruction,
            Self::Alignment => PuzzleId::Alignment,
            Self::Departure => PuzzleId::Departure,
        }
    }
}

impl core::fmt::Display for Ending {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.puzzle_id().as_str())
    }
}

// ---------------------------------------------------------------------------
// Session phase
// ---------------------------------------------------------------------------

/// Whether the session is still evaluating puzzles.
///
/// Reaching an ending is terminal: the frame loop stops evaluating puzzles,
/// though the clock and visuals may keep rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum SessionPhase {
    /// Puzzles are evaluated every frame.
    Active,
    /// A terminal ending was reached; no further puzzle evaluation.
    Ended {
        /// Which of the four endings closed the session.
        ending: Ending,
    },
}

impl SessionPhase {
    /// True while puzzles are still being evaluated.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}
