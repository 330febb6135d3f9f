//! Session state and the single reducer entry point for player actions.
//!
//! The session owns the canonical [`GameState`]. Every mutation flows
//! through here: player actions through [`Session::apply_action`], and all
//! solves -- whether found by the frame loop or triggered by a backward
//! adjustment -- through the one [`Session::solve`] transition. Nothing
//! bypasses the pipeline.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use timekeeper_types::{
    Act, AdjustUnit, ClockReading, EventId, PlayerAction, PuzzleId, SessionId, SessionPhase,
    SolveEvent, StateSnapshot,
};
use tracing::{debug, info, warn};

use crate::catalog::{self, EvalContext};
use crate::clock::AuthorityClock;
use crate::config::RulesConfig;
use crate::progress;
use crate::telemetry::TelemetryTracker;

/// Maximum value of the signal-strength dial.
const SIGNAL_MAX: u8 = 100;

/// The canonical mutable game state, owned exclusively by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Current narrative act, derived from the solved set.
    pub act: Act,
    /// Solved puzzles in insertion order; append-only within a session.
    pub puzzles_solved: Vec<PuzzleId>,
    /// Derived glitch intensity.
    pub glitch_level: Decimal,
    /// Cumulative manual adjustments; never decremented.
    pub cheat_count: u32,
    /// When the most recent solve happened (informational).
    pub last_solved_at: Option<NaiveDateTime>,
    /// Sticky: the player adjusted the clock during act 1.
    pub has_cheated_in_act1: bool,
    /// Sticky: the player adjusted the clock during act 2.
    pub has_cheated_in_act2: bool,
    /// Player-controlled dial value (meaningful from act 2).
    pub signal_strength: u8,
}

impl GameState {
    /// Fresh state: act 1, nothing solved, every counter zeroed.
    pub const fn new() -> Self {
        Self {
            act: Act::One,
            puzzles_solved: Vec::new(),
            glitch_level: Decimal::ZERO,
            cheat_count: 0,
            last_solved_at: None,
            has_cheated_in_act1: false,
            has_cheated_in_act2: false,
            signal_strength: 0,
        }
    }

    /// Whether a puzzle is already solved.
    pub fn is_solved(&self, id: PuzzleId) -> bool {
        self.puzzles_solved.contains(&id)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// A play session: clock, game state, telemetry, and phase, mutated only
/// on the logical thread that delivers ticks and actions.
#[derive(Debug, Clone)]
pub struct Session {
    /// Identifies the session in logs and snapshots.
    session_id: SessionId,
    /// The player-manipulable clock.
    pub clock: AuthorityClock,
    /// Canonical game state.
    pub state: GameState,
    /// Ephemeral counters.
    pub telemetry: TelemetryTracker,
    /// Active until an ending puzzle is solved.
    pub phase: SessionPhase,
    /// Tunable gameplay values.
    rules: RulesConfig,
}

impl Session {
    /// Create a session starting at the given wall-clock time.
    pub fn new(session_id: SessionId, started_at: NaiveDateTime, rules: RulesConfig) -> Self {
        info!(%session_id, %started_at, "Session created");
        Self {
            session_id,
            clock: AuthorityClock::new(started_at),
            state: GameState::new(),
            telemetry: TelemetryTracker::new(),
            phase: SessionPhase::Active,
            rules,
        }
    }

    /// The session identifier.
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Apply one player action. Returns any solve events it produced
    /// (only a backward adjustment can solve synchronously).
    ///
    /// Total over its domain: every input has a defined result, and a
    /// finished session treats all actions as no-ops.
    pub fn apply_action(&mut self, action: PlayerAction, now: NaiveDateTime) -> Vec<SolveEvent> {
        if !self.phase.is_active() {
            debug!(session_id = %self.session_id, ?action, "Action ignored: session ended");
            return Vec::new();
        }

        match action {
            PlayerAction::Adjust { unit, amount } => self.apply_adjust(unit, amount, now),
            PlayerAction::ResetOffset => {
                self.apply_reset();
                Vec::new()
            }
            PlayerAction::SetSignalStrength { value } => {
                self.state.signal_strength = value.min(SIGNAL_MAX);
                self.telemetry.reset_idle();
                debug!(signal = self.state.signal_strength, "Signal strength set");
                Vec::new()
            }
            PlayerAction::Interaction => {
                self.telemetry.reset_idle();
                Vec::new()
            }
        }
    }

    /// Manual clock adjustment: the "cheat".
    fn apply_adjust(
        &mut self,
        unit: AdjustUnit,
        amount: i32,
        now: NaiveDateTime,
    ) -> Vec<SolveEvent> {
        let delta_ms = unit.step_ms().saturating_mul(i64::from(amount));
        self.clock.shift(delta_ms);

        self.state.cheat_count = self.state.cheat_count.saturating_add(1);
        match self.state.act {
            Act::One => self.state.has_cheated_in_act1 = true,
            Act::Two => self.state.has_cheated_in_act2 = true,
            Act::Three | Act::Four => {}
        }
        self.telemetry.reset_idle();
        self.state.glitch_level = progress::glitch_for(self.state.cheat_count, self.state.act);

        // Hour-bursts feed the destruction display in act 4.
        if matches!(self.state.act, Act::Four) && matches!(unit, AdjustUnit::Hour) {
            self.telemetry.record_rapid_click();
        }

        debug!(
            ?unit,
            amount,
            offset_ms = self.clock.offset_ms(),
            cheat_count = self.state.cheat_count,
            "Clock adjusted"
        );

        // A backward move during act 2 solves `stillness` on the spot --
        // the one puzzle the frame loop never evaluates.
        let mut events = Vec::new();
        if amount < 0
            && matches!(self.state.act, Act::Two)
            && !self.state.is_solved(PuzzleId::Stillness)
        {
            self.telemetry.note_backward();
            if let Some(event) = self.solve(PuzzleId::Stillness, now) {
                events.push(event);
            }
            self.telemetry.clear_backward();
        }
        events
    }

    /// The "sync" action: zero the offset and soften the glitch.
    fn apply_reset(&mut self) {
        self.clock.clear_offset();
        self.state.glitch_level = self
            .state
            .glitch_level
            .checked_sub(self.rules.reset_glitch_decrement)
            .map_or(Decimal::ZERO, |v| v.max(Decimal::ZERO));
        self.telemetry.reset_idle();
        debug!(glitch = %self.state.glitch_level, "Offset reset");
    }

    /// The single solve transition.
    ///
    /// Idempotent: an already-solved id is a no-op. Appends the id,
    /// re-derives the act from the solved set, recomputes the glitch
    /// level, stamps the solve time, and ends the session if the id is
    /// one of the four endings.
    pub fn solve(&mut self, id: PuzzleId, now: NaiveDateTime) -> Option<SolveEvent> {
        if self.state.is_solved(id) {
            debug!(puzzle = %id, "Solve skipped: already solved");
            return None;
        }
        let Some(definition) = catalog::puzzle(id) else {
            // The catalog is closed; an unknown id is a skip, never a crash.
            warn!(puzzle = %id, "Solve skipped: unknown puzzle");
            return None;
        };

        self.state.puzzles_solved.push(id);
        self.state.act = progress::next_act(&self.state.puzzles_solved);
        self.state.glitch_level = progress::glitch_for(self.state.cheat_count, self.state.act);
        self.state.last_solved_at = Some(now);

        info!(
            session_id = %self.session_id,
            puzzle = %id,
            act = %self.state.act,
            solved = self.state.puzzles_solved.len(),
            glitch = %self.state.glitch_level,
            "Puzzle solved"
        );

        if let Some(ending) = id.as_ending() {
            self.phase = SessionPhase::Ended { ending };
            info!(session_id = %self.session_id, %ending, "Session ended");
        }

        Some(SolveEvent {
            event_id: EventId::new(),
            puzzle: id,
            prompt: definition.prompt.to_owned(),
            narrative: definition.narrative.to_owned(),
            narrative_detail: definition.narrative_detail.to_owned(),
            solved_at: now,
        })
    }

    /// Assemble the telemetry view that gates and requirements consult.
    pub fn eval_context(&self) -> EvalContext {
        EvalContext {
            offset_ms: self.clock.offset_ms(),
            idle_ms: self.telemetry.idle_ms(),
            rapid_clicks: self.telemetry.rapid_clicks(),
            signal_strength: self.state.signal_strength,
            cheat_count: self.state.cheat_count,
            moved_backward: self.telemetry.moved_backward(),
            has_cheated_in_act1: self.state.has_cheated_in_act1,
            has_cheated_in_act2: self.state.has_cheated_in_act2,
            act1_solves: catalog::solved_count_in_act(Act::One, &self.state.puzzles_solved),
        }
    }

    /// The displayed authority reading.
    pub fn reading(&self) -> ClockReading {
        self.clock.reading()
    }

    /// Read-only snapshot for the presentation layer.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            session_id: self.session_id,
            act: self.state.act,
            puzzles_solved: self.state.puzzles_solved.clone(),
            glitch_level: self.state.glitch_level,
            cheat_count: self.state.cheat_count,
            signal_strength: self.state.signal_strength,
            reading: self.clock.reading(),
            phase: self.phase,
            telemetry: self.telemetry.snapshot(self.clock.offset_ms()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn make_session() -> Session {
        Session::new(SessionId::new(), at(12, 0, 0), RulesConfig::default())
    }

    /// Walk a fresh session to act 2 through the solve pipeline.
    fn session_in_act2() -> Session {
        let mut session = make_session();
        let now = at(12, 0, 0);
        let _ = session.solve(PuzzleId::Agreement, now);
        let _ = session.solve(PuzzleId::Reflection, now);
        let _ = session.solve(PuzzleId::Imbalance, now);
        assert_eq!(session.state.act, Act::Two);
        session
    }

    #[test]
    fn fresh_state_is_zeroed() {
        let session = make_session();
        assert_eq!(session.state.act, Act::One);
        assert!(session.state.puzzles_solved.is_empty());
        assert_eq!(session.state.glitch_level, Decimal::ZERO);
        assert_eq!(session.state.cheat_count, 0);
        assert!(session.phase.is_active());
    }

    #[test]
    fn adjust_up_then_down_restores_offset_but_not_cheat_count() {
        let mut session = make_session();
        let now = at(12, 0, 1);

        let _ = session.apply_action(
            PlayerAction::Adjust {
                unit: AdjustUnit::Hour,
                amount: 1,
            },
            now,
        );
        let _ = session.apply_action(
            PlayerAction::Adjust {
                unit: AdjustUnit::Hour,
                amount: -1,
            },
            now,
        );

        assert_eq!(session.clock.offset_ms(), 0);
        assert_eq!(session.state.cheat_count, 2);
    }

    #[test]
    fn adjust_sets_sticky_flag_for_the_current_act() {
        let mut session = make_session();
        let now = at(12, 0, 1);

        let _ = session.apply_action(
            PlayerAction::Adjust {
                unit: AdjustUnit::Minute,
                amount: 1,
            },
            now,
        );
        assert!(session.state.has_cheated_in_act1);
        assert!(!session.state.has_cheated_in_act2);

        let mut session = session_in_act2();
        let _ = session.apply_action(
            PlayerAction::Adjust {
                unit: AdjustUnit::Minute,
                amount: 1,
            },
            now,
        );
        assert!(session.state.has_cheated_in_act2);
    }

    #[test]
    fn adjust_resets_idle_and_raises_glitch() {
        let mut session = make_session();
        session.telemetry.accumulate(5_000);

        let _ = session.apply_action(
            PlayerAction::Adjust {
                unit: AdjustUnit::Minute,
                amount: 1,
            },
            at(12, 0, 1),
        );

        assert_eq!(session.telemetry.idle_ms(), 0);
        assert_eq!(session.state.glitch_level, Decimal::new(1, 1));
    }

    #[test]
    fn solve_is_idempotent() {
        let mut session = make_session();
        let now = at(20, 22, 0);

        let first = session.solve(PuzzleId::Agreement, now);
        assert!(first.is_some());
        let state_after_first = session.state.clone();

        let second = session.solve(PuzzleId::Agreement, now);
        assert!(second.is_none());
        assert_eq!(session.state, state_after_first);
    }

    #[test]
    fn act_is_rederived_after_every_solve() {
        let mut session = make_session();
        let now = at(12, 0, 0);

        let _ = session.solve(PuzzleId::Agreement, now);
        assert_eq!(session.state.act, Act::One);
        let _ = session.solve(PuzzleId::Reflection, now);
        assert_eq!(session.state.act, Act::One);
        let _ = session.solve(PuzzleId::Imbalance, now);
        assert_eq!(session.state.act, Act::Two);
        assert_eq!(session.state.last_solved_at, Some(now));
    }

    #[test]
    fn backward_adjust_in_act2_solves_stillness_immediately() {
        let mut session = session_in_act2();
        let now = at(12, 30, 0);

        let events = session.apply_action(
            PlayerAction::Adjust {
                unit: AdjustUnit::Hour,
                amount: -1,
            },
            now,
        );

        assert_eq!(events.len(), 1);
        assert_eq!(events.first().map(|e| e.puzzle), Some(PuzzleId::Stillness));
        assert!(session.state.is_solved(PuzzleId::Stillness));
        // The transient flag never leaks past the action.
        assert!(!session.telemetry.moved_backward());
    }

    #[test]
    fn backward_adjust_outside_act2_does_not_solve_stillness() {
        let mut session = make_session();
        let events = session.apply_action(
            PlayerAction::Adjust {
                unit: AdjustUnit::Hour,
                amount: -1,
            },
            at(12, 0, 1),
        );
        assert!(events.is_empty());
        assert!(!session.state.is_solved(PuzzleId::Stillness));
    }

    #[test]
    fn backward_adjust_solves_stillness_only_once() {
        let mut session = session_in_act2();
        let now = at(12, 30, 0);
        let adjust = PlayerAction::Adjust {
            unit: AdjustUnit::Minute,
            amount: -1,
        };

        let first = session.apply_action(adjust, now);
        assert_eq!(first.len(), 1);
        let second = session.apply_action(adjust, now);
        assert!(second.is_empty());
        assert_eq!(
            session
                .state
                .puzzles_solved
                .iter()
                .filter(|id| **id == PuzzleId::Stillness)
                .count(),
            1
        );
    }

    #[test]
    fn reset_softens_glitch_without_touching_history() {
        let mut session = session_in_act2();
        let now = at(12, 30, 0);

        for _ in 0..5 {
            let _ = session.apply_action(
                PlayerAction::Adjust {
                    unit: AdjustUnit::Minute,
                    amount: 1,
                },
                now,
            );
        }
        let solved_before = session.state.puzzles_solved.clone();
        let cheats_before = session.state.cheat_count;
        let glitch_before = session.state.glitch_level;

        let _ = session.apply_action(PlayerAction::ResetOffset, now);

        assert_eq!(session.clock.offset_ms(), 0);
        assert_eq!(
            session.state.glitch_level,
            glitch_before - Decimal::new(25, 2)
        );
        assert_eq!(session.state.puzzles_solved, solved_before);
        assert_eq!(session.state.cheat_count, cheats_before);
    }

    #[test]
    fn reset_floors_glitch_at_zero() {
        let mut session = make_session();
        let now = at(12, 0, 1);

        let _ = session.apply_action(
            PlayerAction::Adjust {
                unit: AdjustUnit::Minute,
                amount: 1,
            },
            now,
        ); // glitch 0.1
        let _ = session.apply_action(PlayerAction::ResetOffset, now);
        assert_eq!(session.state.glitch_level, Decimal::ZERO);
        let _ = session.apply_action(PlayerAction::ResetOffset, now);
        assert_eq!(session.state.glitch_level, Decimal::ZERO);
    }

    #[test]
    fn signal_strength_clamps_to_dial_range() {
        let mut session = make_session();
        let _ = session.apply_action(
            PlayerAction::SetSignalStrength { value: 255 },
            at(12, 0, 1),
        );
        assert_eq!(session.state.signal_strength, 100);
    }

    #[test]
    fn ending_solve_terminates_the_session() {
        let mut session = make_session();
        let now = at(0, 0, 0);

        let event = session.solve(PuzzleId::Departure, now);
        assert!(event.is_some());
        assert_eq!(
            session.phase,
            SessionPhase::Ended {
                ending: timekeeper_types::Ending::Departure
            }
        );

        // All further actions are no-ops.
        let events = session.apply_action(
            PlayerAction::Adjust {
                unit: AdjustUnit::Hour,
                amount: 1,
            },
            now,
        );
        assert!(events.is_empty());
        assert_eq!(session.state.cheat_count, 0);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut session = session_in_act2();
        let _ = session.apply_action(
            PlayerAction::SetSignalStrength { value: 55 },
            at(12, 0, 1),
        );

        let snapshot = session.snapshot();
        assert_eq!(snapshot.session_id, session.session_id());
        assert_eq!(snapshot.act, Act::Two);
        assert_eq!(snapshot.puzzles_solved.len(), 3);
        assert_eq!(snapshot.signal_strength, 55);
        assert!(snapshot.phase.is_active());
    }

    #[test]
    fn solve_event_carries_catalog_text() {
        let mut session = make_session();
        let event = session.solve(PuzzleId::Agreement, at(20, 22, 0)).unwrap();
        assert_eq!(event.prompt, "When hours and minutes agree.");
        assert_eq!(event.narrative, "Harmony found.");
    }
}
