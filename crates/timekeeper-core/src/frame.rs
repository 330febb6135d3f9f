//! Per-frame evaluation: the evaluate-or-wait loop.
//!
//! Every frame, exactly one puzzle is considered: the next unsolved id in
//! the current act's canonical order, or -- in act 4 -- `judgment` followed
//! by the single telemetry-selected ending candidate. A predicate that does
//! not hold is not an error; the frame simply passes.
//!
//! Ordering within a frame is an invariant: idle time accumulates first so
//! predicates observe the time that just elapsed, evaluation runs second,
//! and the rapid-click window decays last.

use chrono::NaiveDateTime;
use timekeeper_types::{Act, ClockReading, PuzzleId, SessionPhase, SolveEvent};
use tracing::debug;

use crate::catalog;
use crate::progress;
use crate::session::Session;

/// What one frame did.
#[derive(Debug, Clone)]
pub struct FrameSummary {
    /// The authority reading the frame evaluated against.
    pub reading: ClockReading,
    /// Solve events produced this frame (at most one).
    pub solved: Vec<SolveEvent>,
    /// Session phase after the frame.
    pub phase: SessionPhase,
}

/// Execute one frame of the session.
///
/// `elapsed_ms` is the real time since the previous frame; `now` is the
/// current wall-clock instant, used only to stamp solves.
pub fn run_frame(session: &mut Session, now: NaiveDateTime, elapsed_ms: u64) -> FrameSummary {
    // 1. Accumulate before anything can observe telemetry.
    session.telemetry.accumulate(elapsed_ms);

    let reading = session.reading();
    let mut solved = Vec::new();

    // 2. A finished session evaluates nothing; the clock keeps rendering.
    if session.phase.is_active() {
        if let Some(id) = active_puzzle(session) {
            let ctx = session.eval_context();
            let satisfied = catalog::puzzle(id)
                .is_some_and(|puzzle| puzzle.is_satisfied(reading, &ctx));
            if satisfied {
                if let Some(event) = session.solve(id, now) {
                    solved.push(event);
                }
            } else {
                debug!(puzzle = %id, %reading, "Active puzzle not yet satisfied");
            }
        }
    }

    // 3. Burst decay runs after evaluation so `destruction` can observe a
    //    window that filled this very frame.
    session.telemetry.decay_rapid_clicks();

    FrameSummary {
        reading,
        solved,
        phase: session.phase,
    }
}

/// The single puzzle this frame may evaluate.
///
/// Acts 1-3: the first unsolved id in the act's canonical order, except
/// `stillness`, which only the adjustment action can solve. Act 4:
/// `judgment` until it is solved, then exactly one ending candidate chosen
/// by playstyle.
fn active_puzzle(session: &Session) -> Option<PuzzleId> {
    let state = &session.state;
    if matches!(state.act, Act::Four) {
        if state.is_solved(PuzzleId::Judgment) {
            let ending = progress::select_ending(state.cheat_count, session.telemetry.idle_ms());
            Some(ending.puzzle_id())
        } else {
            Some(PuzzleId::Judgment)
        }
    } else {
        match catalog::active_puzzle(state.act, &state.puzzles_solved) {
            // Action-driven only; waiting on it blocks the frame loop
            // until the player moves the clock backwards.
            Some(PuzzleId::Stillness) => None,
            other => other,
        }
    }
}
