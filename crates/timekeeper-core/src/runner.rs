//! Session loop runner.
//!
//! [`run_session`] drives the cooperative, single-threaded loop described
//! by the engine's concurrency model: one wall-clock re-sample per sample
//! interval, one frame evaluation per frame interval, player actions
//! applied between sampling and evaluation. Nothing blocks; a frame whose
//! predicate fails simply waits for the next one.
//!
//! The runner wraps the single-frame [`run_frame`] function and adds the
//! cadence and termination plane around it.
//!
//! [`run_frame`]: crate::frame::run_frame

use timekeeper_types::{Ending, SessionPhase, StateSnapshot};
use tracing::{debug, info};

use crate::clock::TimeSource;
use crate::config::SessionConfig;
use crate::frame::{self, FrameSummary};
use crate::input::{InputError, InputSource};
use crate::session::Session;

/// Errors that can occur during the session run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The input source failed.
    #[error("input error: {source}")]
    Input {
        /// The underlying input error.
        #[from]
        source: InputError,
    },
}

/// Why the session loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEndReason {
    /// A terminal ending puzzle was solved.
    EndingReached(Ending),
    /// The configured frame bound was hit first.
    FrameLimitReached,
}

/// Result of a session run.
#[derive(Debug, Clone)]
pub struct SessionResult {
    /// Why the loop stopped.
    pub end_reason: SessionEndReason,
    /// Total frames executed.
    pub total_frames: u64,
    /// The state as the loop ended.
    pub final_snapshot: StateSnapshot,
}

/// Callback invoked after each frame completes.
///
/// Implementations use this to push snapshots and solve events to the
/// presentation layer.
pub trait FrameCallback {
    /// Called after a frame completes.
    fn on_frame(&mut self, summary: &FrameSummary, session: &Session);
}

/// A no-op frame callback for testing.
pub struct NoOpCallback;

impl FrameCallback for NoOpCallback {
    fn on_frame(&mut self, _summary: &FrameSummary, _session: &Session) {}
}

/// Run the session loop until an ending is reached (or the frame bound,
/// when one is configured).
///
/// # Arguments
///
/// * `session` - Mutable session state (clock, game state, telemetry)
/// * `input` - Source of player actions (UI queue, script, stub)
/// * `time_source` - Source of wall-clock samples
/// * `callback` - Called after each frame for presentation updates
/// * `config` - Frame cadence and bounds
///
/// # Errors
///
/// Returns [`RunnerError`] if the input source fails unrecoverably.
pub async fn run_session(
    session: &mut Session,
    input: &mut dyn InputSource,
    time_source: &mut dyn TimeSource,
    callback: &mut dyn FrameCallback,
    config: &SessionConfig,
) -> Result<SessionResult, RunnerError> {
    let mut total_frames: u64 = 0;
    let mut session_elapsed_ms: u64 = 0;
    let mut since_sample_ms: u64 = 0;
    let mut last_now = time_source.now();

    info!(
        frame_interval_ms = config.frame_interval_ms,
        clock_sample_interval_ms = config.clock_sample_interval_ms,
        max_frames = config.max_frames,
        "Session loop starting"
    );

    loop {
        let now = time_source.now();
        let elapsed_ms = u64::try_from(
            now.signed_duration_since(last_now).num_milliseconds(),
        )
        .unwrap_or(0);
        last_now = now;
        session_elapsed_ms = session_elapsed_ms.saturating_add(elapsed_ms);
        since_sample_ms = since_sample_ms.saturating_add(elapsed_ms);

        // Re-sample the wall clock at the configured cadence (>= 1 Hz).
        if since_sample_ms >= config.clock_sample_interval_ms {
            session.clock.sample(now);
            since_sample_ms = 0;
        }

        // Apply the player actions that arrived since the last frame.
        // A backward adjustment can solve `stillness` right here.
        let mut action_events = Vec::new();
        for action in input.poll(session_elapsed_ms)? {
            action_events.extend(session.apply_action(action, now));
        }

        // Evaluate, then surface action solves ahead of frame solves.
        let mut summary = frame::run_frame(session, now, elapsed_ms);
        if !action_events.is_empty() {
            action_events.append(&mut summary.solved);
            summary.solved = action_events;
        }

        total_frames = total_frames.saturating_add(1);
        callback.on_frame(&summary, session);

        if let SessionPhase::Ended { ending } = summary.phase {
            info!(%ending, total_frames, "Session loop finished");
            return Ok(SessionResult {
                end_reason: SessionEndReason::EndingReached(ending),
                total_frames,
                final_snapshot: session.snapshot(),
            });
        }

        if config.max_frames > 0 && total_frames >= config.max_frames {
            debug!(total_frames, "Frame limit reached");
            return Ok(SessionResult {
                end_reason: SessionEndReason::FrameLimitReached,
                total_frames,
                final_snapshot: session.snapshot(),
            });
        }

        if config.frame_interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(
                config.frame_interval_ms,
            ))
            .await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use timekeeper_types::{
        Act, AdjustUnit, PlayerAction, PuzzleId, SessionId, SolveEvent,
    };

    use super::*;
    use crate::clock::FixedStepTimeSource;
    use crate::config::RulesConfig;
    use crate::input::{ScriptedInputSource, StubInputSource, TimedAction};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    /// One simulated second per frame, no real sleeping.
    const fn fast_config(max_frames: u64) -> SessionConfig {
        SessionConfig {
            frame_interval_ms: 0,
            clock_sample_interval_ms: 1_000,
            max_frames,
        }
    }

    /// Records every solve event the callback sees.
    #[derive(Default)]
    struct RecordingCallback {
        events: Vec<SolveEvent>,
    }

    impl FrameCallback for RecordingCallback {
        fn on_frame(&mut self, summary: &FrameSummary, _session: &Session) {
            self.events.extend(summary.solved.iter().cloned());
        }
    }

    #[tokio::test]
    async fn waiting_alone_reaches_act_two() {
        // Starting at 20:22:00, the first three act-1 puzzles solve by
        // natural clock drift: agreement immediately, reflection at
        // second 11, imbalance when the odd minute 23 arrives.
        let start = at(20, 22, 0);
        let mut session = Session::new(SessionId::new(), start, RulesConfig::default());
        let mut input = StubInputSource::new();
        let mut time = FixedStepTimeSource::new(start, 1_000);
        let mut callback = RecordingCallback::default();

        let result = run_session(
            &mut session,
            &mut input,
            &mut time,
            &mut callback,
            &fast_config(120),
        )
        .await
        .unwrap();

        assert_eq!(result.end_reason, SessionEndReason::FrameLimitReached);
        assert_eq!(result.final_snapshot.act, Act::Two);
        assert_eq!(
            result.final_snapshot.puzzles_solved,
            vec![
                PuzzleId::Agreement,
                PuzzleId::Reflection,
                PuzzleId::Imbalance
            ]
        );
        // No cheating happened.
        assert_eq!(result.final_snapshot.cheat_count, 0);
        assert_eq!(callback.events.len(), 3);
    }

    #[tokio::test]
    async fn scripted_backward_adjust_solves_stillness() {
        let start = at(20, 22, 0);
        let mut session = Session::new(SessionId::new(), start, RulesConfig::default());
        let mut input = ScriptedInputSource::new(vec![TimedAction {
            at_ms: 180_000, // act 2 is long since reached by then
            action: PlayerAction::Adjust {
                unit: AdjustUnit::Minute,
                amount: -1,
            },
        }]);
        let mut time = FixedStepTimeSource::new(start, 1_000);
        let mut callback = RecordingCallback::default();

        let result = run_session(
            &mut session,
            &mut input,
            &mut time,
            &mut callback,
            &fast_config(200),
        )
        .await
        .unwrap();

        assert!(result.final_snapshot.puzzles_solved.contains(&PuzzleId::Stillness));
        assert_eq!(result.final_snapshot.cheat_count, 1);
        // The action-driven solve reached the callback stream too.
        assert!(callback.events.iter().any(|e| e.puzzle == PuzzleId::Stillness));
    }

    #[tokio::test]
    async fn frame_limit_bounds_the_loop() {
        let start = at(3, 3, 3); // no act-1 shape holds here at second 3
        let mut session = Session::new(SessionId::new(), start, RulesConfig::default());
        let mut input = StubInputSource::new();
        let mut time = FixedStepTimeSource::new(start, 100);
        let mut callback = NoOpCallback;

        let result = run_session(
            &mut session,
            &mut input,
            &mut time,
            &mut callback,
            &SessionConfig {
                frame_interval_ms: 0,
                clock_sample_interval_ms: 1_000,
                max_frames: 5,
            },
        )
        .await
        .unwrap();

        assert_eq!(result.end_reason, SessionEndReason::FrameLimitReached);
        assert_eq!(result.total_frames, 5);
    }
}
