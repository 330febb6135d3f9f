//! Input source trait and implementations.
//!
//! Each frame, the runner asks the [`InputSource`] for the player actions
//! that arrived since the previous frame. The trait abstracts the mechanism
//! by which actions are obtained -- a UI event queue, a scripted demo, or a
//! test stub.
//!
//! [`StubInputSource`] never acts, which lets the frame loop be exercised
//! end-to-end as a pure waiting game. [`ScriptedInputSource`] replays a
//! timed action list, which drives demo runs and integration tests
//! deterministically.

use serde::{Deserialize, Serialize};
use timekeeper_types::PlayerAction;

/// Errors that can occur while polling for input.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// An internal error in the input source.
    #[error("input source error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

/// A source of player actions.
///
/// `poll` receives the total session time elapsed so far and returns every
/// action that became due since the previous call, in order.
pub trait InputSource {
    /// Collect the actions due at `session_elapsed_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if the source fails entirely; an empty vec
    /// simply means the player did nothing.
    fn poll(&mut self, session_elapsed_ms: u64) -> Result<Vec<PlayerAction>, InputError>;
}

/// An input source that never acts.
///
/// Useful for tests of the pure waiting game: idle accumulates, time-shape
/// puzzles solve themselves as the clock crosses them.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubInputSource;

impl StubInputSource {
    /// Create a new stub input source.
    pub const fn new() -> Self {
        Self
    }
}

impl InputSource for StubInputSource {
    fn poll(&mut self, _session_elapsed_ms: u64) -> Result<Vec<PlayerAction>, InputError> {
        Ok(Vec::new())
    }
}

/// A player action scheduled at a session-relative time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedAction {
    /// Milliseconds after session start at which the action fires.
    pub at_ms: u64,
    /// The action to apply.
    pub action: PlayerAction,
}

/// Replays a timed action list.
///
/// Actions are delivered once their scheduled time has been reached;
/// each action is delivered exactly once, in schedule order.
#[derive(Debug, Clone)]
pub struct ScriptedInputSource {
    /// Remaining schedule, sorted by `at_ms` ascending.
    pending: Vec<TimedAction>,

    /// Index of the next undelivered action.
    cursor: usize,
}

impl ScriptedInputSource {
    /// Create a source from a schedule. The schedule is sorted by time;
    /// relative order of simultaneous actions is preserved.
    pub fn new(mut script: Vec<TimedAction>) -> Self {
        script.sort_by_key(|t| t.at_ms);
        Self {
            pending: script,
            cursor: 0,
        }
    }

    /// How many actions have not been delivered yet.
    pub fn remaining(&self) -> usize {
        self.pending.len().saturating_sub(self.cursor)
    }
}

impl InputSource for ScriptedInputSource {
    fn poll(&mut self, session_elapsed_ms: u64) -> Result<Vec<PlayerAction>, InputError> {
        let mut due = Vec::new();
        while let Some(next) = self.pending.get(self.cursor) {
            if next.at_ms > session_elapsed_ms {
                break;
            }
            due.push(next.action);
            self.cursor = self.cursor.saturating_add(1);
        }
        Ok(due)
    }
}
