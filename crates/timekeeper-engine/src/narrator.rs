//! Frame callback that narrates the session to the log.
//!
//! This is the engine binary's stand-in for the presentation layer: solve
//! events become narrative log lines, and act transitions are announced as
//! they happen. A real client would render toasts and play audio from the
//! same stream.

use timekeeper_core::frame::FrameSummary;
use timekeeper_core::runner::FrameCallback;
use timekeeper_core::session::Session;
use timekeeper_types::Act;
use tracing::info;

/// Logs solve events and act transitions after each frame.
pub struct NarratorCallback {
    /// The last act announced, to report transitions exactly once.
    last_act: Act,
}

impl NarratorCallback {
    /// Create a narrator starting from act 1.
    pub const fn new() -> Self {
        Self {
            last_act: Act::One,
        }
    }
}

impl Default for NarratorCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCallback for NarratorCallback {
    fn on_frame(&mut self, summary: &FrameSummary, session: &Session) {
        for event in &summary.solved {
            info!(
                puzzle = %event.puzzle,
                narrative = %event.narrative,
                detail = %event.narrative_detail,
                reading = %summary.reading,
                "{}",
                event.prompt
            );
        }

        let act = session.state.act;
        if act != self.last_act {
            info!(
                act = %act,
                glitch = %session.state.glitch_level,
                "Act transition"
            );
            self.last_act = act;
        }
    }
}
