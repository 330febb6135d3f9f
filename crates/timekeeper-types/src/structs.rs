//! Snapshot and event structs exposed to the presentation layer.
//!
//! The presentation layer (digit rendering, glitch overlays, toasts, audio)
//! consumes these read-only values and never writes state back except as
//! raw [`PlayerAction`] values.
//!
//! [`PlayerAction`]: crate::actions::PlayerAction

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Act, PuzzleId, SessionPhase};
use crate::ids::{EventId, SessionId};

// ---------------------------------------------------------------------------
// Clock reading
// ---------------------------------------------------------------------------

/// The hour/minute/second components of the displayed authority time,
/// on a 24-hour wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClockReading {
    /// 0-23.
    pub hour: u32,
    /// 0-59.
    pub minute: u32,
    /// 0-59.
    pub second: u32,
}

impl core::fmt::Display for ClockReading {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

// ---------------------------------------------------------------------------
// Solve events
// ---------------------------------------------------------------------------

/// Emitted once when a puzzle is solved; the narrative/sound/toast layer
/// renders it. This is an output of the solve transition, not retained state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SolveEvent {
    /// Unique id of this event.
    pub event_id: EventId,
    /// The puzzle that was solved.
    pub puzzle: PuzzleId,
    /// The puzzle's descriptive prompt, for toast rendering.
    pub prompt: String,
    /// Flavor line shown by the narrative layer.
    pub narrative: String,
    /// Supporting flavor line.
    pub narrative_detail: String,
    /// When the solve happened (wall-clock, informational).
    pub solved_at: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Telemetry snapshot
// ---------------------------------------------------------------------------

/// Read-only view of the ephemeral telemetry counters.
///
/// `rapid_clicks` is surfaced so the presentation layer can show *how* a
/// destruction ending happened, even though ending selection itself is
/// driven by the cheat count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TelemetrySnapshot {
    /// Player-applied shift of authority time relative to real time.
    pub offset_ms: i64,
    /// Milliseconds since the last qualifying interaction.
    pub idle_ms: u64,
    /// Hour-adjustments within the trailing five-second window (act 4).
    pub rapid_clicks: u32,
}

// ---------------------------------------------------------------------------
// State snapshot
// ---------------------------------------------------------------------------

/// Read-only snapshot of the whole session, assembled once per frame for
/// the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StateSnapshot {
    /// The session this snapshot belongs to.
    pub session_id: SessionId,
    /// Current narrative act.
    pub act: Act,
    /// Solved puzzles in insertion order.
    pub puzzles_solved: Vec<PuzzleId>,
    /// Derived glitch intensity driving visual/audio distortion.
    #[ts(as = "String")]
    pub glitch_level: Decimal,
    /// Cumulative manual adjustments; never decremented.
    pub cheat_count: u32,
    /// Player-controlled dial value (meaningful from act 2).
    pub signal_strength: u8,
    /// The displayed authority time.
    pub reading: ClockReading,
    /// Whether puzzles are still being evaluated.
    pub phase: SessionPhase,
    /// Ephemeral counters for display.
    pub telemetry: TelemetrySnapshot,
}
