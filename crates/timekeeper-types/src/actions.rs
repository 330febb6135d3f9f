//! Player action types for input-to-engine communication.
//!
//! Every way the player can touch the engine is an explicit action value
//! handled by a single reducer entry point in `timekeeper-core`. Actions are
//! fire-and-forget and total: there is no failure mode, only defined
//! no-ops.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Milliseconds in one hour of offset adjustment.
const HOUR_MS: i64 = 3_600_000;

/// Milliseconds in one minute of offset adjustment.
const MINUTE_MS: i64 = 60_000;

/// The unit of a manual clock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum AdjustUnit {
    /// One step moves the clock by an hour.
    Hour,
    /// One step moves the clock by a minute.
    Minute,
}

impl AdjustUnit {
    /// Milliseconds of offset contributed by one step of this unit.
    pub const fn step_ms(self) -> i64 {
        match self {
            Self::Hour => HOUR_MS,
            Self::Minute => MINUTE_MS,
        }
    }
}

/// An action submitted by the player.
///
/// `amount` on [`PlayerAction::Adjust`] is typically ±1 but any integer is
/// valid; the resulting offset shift saturates rather than overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PlayerAction {
    /// Shift authority time by `amount` steps of `unit`. Counts as a cheat.
    Adjust {
        /// Hour or minute steps.
        unit: AdjustUnit,
        /// Signed step count.
        amount: i32,
    },
    /// Zero the offset. Solved history and cheat count are untouched.
    ResetOffset,
    /// Set the signal-strength dial (clamped to 0-100).
    SetSignalStrength {
        /// Requested dial value.
        value: u8,
    },
    /// Generic mouse/keyboard activity. Resets idle time and nothing else.
    Interaction,
}
