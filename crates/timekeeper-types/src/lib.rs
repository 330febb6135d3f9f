//! Shared type definitions for the Timekeeper progression engine.
//!
//! This crate is the single source of truth for all types used across the
//! Timekeeper workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the clock-face client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for session and event identifiers
//! - [`enums`] -- Enumeration types (acts, puzzles, endings, session phase)
//! - [`actions`] -- Player action types for input-to-engine communication
//! - [`structs`] -- Snapshot and event structs read by the presentation layer

pub mod actions;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{AdjustUnit, PlayerAction};
pub use enums::{Act, Ending, PuzzleId, SessionPhase};
pub use ids::{EventId, SessionId};
pub use structs::{ClockReading, SolveEvent, StateSnapshot, TelemetrySnapshot};
