//! Authority clock, puzzle catalog, and the progression engine for the
//! Timekeeper narrative puzzle experience.
//!
//! This crate owns the evaluate-or-wait loop that drives a session: the
//! player bends a simulated "authority time" away from real time to satisfy
//! a sequence of time-based puzzles, progressing through narrative acts
//! toward one of four endings determined by playstyle.
//!
//! # Modules
//!
//! - [`clock`] -- Authority clock (real sample + accumulated offset) and
//!   the [`TimeSource`] seam.
//! - [`catalog`] -- Static puzzle registry, canonical solve ordering, and
//!   the tagged predicate/gate variants.
//! - [`telemetry`] -- Idle time, rapid-click window, and cheat flags.
//! - [`progress`] -- Pure rules: act derivation, glitch intensity, ending
//!   selection.
//! - [`session`] -- Canonical game state and the single action reducer.
//! - [`frame`] -- Per-frame evaluation of the one active puzzle.
//! - [`input`] -- [`InputSource`] trait with stub and scripted sources.
//! - [`runner`] -- The async session loop.
//! - [`config`] -- Configuration loading from `timekeeper-config.yaml`.
//!
//! [`TimeSource`]: clock::TimeSource
//! [`InputSource`]: input::InputSource

pub mod catalog;
pub mod clock;
pub mod config;
pub mod frame;
pub mod input;
pub mod progress;
pub mod runner;
pub mod session;
pub mod telemetry;
