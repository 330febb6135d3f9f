//! Session engine binary for the Timekeeper experience.
//!
//! Wires together the authority clock, puzzle catalog, telemetry, and the
//! frame loop. Loads configuration, assembles a session, chooses an input
//! source (a scripted action list from the config, or a stub that only
//! watches the clock), runs the session loop, and logs the result.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `timekeeper-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the session (clock sampled from the system wall clock)
//! 4. Choose the input source (scripted or stub)
//! 5. Run the session loop
//! 6. Log the result

mod error;
mod narrator;

use std::path::Path;

use timekeeper_core::clock::{SystemTimeSource, TimeSource as _};
use timekeeper_core::config::EngineConfig;
use timekeeper_core::input::{InputSource, ScriptedInputSource, StubInputSource};
use timekeeper_core::runner::{self, SessionEndReason};
use timekeeper_core::session::Session;
use timekeeper_types::SessionId;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::narrator::NarratorCallback;

/// Application entry point for the session engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the session loop fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging; RUST_LOG overrides the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(true)
        .init();

    info!("timekeeper-engine starting");
    info!(
        frame_interval_ms = config.session.frame_interval_ms,
        clock_sample_interval_ms = config.session.clock_sample_interval_ms,
        max_frames = config.session.max_frames,
        scripted_actions = config.script.len(),
        "Configuration loaded"
    );

    // 3. Create the session from the current wall clock.
    let mut time_source = SystemTimeSource;
    let session_id = SessionId::new();
    let mut session = Session::new(session_id, time_source.now(), config.rules.clone());
    info!(%session_id, "Session initialized");

    // 4. Choose the input source.
    let mut scripted;
    let mut stub;
    let input: &mut dyn InputSource = if config.script.is_empty() {
        info!("No script configured; running as a pure waiting game");
        stub = StubInputSource::new();
        &mut stub
    } else {
        info!(actions = config.script.len(), "Scripted input source loaded");
        scripted = ScriptedInputSource::new(config.script.clone());
        &mut scripted
    };

    let mut callback = NarratorCallback::new();

    // 5. Run the session loop.
    let result = runner::run_session(
        &mut session,
        input,
        &mut time_source,
        &mut callback,
        &config.session,
    )
    .await
    .map_err(EngineError::from)?;

    // 6. Log the result.
    match result.end_reason {
        SessionEndReason::EndingReached(ending) => {
            info!(
                %ending,
                total_frames = result.total_frames,
                solved = result.final_snapshot.puzzles_solved.len(),
                cheat_count = result.final_snapshot.cheat_count,
                glitch = %result.final_snapshot.glitch_level,
                "Session ended"
            );
        }
        SessionEndReason::FrameLimitReached => {
            info!(
                total_frames = result.total_frames,
                act = %result.final_snapshot.act,
                solved = result.final_snapshot.puzzles_solved.len(),
                "Frame limit reached before an ending"
            );
        }
    }

    info!("timekeeper-engine shutdown complete");
    Ok(())
}

/// Load the engine configuration from `timekeeper-config.yaml`.
///
/// Looks for the config file relative to the current working directory;
/// a missing file means defaults everywhere.
fn load_config() -> Result<EngineConfig, EngineError> {
    let config_path = Path::new("timekeeper-config.yaml");
    if config_path.exists() {
        let config = EngineConfig::from_file(config_path)?;
        Ok(config)
    } else {
        Ok(EngineConfig::default())
    }
}
