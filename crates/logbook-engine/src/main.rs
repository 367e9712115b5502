//! Scenario engine binary for the Logbook activity logger.
//!
//! Loads a scenario, replays its steps against the declared entities so
//! each entity's activity log fills up, and writes a JSON report with
//! every log as a table and the candidate dependencies between activities.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `LOGBOOK_CONFIG` (default `logbook-config.yaml`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the entities and queue the steps
//! 4. Replay the steps
//! 5. Build and write the report

mod config;
mod entity;
mod error;
mod report;
mod scenario;

use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ScenarioConfig;
use crate::error::EngineError;
use crate::report::RunReport;
use crate::scenario::Scenario;

/// Default scenario file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "logbook-config.yaml";

/// Application entry point for the scenario engine.
///
/// # Errors
///
/// Returns an error if the scenario cannot be loaded, a step is rejected,
/// or the report cannot be written.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so report where it came from after.
    let config_path = std::env::var("LOGBOOK_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, found) = load_config(&config_path)?;

    // 2. Initialize structured logging; RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("logbook-engine starting");
    if found {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }

    // 3. Build entities.
    let output = config.output.path.clone();
    let mut scenario = Scenario::from_config(config)?;
    info!(
        run = scenario.name(),
        entities = scenario.entities().len(),
        "Scenario ready"
    );

    // 4. Replay.
    let summary = scenario.run()?;

    // 5. Report.
    let report = RunReport::build(&scenario);
    info!(
        run_id = %report.run_id,
        steps = summary.steps,
        entries = summary.entries,
        dependencies = report.dependencies.len(),
        "Run complete"
    );
    report::write_report(&report, output.as_deref().map(Path::new)).await?;

    Ok(())
}

/// Load the scenario at `path`, falling back to defaults if it is absent.
///
/// The flag tells whether the file was found.
fn load_config(path: &Path) -> Result<(ScenarioConfig, bool), EngineError> {
    if path.exists() {
        Ok((ScenarioConfig::from_file(path)?, true))
    } else {
        let mut config = ScenarioConfig::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok((config, false))
    }
}
