//! Run report: every entity's log as a table, plus candidate dependencies.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::info;

use logbook_analysis::{Dependency, DependenciesFromRecordedActivities, DependencySource};
use logbook_core::{LogTable, LoggedEntity};
use logbook_types::{EntityId, RunId};

use crate::error::EngineError;
use crate::scenario::Scenario;

/// One entity's share of the report.
#[derive(Debug, Clone, Serialize)]
pub struct EntityReport {
    /// The entity's identifier.
    pub id: EntityId,
    /// Number of entries the entity logged.
    pub entries: usize,
    /// The entity's log, column-oriented.
    pub table: LogTable,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Run name.
    pub run: String,
    /// Identifier of this run.
    pub run_id: RunId,
    /// When the report was built.
    pub generated_at: DateTime<Utc>,
    /// Per-entity logs, keyed by entity name.
    pub entities: BTreeMap<String, EntityReport>,
    /// Candidate dependencies between activities across all entities.
    pub dependencies: Vec<Dependency>,
}

impl RunReport {
    /// Export the logs of every entity in `scenario`.
    pub fn build(scenario: &Scenario) -> Self {
        let entities = scenario
            .entities()
            .iter()
            .map(|entity| {
                let log = entity.activity_log();
                let report = EntityReport {
                    id: entity.id,
                    entries: log.len(),
                    table: log.as_table(),
                };
                (entity.name.clone(), report)
            })
            .collect();

        let dependencies = DependenciesFromRecordedActivities::from_logs(
            scenario
                .entities()
                .iter()
                .map(|entity| (entity.name.as_str(), entity.activity_log())),
        )
        .dependency_list();

        Self {
            run: scenario.name().to_owned(),
            run_id: RunId::new(),
            generated_at: Utc::now(),
            entities,
            dependencies,
        }
    }

    /// The report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write `report` to `path`, or to stdout when `path` is `None`.
///
/// # Errors
///
/// Returns [`EngineError::Json`] or [`EngineError::Io`] on failure.
pub async fn write_report(report: &RunReport, path: Option<&Path>) -> Result<(), EngineError> {
    let mut json = report.to_json()?;
    json.push('\n');

    if let Some(path) = path {
        tokio::fs::write(path, json.as_bytes()).await?;
        info!(path = %path.display(), "report written");
    } else {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(json.as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}
