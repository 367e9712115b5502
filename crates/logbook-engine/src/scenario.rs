//! Scenario replay.
//!
//! A [`Scenario`] holds the declared entities and the scripted steps. Steps
//! are replayed one at a time in time order (ties keep file order), each
//! one appending to the log of the entity it names. The first rejected
//! step aborts the run.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::{debug, info};

use logbook_core::{ActivityRecord, LoggedEntity};
use logbook_types::{ActivityId, TimeValue};

use crate::config::{RunConfig, ScenarioConfig, StepAction, StepConfig};
use crate::entity::SimEntity;
use crate::error::EngineError;

/// Counts from a finished replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps replayed.
    pub steps: usize,
    /// Entries across all entity logs after the replay.
    pub entries: usize,
}

/// Entities plus the steps still to replay.
#[derive(Debug, Clone)]
pub struct Scenario {
    run: RunConfig,
    entities: Vec<SimEntity>,
    pending: Vec<StepConfig>,
}

impl Scenario {
    /// Build the entities declared in `config` and queue its steps.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateEntity`] if two entities share a
    /// name, or [`EngineError::InvalidEntity`] if a declaration is
    /// inconsistent.
    pub fn from_config(config: ScenarioConfig) -> Result<Self, EngineError> {
        let mut names = BTreeSet::new();
        let mut entities = Vec::with_capacity(config.entities.len());
        for declared in &config.entities {
            if !names.insert(declared.name.as_str()) {
                return Err(EngineError::DuplicateEntity {
                    name: declared.name.clone(),
                });
            }
            entities.push(SimEntity::from_config(declared)?);
        }

        let mut pending = config.steps;
        pending.sort_by(|a, b| a.at.total_cmp(&b.at));

        Ok(Self {
            run: config.run,
            entities,
            pending,
        })
    }

    /// Run name.
    pub fn name(&self) -> &str {
        &self.run.name
    }

    /// All entities, in declaration order.
    pub fn entities(&self) -> &[SimEntity] {
        &self.entities
    }

    /// Look up an entity by name.
    #[cfg(test)]
    pub fn entity(&self, name: &str) -> Option<&SimEntity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Replay every pending step.
    ///
    /// Steps are consumed, so a second call replays nothing.
    ///
    /// # Errors
    ///
    /// Returns the error of the first step that fails
    /// ([`EngineError::Step`] for a rejected entry,
    /// [`EngineError::StepState`] for an impossible state change); later
    /// steps are dropped unreplayed. The failing step leaves its entity's
    /// state and log unchanged.
    pub fn run(&mut self) -> Result<RunSummary, EngineError> {
        let steps = std::mem::take(&mut self.pending);
        info!(run = %self.run.name, steps = steps.len(), "replaying scenario");

        let mut replayed: usize = 0;
        for (index, step) in steps.into_iter().enumerate() {
            self.apply(index, step)?;
            replayed = index.saturating_add(1);
        }

        let summary = RunSummary {
            steps: replayed,
            entries: self
                .entities
                .iter()
                .map(|e| e.activity_log().len())
                .sum(),
        };
        info!(
            run = %self.run.name,
            steps = summary.steps,
            entries = summary.entries,
            "scenario replayed"
        );
        Ok(summary)
    }

    fn apply(&mut self, index: usize, step: StepConfig) -> Result<(), EngineError> {
        let now = self.run.epoch_seconds + step.at;
        let StepConfig { entity: name, action, .. } = step;
        let entity = self
            .entities
            .iter_mut()
            .find(|e| e.name == name)
            .ok_or_else(|| EngineError::UnknownEntity {
                step: index,
                entity: name.clone(),
            })?;
        let rejected = |source| EngineError::Step {
            step: index,
            entity: name.clone(),
            source,
        };
        debug!(step = index, entity = %name, at = now, "applying step");

        match action {
            StepAction::Activity {
                activity_id,
                state,
                label,
                additional_state,
                set_level,
                move_to,
                time,
            } => {
                let before = (entity.container, entity.position.clone());
                if let Some(level) = set_level {
                    entity
                        .set_level(level)
                        .map_err(|source| EngineError::StepState {
                            step: index,
                            entity: name.clone(),
                            source,
                        })?;
                }
                if let Some(geometry) = move_to {
                    entity.move_to(geometry);
                }
                let id = activity_id.map_or_else(ActivityId::generate, ActivityId::from);
                let mut record =
                    ActivityRecord::new(time.unwrap_or(TimeValue::Float(now)), id).state(state);
                if let Some(label) = label {
                    record = record.label(label);
                }
                if let Some(extra) = additional_state {
                    record = record.additional_state(extra);
                }
                if let Err(source) = entity.log_entry_v1(record) {
                    // A rejected step leaves the entity as it found it.
                    (entity.container, entity.position) = before;
                    return Err(rejected(source));
                }
            }
            StepAction::Message {
                message,
                value,
                geometry,
                time,
            } => {
                entity
                    .log_entry_v0(message, time.unwrap_or(TimeValue::Float(now)), value, geometry)
                    .map_err(rejected)?;
            }
            StepAction::Legacy {
                message,
                value,
                geometry,
                time,
            } => {
                log_legacy(entity, message, time, value, geometry).map_err(rejected)?;
            }
        }
        Ok(())
    }
}

/// Old-style call, kept so scenarios written against it still replay.
#[allow(deprecated)]
fn log_legacy(
    entity: &mut SimEntity,
    message: Value,
    time: Option<TimeValue>,
    value: Value,
    geometry: Value,
) -> Result<(), logbook_core::LogError> {
    entity.log_entry(message, time, value, geometry).map(|_| ())
}
