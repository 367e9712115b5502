//! Configuration loading and typed config structures for a scenario run.
//!
//! A scenario lives in `logbook-config.yaml` (or the file named by
//! `LOGBOOK_CONFIG`). It names the run, lists the entities taking part,
//! and scripts the steps they log. Every section has defaults, so an empty
//! file is a valid (if uneventful) scenario.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use logbook_types::{ActivityLabel, LogState, ObjectState, TimeValue};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level scenario configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScenarioConfig {
    /// Run name and clock origin.
    #[serde(default)]
    pub run: RunConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Where the report goes.
    #[serde(default)]
    pub output: OutputConfig,

    /// Entities taking part in the run.
    #[serde(default)]
    pub entities: Vec<EntityConfig>,

    /// Scripted steps, replayed in time order.
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

impl ScenarioConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `LOGBOOK_LOG_LEVEL` overrides `logging.level`
    /// - `LOGBOOK_OUTPUT` overrides `output.path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides looked up by variable name.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("LOGBOOK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(path) = lookup("LOGBOOK_OUTPUT") {
            self.output.path = Some(path);
        }
    }
}

/// Run-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunConfig {
    /// Human-readable run name.
    #[serde(default = "default_run_name")]
    pub name: String,

    /// Seconds since the Unix epoch at simulated time zero.
    #[serde(default)]
    pub epoch_seconds: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            name: default_run_name(),
            epoch_seconds: 0.0,
        }
    }
}

fn default_run_name() -> String {
    "logbook-run".to_owned()
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

/// Report output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// File to write the JSON report to; stdout when absent.
    #[serde(default)]
    pub path: Option<String>,
}

/// One entity taking part in the run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntityConfig {
    /// Unique entity name, referenced by steps.
    pub name: String,

    /// Cargo container, if the entity carries one.
    #[serde(default)]
    pub container: Option<ContainerConfig>,

    /// Starting geometry, if the entity has a position.
    #[serde(default)]
    pub geometry: Option<Value>,
}

/// Container capacity and starting level.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ContainerConfig {
    /// Maximum amount the container holds.
    pub capacity: f64,

    /// Amount held at the start of the run.
    #[serde(default)]
    pub level: f64,
}

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StepConfig {
    /// Simulated seconds after the run epoch.
    pub at: f64,

    /// Name of the entity performing the step.
    pub entity: String,

    /// What the entity logs.
    #[serde(flatten)]
    pub action: StepAction,
}

/// What a step logs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    /// A V1 activity entry, optionally after updating the entity's state.
    Activity {
        /// Activity identifier; a fresh one is generated when absent.
        #[serde(default)]
        activity_id: Option<String>,
        /// Lifecycle state.
        #[serde(default)]
        state: LogState,
        /// Activity label.
        #[serde(default)]
        label: Option<ActivityLabel>,
        /// State attributes overriding the entity's own.
        #[serde(default)]
        additional_state: Option<ObjectState>,
        /// New container level, applied before the entry is logged.
        #[serde(default)]
        set_level: Option<f64>,
        /// New geometry, applied before the entry is logged.
        #[serde(default)]
        move_to: Option<Value>,
        /// Explicit time, replacing the simulated seconds.
        #[serde(default)]
        time: Option<TimeValue>,
    },

    /// A legacy V0 message entry.
    Message {
        /// Message text.
        message: Value,
        /// Opaque payload.
        #[serde(default)]
        value: Value,
        /// Opaque geometry payload.
        #[serde(default)]
        geometry: Value,
        /// Explicit time, replacing the simulated seconds.
        #[serde(default)]
        time: Option<TimeValue>,
    },

    /// A V0 entry through the old-style call, which needs an absolute time.
    Legacy {
        /// Message text.
        message: Value,
        /// Opaque payload.
        #[serde(default)]
        value: Value,
        /// Opaque geometry payload.
        #[serde(default)]
        geometry: Value,
        /// Absolute time of the entry.
        #[serde(default)]
        time: Option<TimeValue>,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_empty_yaml() {
        let config = ScenarioConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let config: ScenarioConfig = serde_yml::from_str("run:\n  name: trial\n").unwrap();
        assert_eq!(config.run.name, "trial");
        assert!(config.run.epoch_seconds.abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.output.path, None);
        assert!(config.entities.is_empty());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
run:
  name: "Quay trial"
  epoch_seconds: 1577836800.0
entities:
  - name: barge
    container: { capacity: 100.0, level: 0.0 }
    geometry: { lon: 4.3, lat: 52.0 }
  - name: crane
steps:
  - at: 0.0
    entity: crane
    action: activity
    activity_id: load
    state: START
    label: { type: subprocess, ref: voyage-1 }
  - at: 60.0
    entity: barge
    action: activity
    activity_id: load
    state: STOP
    set_level: 100.0
  - at: 90.0
    entity: barge
    action: message
    message: departed
    value: 3
  - at: 120.0
    entity: barge
    action: legacy
    message: arrived
    time: "2020-01-01T00:02:00Z"
"#;
        let config: ScenarioConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.entities.len(), 2);
        assert_eq!(config.steps.len(), 4);

        let barge = config.entities.first().unwrap();
        assert_eq!(
            barge.container,
            Some(ContainerConfig {
                capacity: 100.0,
                level: 0.0
            })
        );
        assert_eq!(barge.geometry, Some(json!({"lon": 4.3, "lat": 52.0})));

        match &config.steps.first().unwrap().action {
            StepAction::Activity { state, label, .. } => {
                assert_eq!(*state, LogState::Start);
                assert_eq!(label.clone(), Some(ActivityLabel::new("subprocess", "voyage-1")));
            }
            other => panic!("expected activity step, got {other:?}"),
        }
        assert!(matches!(
            config.steps.get(3).map(|s| &s.action),
            Some(StepAction::Legacy {
                time: Some(TimeValue::Absolute(_)),
                ..
            })
        ));
    }

    #[test]
    fn unknown_state_name_is_rejected() {
        let yaml = "steps:\n  - at: 0.0\n    entity: a\n    action: activity\n    state: PAUSED\n";
        assert!(serde_yml::from_str::<ScenarioConfig>(yaml).is_err());
    }

    #[test]
    fn overrides_replace_level_and_output() {
        let mut config = ScenarioConfig::default();
        config.apply_overrides(|key| match key {
            "LOGBOOK_LOG_LEVEL" => Some("debug".to_owned()),
            "LOGBOOK_OUTPUT" => Some("report.json".to_owned()),
            _ => None,
        });
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.output.path.as_deref(), Some("report.json"));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("logbook-config.yaml");
        if path.exists() {
            let config = ScenarioConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
