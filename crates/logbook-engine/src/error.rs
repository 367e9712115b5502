//! Error types for the scenario engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes while loading, replaying, and reporting a scenario.
//! [`StateError`] describes entity states that cannot exist.

use logbook_core::LogError;

use crate::config::ConfigError;

/// Top-level error for the scenario engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// A step was rejected by the entity's log.
    #[error("step {step} ({entity}) rejected: {source}")]
    Step {
        /// Position of the step in replay order.
        step: usize,
        /// Entity the step was addressed to.
        entity: String,
        /// The log's reason for rejecting it.
        #[source]
        source: LogError,
    },

    /// A step names an entity the scenario does not declare.
    #[error("step {step} names unknown entity {entity:?}")]
    UnknownEntity {
        /// Position of the step in replay order.
        step: usize,
        /// The unknown name.
        entity: String,
    },

    /// Two entities share a name.
    #[error("entity {name:?} is declared more than once")]
    DuplicateEntity {
        /// The repeated name.
        name: String,
    },

    /// An entity declaration asks for an impossible state.
    #[error("invalid entity state: {source}")]
    InvalidEntity {
        /// What was wrong with the state.
        #[from]
        source: StateError,
    },

    /// A step asks an entity for an impossible state change.
    #[error("step {step} ({entity}) cannot change state: {source}")]
    StepState {
        /// Position of the step in replay order.
        step: usize,
        /// Entity the step was addressed to.
        entity: String,
        /// What was wrong with the change.
        #[source]
        source: StateError,
    },

    /// Writing the report failed.
    #[error("report I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Serializing the report failed.
    #[error("report serialization error: {source}")]
    Json {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Impossible entity states.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    /// Capacity is negative or not finite.
    #[error("container capacity {capacity} must be a finite, non-negative number")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: f64,
    },

    /// Level does not fit the container.
    #[error("level {level} outside 0..={capacity}")]
    LevelOutOfRange {
        /// The rejected level.
        level: f64,
        /// The container's capacity.
        capacity: f64,
    },

    /// A level was set on an entity without a container.
    #[error("entity {entity:?} has no container")]
    NoContainer {
        /// The entity's name.
        entity: String,
    },
}
