//! Simulated entities that own an activity log.
//!
//! A [`SimEntity`] is assembled from optional capabilities: a cargo
//! [`Container`] and a [`Position`]. Each capability reports its own state;
//! the entity merges them, so a V1 entry always carries a snapshot of
//! whatever the entity has.

use serde_json::{Value, json};

use logbook_core::{ActivityLog, LoggedEntity, StateCapture, merge_states};
use logbook_types::{EntityId, ObjectState};

use crate::config::{ContainerConfig, EntityConfig};
use crate::error::{EngineError, StateError};

/// State key for the amount held in a container.
pub const CONTAINER_LEVEL: &str = "container_level";

/// State key for a container's capacity.
pub const CONTAINER_CAPACITY: &str = "container_capacity";

/// State key for an entity's position.
pub const GEOMETRY: &str = "geometry";

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// A container with a fixed capacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    capacity: f64,
    level: f64,
}

impl Container {
    /// Create a container, checking `0 <= level <= capacity`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::InvalidCapacity`] if the capacity is negative
    /// or not finite, or [`StateError::LevelOutOfRange`] if the level does
    /// not fit.
    pub fn new(capacity: f64, level: f64) -> Result<Self, StateError> {
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(StateError::InvalidCapacity { capacity });
        }
        let mut container = Self {
            capacity,
            level: 0.0,
        };
        container.set_level(level)?;
        Ok(container)
    }

    /// Maximum amount the container holds.
    pub const fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Amount currently held.
    pub const fn level(&self) -> f64 {
        self.level
    }

    /// Change the amount held.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::LevelOutOfRange`] if `level` is not within
    /// `0..=capacity`; the container is left unchanged.
    pub fn set_level(&mut self, level: f64) -> Result<(), StateError> {
        if !(0.0..=self.capacity).contains(&level) {
            return Err(StateError::LevelOutOfRange {
                level,
                capacity: self.capacity,
            });
        }
        self.level = level;
        Ok(())
    }
}

impl StateCapture for Container {
    fn get_state(&self) -> ObjectState {
        ObjectState::from([
            (CONTAINER_LEVEL.to_owned(), json!(self.level())),
            (CONTAINER_CAPACITY.to_owned(), json!(self.capacity())),
        ])
    }
}

/// Where an entity is. The geometry is opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub Value);

impl StateCapture for Position {
    fn get_state(&self) -> ObjectState {
        ObjectState::from([(GEOMETRY.to_owned(), self.0.clone())])
    }
}

// ---------------------------------------------------------------------------
// SimEntity
// ---------------------------------------------------------------------------

/// A named entity taking part in a run.
#[derive(Debug, Clone)]
pub struct SimEntity {
    /// Unique identifier.
    pub id: EntityId,
    /// Name used by scenario steps.
    pub name: String,
    /// Cargo container, if any.
    pub container: Option<Container>,
    /// Position, if any.
    pub position: Option<Position>,
    log: ActivityLog,
}

impl SimEntity {
    /// A bare entity with no capabilities and an empty log.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            container: None,
            position: None,
            log: ActivityLog::new(),
        }
    }

    /// Build an entity from its scenario declaration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidEntity`] if the container declaration
    /// is inconsistent.
    pub fn from_config(config: &EntityConfig) -> Result<Self, EngineError> {
        let mut entity = Self::new(config.name.clone());
        entity.container = config
            .container
            .map(|ContainerConfig { capacity, level }| Container::new(capacity, level))
            .transpose()?;
        entity.position = config.geometry.clone().map(Position);
        Ok(entity)
    }

    /// Set the container level.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NoContainer`] if the entity has no container,
    /// or [`StateError::LevelOutOfRange`] if the level does not fit.
    pub fn set_level(&mut self, level: f64) -> Result<(), StateError> {
        let container = self
            .container
            .as_mut()
            .ok_or_else(|| StateError::NoContainer {
                entity: self.name.clone(),
            })?;
        container.set_level(level)
    }

    /// Move the entity; gives it a position if it had none.
    pub fn move_to(&mut self, geometry: Value) {
        self.position = Some(Position(geometry));
    }
}

impl StateCapture for SimEntity {
    fn get_state(&self) -> ObjectState {
        merge_states(self.container.get_state(), self.position.get_state())
    }
}

impl LoggedEntity for SimEntity {
    fn activity_log(&self) -> &ActivityLog {
        &self.log
    }

    fn activity_log_mut(&mut self) -> &mut ActivityLog {
        &mut self.log
    }
}
