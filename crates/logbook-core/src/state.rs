//! State capture for logged entities.
//!
//! An entity opts into describing itself by implementing [`StateCapture`];
//! the default reports nothing. Entities built from several capabilities
//! (a container, a position, ...) chain them by merging each capability's
//! state, see [`merge_states`].
//!
//! [`LoggedEntity`] connects an entity's state to the log it owns, so a
//! V1 entry always starts from a fresh snapshot of the entity.

use serde_json::Value;

use logbook_types::{LogEntry, ObjectState, TimeValue};

use crate::{ActivityLog, ActivityRecord, LogError};

/// Capability of an entity to report its externally visible state.
pub trait StateCapture {
    /// Current state of the entity, attribute name to value.
    ///
    /// The default implementation reports an empty mapping.
    fn get_state(&self) -> ObjectState {
        ObjectState::new()
    }
}

impl StateCapture for () {}

impl<T: StateCapture + ?Sized> StateCapture for &T {
    fn get_state(&self) -> ObjectState {
        (**self).get_state()
    }
}

impl<T: StateCapture> StateCapture for Option<T> {
    fn get_state(&self) -> ObjectState {
        self.as_ref().map(StateCapture::get_state).unwrap_or_default()
    }
}

/// Merge `overlay` over `base`; keys present in both take the overlay value.
pub fn merge_states(mut base: ObjectState, overlay: ObjectState) -> ObjectState {
    base.extend(overlay);
    base
}

/// An entity that owns an [`ActivityLog`] and records into it.
///
/// The provided methods capture the entity's state at call time and
/// forward to the log.
pub trait LoggedEntity: StateCapture {
    /// The entity's log.
    fn activity_log(&self) -> &ActivityLog;

    /// Mutable access to the entity's log.
    fn activity_log_mut(&mut self) -> &mut ActivityLog;

    /// Record a V1 entry with this entity's current state as the base
    /// object state.
    fn log_entry_v1(&mut self, record: ActivityRecord) -> Result<&LogEntry, LogError> {
        let captured = self.get_state();
        self.activity_log_mut().record_v1(captured, record)
    }

    /// Record a legacy V0 entry.
    fn log_entry_v0(
        &mut self,
        message: impl Into<Value>,
        t: impl Into<TimeValue>,
        value: Value,
        geometry: Value,
    ) -> Result<&LogEntry, LogError>
    where
        Self: Sized,
    {
        self.activity_log_mut().record_v0(message, t, value, geometry)
    }

    /// Old-style V0 recording with an absolute time.
    #[deprecated(note = "use `log_entry_v0` instead")]
    #[allow(deprecated)]
    fn log_entry(
        &mut self,
        message: impl Into<Value>,
        t: Option<TimeValue>,
        value: Value,
        geometry: Value,
    ) -> Result<&LogEntry, LogError>
    where
        Self: Sized,
    {
        self.activity_log_mut()
            .record_legacy(message, t, value, geometry)
    }
}
