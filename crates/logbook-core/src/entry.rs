//! Entry construction and validation.
//!
//! Provides the [`ActivityRecord`] builder for V1 entries and
//! [`build_message_entry`] for legacy V0 entries. Both validate every input
//! before producing an entry, so a rejected call never leaves anything
//! behind in the log.

use serde_json::Value;

use logbook_types::{
    ActivityEntry, ActivityId, ActivityLabel, LogState, MessageEntry, ObjectState, TimeValue,
};

use crate::state::merge_states;
use crate::{LogError, time, value_kind};

// ---------------------------------------------------------------------------
// V1 builder
// ---------------------------------------------------------------------------

/// Builder for a V1 activity entry.
///
/// Carries the optional arguments of a recording call: state (defaults to
/// [`LogState::Unknown`]), extra object state, and label.
///
/// # Examples
///
/// ```
/// use logbook_core::ActivityRecord;
/// use logbook_types::{ActivityLabel, LogState, ObjectState};
///
/// let entry = ActivityRecord::new(1.0, "A")
///     .state(LogState::Stop)
///     .label(ActivityLabel::new("x", "y"))
///     .build(ObjectState::new());
///
/// assert!(entry.is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    time: TimeValue,
    activity_id: ActivityId,
    activity_state: LogState,
    additional_state: Option<ObjectState>,
    activity_label: Option<ActivityLabel>,
}

impl ActivityRecord {
    /// Start a record for activity `activity_id` at simulated time `t`.
    pub fn new(t: impl Into<TimeValue>, activity_id: impl Into<ActivityId>) -> Self {
        Self {
            time: t.into(),
            activity_id: activity_id.into(),
            activity_state: LogState::Unknown,
            additional_state: None,
            activity_label: None,
        }
    }

    /// Set the activity's lifecycle state.
    #[must_use]
    pub const fn state(mut self, state: LogState) -> Self {
        self.activity_state = state;
        self
    }

    /// Set state attributes that override the entity's captured state.
    #[must_use]
    pub fn additional_state(mut self, state: ObjectState) -> Self {
        self.additional_state = Some(state);
        self
    }

    /// Set the activity label.
    #[must_use]
    pub fn label(mut self, label: ActivityLabel) -> Self {
        self.activity_label = Some(label);
        self
    }

    /// Validate inputs and produce an [`ActivityEntry`].
    ///
    /// `captured` is the owning entity's state; the record's additional
    /// state is merged over it.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::TimeNotFloat`] if the time is not float seconds,
    /// [`LogError::TimeOutOfRange`] if it cannot be converted, and
    /// [`LogError::IncompleteLabel`] if a non-empty label lacks `type` or
    /// `ref`.
    pub fn build(self, captured: ObjectState) -> Result<ActivityEntry, LogError> {
        let seconds = time::require_float(&self.time)?;
        let timestamp = time::utc_wall_clock(seconds)?;

        let activity_label = self.activity_label.unwrap_or_default();
        if let Some(missing) = activity_label.missing_required_key() {
            return Err(LogError::IncompleteLabel { missing });
        }

        let object_state = match self.additional_state {
            Some(overrides) => merge_states(captured, overrides),
            None => captured,
        };

        Ok(ActivityEntry {
            timestamp,
            activity_id: self.activity_id,
            activity_state: self.activity_state,
            object_state,
            activity_label,
        })
    }
}

// ---------------------------------------------------------------------------
// V0 construction
// ---------------------------------------------------------------------------

/// Validate inputs and produce a legacy [`MessageEntry`].
///
/// # Errors
///
/// Returns [`LogError::MessageNotText`] if `message` is not a string,
/// [`LogError::TimeNotNumeric`] if `t` is not numeric seconds, and
/// [`LogError::TimeOutOfRange`] if the seconds cannot be converted.
pub fn build_message_entry(
    message: Value,
    t: &TimeValue,
    value: Value,
    geometry: Value,
) -> Result<MessageEntry, LogError> {
    let Value::String(message) = message else {
        return Err(LogError::MessageNotText {
            actual: value_kind(&message),
        });
    };
    let seconds = time::require_numeric(t)?;
    let timestamp = time::local_wall_clock(seconds)?;

    Ok(MessageEntry {
        message,
        timestamp,
        value,
        geometry,
    })
}
