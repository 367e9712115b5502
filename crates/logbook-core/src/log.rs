//! The activity log: an append-only record store owned by one entity.
//!
//! The [`ActivityLog`] struct holds every [`LogEntry`] the entity produced
//! during a simulation run, in insertion order, and exposes them as
//! records ([`ActivityLog::entries`]) or columns ([`ActivityLog::as_table`]).
//!
//! # Design
//!
//! - **Append-only**: entries are never modified or removed.
//! - **Validated at the gate**: a rejected call appends nothing.
//! - **Mixed schemas**: V0 and V1 entries share one store unchanged.
//! - **No ordering check**: entries usually arrive in simulated-time order,
//!   but the log does not enforce it.

use serde_json::Value;
use tracing::{debug, warn};

use logbook_types::{
    ActivityEntry, ActivityId, LogEntry, MessageEntry, ObjectState, TimeValue,
};

use crate::entry::{ActivityRecord, build_message_entry};
use crate::state::StateCapture;
use crate::table::LogTable;
use crate::{LogError, time};

// ---------------------------------------------------------------------------
// ActivityLog
// ---------------------------------------------------------------------------

/// Append-only log of one entity's activity over simulated time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityLog {
    /// All entries, in insertion order.
    entries: Vec<LogEntry>,
}

impl ActivityLog {
    /// Create a new empty log.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Return the number of entries in the log.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the log has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a V1 activity entry.
    ///
    /// `captured` is the owning entity's current state (see
    /// [`StateCapture::get_state`]); the record's additional state is
    /// merged over it. Entities implementing
    /// [`LoggedEntity`](crate::LoggedEntity) get the capture done for them.
    ///
    /// # Errors
    ///
    /// Returns [`LogError`] if the record fails validation; the log is
    /// left unchanged.
    pub fn record_v1(
        &mut self,
        captured: ObjectState,
        record: ActivityRecord,
    ) -> Result<&LogEntry, LogError> {
        let entry = record.build(captured).inspect_err(|e| {
            warn!(error = %e, "rejected activity entry");
        })?;
        debug!(
            activity_id = %entry.activity_id,
            activity_state = %entry.activity_state,
            state_code = entry.activity_state.code(),
            timestamp = %entry.timestamp,
            "activity entry recorded"
        );
        self.push(LogEntry::Activity(entry))
    }

    /// Record a legacy V0 message entry.
    ///
    /// `t` is numeric seconds since the epoch, stored as a local-zone
    /// wall-clock reading. `value` and `geometry` are stored verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::MessageNotText`] if `message` is not a string and
    /// [`LogError::TimeNotNumeric`] or [`LogError::TimeOutOfRange`] for bad
    /// times; the log is left unchanged.
    pub fn record_v0(
        &mut self,
        message: impl Into<Value>,
        t: impl Into<TimeValue>,
        value: Value,
        geometry: Value,
    ) -> Result<&LogEntry, LogError> {
        let entry = build_message_entry(message.into(), &t.into(), value, geometry)
            .inspect_err(|e| {
                warn!(error = %e, "rejected message entry");
            })?;
        debug!(
            message = %entry.message,
            timestamp = %entry.timestamp,
            "message entry recorded"
        );
        self.push(LogEntry::Message(entry))
    }

    /// Old-style V0 recording.
    ///
    /// Requires `t` to be present and to be an absolute time; it is then
    /// converted to the equivalent seconds and recorded exactly as
    /// [`record_v0`](Self::record_v0) would.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::MissingTime`] when `t` is `None`,
    /// [`LogError::TimeNotAbsolute`] when it is raw seconds or text, and
    /// any [`record_v0`](Self::record_v0) error otherwise.
    #[deprecated(note = "use `record_v0` instead")]
    pub fn record_legacy(
        &mut self,
        message: impl Into<Value>,
        t: Option<TimeValue>,
        value: Value,
        geometry: Value,
    ) -> Result<&LogEntry, LogError> {
        let at = t
            .as_ref()
            .ok_or(LogError::MissingTime)
            .and_then(time::require_absolute)
            .inspect_err(|e| {
                warn!(error = %e, "rejected legacy log call");
            })?;
        self.record_v0(message, time::seconds_since_epoch(at), value, geometry)
    }

    /// Iterate over all entries in insertion order.
    ///
    /// Each call starts again from the first entry.
    pub fn entries(&self) -> core::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    /// Return all entries, in insertion order.
    pub fn all_entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Iterate over the V1 entries only.
    pub fn activity_entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter().filter_map(LogEntry::as_activity)
    }

    /// Iterate over the V0 entries only.
    pub fn message_entries(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.iter().filter_map(LogEntry::as_message)
    }

    /// Return all V1 entries for one activity, in insertion order.
    pub fn entries_for_activity(&self, activity_id: &ActivityId) -> Vec<&ActivityEntry> {
        self.activity_entries()
            .filter(|e| &e.activity_id == activity_id)
            .collect()
    }

    /// Column-oriented view of the whole log.
    pub fn as_table(&self) -> LogTable {
        LogTable::from_entries(&self.entries)
    }

    fn push(&mut self, entry: LogEntry) -> Result<&LogEntry, LogError> {
        self.entries.push(entry);
        self.entries
            .last()
            .ok_or(LogError::Internal("failed to retrieve entry after append"))
    }
}

impl StateCapture for ActivityLog {}

impl<'a> IntoIterator for &'a ActivityLog {
    type Item = &'a LogEntry;
    type IntoIter = core::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects, deprecated)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use logbook_types::{ActivityLabel, LogState};

    use super::*;
    use crate::LogErrorKind;

    #[test]
    fn new_log_is_empty() {
        let log = ActivityLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert_eq!(log.entries().count(), 0);
    }

    #[test]
    fn record_v1_appends_entry() {
        let mut log = ActivityLog::new();
        let result = log.record_v1(ObjectState::new(), ActivityRecord::new(1.0, "A"));
        assert!(result.is_ok());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn rejected_entries_leave_log_unchanged() {
        let mut log = ActivityLog::new();
        log.record_v1(ObjectState::new(), ActivityRecord::new(1.0, "A"))
            .unwrap();
        let before = log.clone();

        let label: ActivityLabel = [("type".to_owned(), json!("x"))].into_iter().collect();
        let err = log
            .record_v1(ObjectState::new(), ActivityRecord::new(2.0, "B").label(label))
            .unwrap_err();
        assert_eq!(err.kind(), LogErrorKind::Validation);

        let err = log
            .record_v0(123, 2.0, Value::Null, Value::Null)
            .unwrap_err();
        assert_eq!(err.kind(), LogErrorKind::Type);

        assert_eq!(log, before);
    }

    #[test]
    fn appends_preserve_prior_entries() {
        let mut log = ActivityLog::new();
        log.record_v1(ObjectState::new(), ActivityRecord::new(1.0, "A").state(LogState::Start))
            .unwrap();
        let snapshot: Vec<LogEntry> = log.entries().cloned().collect();

        log.record_v0("waiting", 2.0, Value::Null, Value::Null).unwrap();

        assert_eq!(log.len(), snapshot.len() + 1);
        assert_eq!(log.all_entries().get(..snapshot.len()), Some(snapshot.as_slice()));
    }

    #[test]
    fn entries_iteration_is_restartable() {
        let mut log = ActivityLog::new();
        log.record_v1(ObjectState::new(), ActivityRecord::new(1.0, "A")).unwrap();
        log.record_v1(ObjectState::new(), ActivityRecord::new(2.0, "B")).unwrap();

        let first: Vec<_> = log.entries().collect();
        let second: Vec<_> = (&log).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn entries_for_activity_filters_by_id() {
        let mut log = ActivityLog::new();
        log.record_v1(ObjectState::new(), ActivityRecord::new(1.0, "A").state(LogState::Start))
            .unwrap();
        log.record_v1(ObjectState::new(), ActivityRecord::new(2.0, "B").state(LogState::Start))
            .unwrap();
        log.record_v1(ObjectState::new(), ActivityRecord::new(3.0, "A").state(LogState::Stop))
            .unwrap();

        let states: Vec<_> = log
            .entries_for_activity(&ActivityId::from("A"))
            .iter()
            .map(|e| e.activity_state)
            .collect();
        assert_eq!(states, [LogState::Start, LogState::Stop]);
    }

    #[test]
    fn legacy_requires_time() {
        let mut log = ActivityLog::new();
        let err = log
            .record_legacy("hello", None, Value::Null, Value::Null)
            .unwrap_err();
        assert_eq!(err, LogError::MissingTime);
        assert!(log.is_empty());
    }

    #[test]
    fn legacy_rejects_raw_seconds() {
        let mut log = ActivityLog::new();
        let err = log
            .record_legacy("hello", Some(TimeValue::Float(1.0)), Value::Null, Value::Null)
            .unwrap_err();
        assert_eq!(err.kind(), LogErrorKind::Validation);
        assert!(log.is_empty());
    }

    #[test]
    fn legacy_matches_direct_v0_call() {
        let at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

        let mut legacy = ActivityLog::new();
        legacy
            .record_legacy("hello", Some(at.into()), json!(5), json!([1.0, 2.0]))
            .unwrap();

        let mut direct = ActivityLog::new();
        direct
            .record_v0("hello", 1_577_836_800.0, json!(5), json!([1.0, 2.0]))
            .unwrap();

        assert_eq!(legacy, direct);
    }
}
