//! Log entry structs and their building blocks.
//!
//! Covers the two record schemas ([`ActivityEntry`] for V1 and
//! [`MessageEntry`] for the legacy V0), the [`LogEntry`] union that lets
//! both live in one log, and the input-side [`TimeValue`].

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EntrySchema, LogState};
use crate::ids::ActivityId;

/// Externally visible state of an entity: attribute name to value.
///
/// Keys come back in alphabetical order, not in the order the entity
/// inserted them, so exported entries are deterministic.
pub type ObjectState = BTreeMap<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Time input
// ---------------------------------------------------------------------------

/// A time value as handed to the recording operations.
///
/// The simulation clock produces float seconds since the epoch, but
/// callers (and scenario files) can hand over anything. The recording
/// operations accept or reject each variant according to the schema
/// being written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "bindings/")]
pub enum TimeValue {
    /// Whole seconds since the epoch.
    Integer(i64),
    /// Fractional seconds since the epoch.
    Float(f64),
    /// An already converted absolute point in time.
    Absolute(DateTime<Utc>),
    /// Anything textual that is not a valid absolute time.
    Text(String),
}

impl TimeValue {
    /// Short name of the variant, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Absolute(_) => "absolute time",
            Self::Text(_) => "text",
        }
    }
}

impl From<f64> for TimeValue {
    fn from(seconds: f64) -> Self {
        Self::Float(seconds)
    }
}

impl From<i64> for TimeValue {
    fn from(seconds: i64) -> Self {
        Self::Integer(seconds)
    }
}

impl From<i32> for TimeValue {
    fn from(seconds: i32) -> Self {
        Self::Integer(i64::from(seconds))
    }
}

impl From<DateTime<Utc>> for TimeValue {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Absolute(at)
    }
}

impl From<&str> for TimeValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for TimeValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

// ---------------------------------------------------------------------------
// Activity label
// ---------------------------------------------------------------------------

/// Key naming the label's activity type.
pub const LABEL_TYPE_KEY: &str = "type";
/// Key naming the label's reference.
pub const LABEL_REF_KEY: &str = "ref";

/// Free-form label attached to a V1 entry.
///
/// An empty label is always valid. A non-empty label must carry non-null
/// [`LABEL_TYPE_KEY`] and [`LABEL_REF_KEY`] entries; any other keys are
/// kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct ActivityLabel(BTreeMap<String, serde_json::Value>);

impl ActivityLabel {
    /// Build a complete label from its `type` and `ref` parts.
    pub fn new(kind: impl Into<String>, reference: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(
            LABEL_TYPE_KEY.to_owned(),
            serde_json::Value::String(kind.into()),
        );
        map.insert(
            LABEL_REF_KEY.to_owned(),
            serde_json::Value::String(reference.into()),
        );
        Self(map)
    }

    /// An empty label.
    pub const fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Whether the label has no keys at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `type` part, if present.
    pub fn kind(&self) -> Option<&serde_json::Value> {
        self.get(LABEL_TYPE_KEY)
    }

    /// The `ref` part, if present.
    pub fn reference(&self) -> Option<&serde_json::Value> {
        self.get(LABEL_REF_KEY)
    }

    /// Look up any key. A JSON `null` counts as absent.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// The first required key that is missing from a non-empty label.
    ///
    /// Returns `None` for empty labels and for complete ones.
    pub fn missing_required_key(&self) -> Option<&'static str> {
        if self.is_empty() {
            return None;
        }
        if self.kind().is_none() {
            Some(LABEL_TYPE_KEY)
        } else if self.reference().is_none() {
            Some(LABEL_REF_KEY)
        } else {
            None
        }
    }

    /// Borrow the underlying mapping.
    pub const fn as_map(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.0
    }
}

impl From<BTreeMap<String, serde_json::Value>> for ActivityLabel {
    fn from(map: BTreeMap<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, serde_json::Value)> for ActivityLabel {
    fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// V1: activity entry
// ---------------------------------------------------------------------------

/// A V1 ("activity") log entry.
///
/// The timestamp is the UTC wall-clock reading of the recorded seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActivityEntry {
    /// UTC wall-clock time of the entry.
    #[serde(rename = "Timestamp")]
    pub timestamp: NaiveDateTime,
    /// The activity instance being logged.
    #[serde(rename = "ActivityID")]
    pub activity_id: ActivityId,
    /// Lifecycle state of the activity.
    #[serde(rename = "ActivityState")]
    pub activity_state: LogState,
    /// Entity state at the time of the entry, with caller overrides applied.
    #[serde(rename = "ObjectState")]
    pub object_state: ObjectState,
    /// Label of the activity (empty when none was supplied).
    #[serde(rename = "ActivityLabel")]
    pub activity_label: ActivityLabel,
}

// ---------------------------------------------------------------------------
// V0: message entry
// ---------------------------------------------------------------------------

/// A V0 ("message") log entry from the legacy schema.
///
/// The timestamp is the *local* wall-clock reading of the recorded
/// seconds, unlike [`ActivityEntry`] which uses UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MessageEntry {
    /// Text describing the event.
    #[serde(rename = "Message")]
    pub message: String,
    /// Local wall-clock time of the entry.
    #[serde(rename = "Timestamp")]
    pub timestamp: NaiveDateTime,
    /// Opaque payload, stored verbatim.
    #[serde(rename = "Value")]
    pub value: serde_json::Value,
    /// Opaque geometry payload, stored verbatim.
    #[serde(rename = "Geometry")]
    pub geometry: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Union
// ---------------------------------------------------------------------------

/// One record in an activity log: either schema version.
///
/// Serializes untagged, so each record has exactly the fields of its
/// schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "bindings/")]
pub enum LogEntry {
    /// Legacy V0 record.
    Message(MessageEntry),
    /// V1 record.
    Activity(ActivityEntry),
}

impl LogEntry {
    /// The schema this entry follows.
    pub const fn schema(&self) -> EntrySchema {
        match self {
            Self::Message(_) => EntrySchema::V0,
            Self::Activity(_) => EntrySchema::V1,
        }
    }

    /// The stored wall-clock timestamp (UTC for V1, local for V0).
    pub const fn timestamp(&self) -> NaiveDateTime {
        match self {
            Self::Message(entry) => entry.timestamp,
            Self::Activity(entry) => entry.timestamp,
        }
    }

    /// The V1 entry, if this is one.
    pub const fn as_activity(&self) -> Option<&ActivityEntry> {
        match self {
            Self::Activity(entry) => Some(entry),
            Self::Message(_) => None,
        }
    }

    /// The V0 entry, if this is one.
    pub const fn as_message(&self) -> Option<&MessageEntry> {
        match self {
            Self::Message(entry) => Some(entry),
            Self::Activity(_) => None,
        }
    }
}

impl From<ActivityEntry> for LogEntry {
    fn from(entry: ActivityEntry) -> Self {
        Self::Activity(entry)
    }
}

impl From<MessageEntry> for LogEntry {
    fn from(entry: MessageEntry) -> Self {
        Self::Message(entry)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    #[test]
    fn label_missing_ref_is_reported() {
        let label: ActivityLabel = [("type".to_owned(), json!("x"))].into_iter().collect();
        assert_eq!(label.missing_required_key(), Some(LABEL_REF_KEY));
    }

    #[test]
    fn label_null_type_counts_as_missing() {
        let label: ActivityLabel = [
            ("type".to_owned(), serde_json::Value::Null),
            ("ref".to_owned(), json!("y")),
        ]
        .into_iter()
        .collect();
        assert_eq!(label.missing_required_key(), Some(LABEL_TYPE_KEY));
    }

    #[test]
    fn empty_and_complete_labels_are_valid() {
        assert_eq!(ActivityLabel::empty().missing_required_key(), None);
        assert_eq!(ActivityLabel::new("x", "y").missing_required_key(), None);
    }

    #[test]
    fn object_state_keys_are_alphabetical() {
        let mut state = ObjectState::new();
        state.insert("zone".to_owned(), json!(3));
        state.insert("level".to_owned(), json!(1));
        state.insert("berth".to_owned(), json!(2));
        let encoded = serde_json::to_string(&state).unwrap();
        assert_eq!(encoded, r#"{"berth":2,"level":1,"zone":3}"#);
    }

    #[test]
    fn activity_entry_uses_historical_field_names() {
        let entry = LogEntry::Activity(ActivityEntry {
            timestamp: noon(),
            activity_id: ActivityId::from("A"),
            activity_state: LogState::Start,
            object_state: ObjectState::new(),
            activity_label: ActivityLabel::empty(),
        });
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "Timestamp": "2024-03-01T12:00:00",
                "ActivityID": "A",
                "ActivityState": "START",
                "ObjectState": {},
                "ActivityLabel": {},
            })
        );
    }

    #[test]
    fn untagged_entry_deserializes_to_matching_variant() {
        let raw = json!({
            "Message": "arrived",
            "Timestamp": "2024-03-01T12:00:00",
            "Value": 3,
            "Geometry": null,
        });
        let entry: LogEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(entry.schema(), EntrySchema::V0);
        assert_eq!(entry.timestamp(), noon());
    }

    #[test]
    fn time_value_parses_each_shape() {
        let parsed: Vec<TimeValue> = serde_json::from_value(json!([
            1,
            1.5,
            "2024-03-01T12:00:00Z",
            "soon"
        ]))
        .unwrap();
        let kinds: Vec<_> = parsed.iter().map(TimeValue::kind_name).collect();
        assert_eq!(kinds, ["integer", "float", "absolute time", "text"]);
    }
}
