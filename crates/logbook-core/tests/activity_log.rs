//! Integration tests for recording into and reading from an activity log.
//!
//! Exercises the public API the way a simulated entity and a downstream
//! analyzer would: record through [`LoggedEntity`], read back through
//! `entries()` and `as_table()`.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects, deprecated)]

use chrono::{Local, TimeZone, Utc};
use logbook_core::table::columns;
use logbook_core::{ActivityLog, ActivityRecord, LogErrorKind, LoggedEntity, StateCapture};
use logbook_types::{ActivityId, ActivityLabel, LogEntry, LogState, ObjectState, TimeValue};
use serde_json::{Value, json};
use uuid::Uuid;

/// Entity whose captured state is `{"a": 1, "b": 2}`.
#[derive(Default)]
struct Crane {
    log: ActivityLog,
}

impl StateCapture for Crane {
    fn get_state(&self) -> ObjectState {
        ObjectState::from([("a".to_owned(), json!(1)), ("b".to_owned(), json!(2))])
    }
}

impl LoggedEntity for Crane {
    fn activity_log(&self) -> &ActivityLog {
        &self.log
    }

    fn activity_log_mut(&mut self) -> &mut ActivityLog {
        &mut self.log
    }
}

fn only_activity(log: &ActivityLog) -> logbook_types::ActivityEntry {
    log.activity_entries().next().cloned().unwrap()
}

#[test]
fn text_time_is_a_type_error() {
    let mut crane = Crane::default();
    let err = crane
        .log_entry_v1(ActivityRecord::new("not-a-float", "A"))
        .unwrap_err();
    assert_eq!(err.kind(), LogErrorKind::Type);
    assert!(crane.activity_log().is_empty());
}

#[test]
fn absolute_time_is_a_type_error_for_v1() {
    let mut crane = Crane::default();
    crane.log_entry_v1(ActivityRecord::new(1.0, "A")).unwrap();
    let before = crane.activity_log().clone();

    let at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let err = crane
        .log_entry_v1(ActivityRecord::new(at, "B").state(LogState::Start))
        .unwrap_err();
    assert_eq!(err.kind(), LogErrorKind::Type);
    assert_eq!(crane.activity_log(), &before);
}

#[test]
fn numeric_message_is_a_type_error() {
    let mut crane = Crane::default();
    let err = crane
        .log_entry_v0(123, 1.0, Value::Null, Value::Null)
        .unwrap_err();
    assert_eq!(err.kind(), LogErrorKind::Type);
    assert!(crane.activity_log().is_empty());
}

#[test]
fn label_without_ref_is_rejected() {
    let mut crane = Crane::default();
    let label: ActivityLabel = [("type".to_owned(), json!("x"))].into_iter().collect();
    let err = crane
        .log_entry_v1(ActivityRecord::new(1.0, "A").label(label))
        .unwrap_err();
    assert_eq!(err.kind(), LogErrorKind::Validation);
    assert!(crane.activity_log().is_empty());
}

#[test]
fn complete_label_is_stored() {
    let mut crane = Crane::default();
    crane
        .log_entry_v1(ActivityRecord::new(1.0, "A").label(ActivityLabel::new("x", "y")))
        .unwrap();
    let stored = only_activity(crane.activity_log()).activity_label;
    assert_eq!(
        serde_json::to_value(stored).unwrap(),
        json!({"type": "x", "ref": "y"})
    );
}

#[test]
fn additional_state_is_merged_over_captured_state() {
    let mut crane = Crane::default();
    let overrides = ObjectState::from([("b".to_owned(), json!(3)), ("c".to_owned(), json!(4))]);
    crane
        .log_entry_v1(ActivityRecord::new(1.0, "A").additional_state(overrides))
        .unwrap();
    let stored = only_activity(crane.activity_log()).object_state;
    assert_eq!(
        serde_json::to_value(stored).unwrap(),
        json!({"a": 1, "b": 3, "c": 4})
    );
}

#[test]
fn label_defaults_to_empty() {
    let mut crane = Crane::default();
    crane.log_entry_v1(ActivityRecord::new(1.0, "A")).unwrap();
    assert!(only_activity(crane.activity_log()).activity_label.is_empty());
}

#[test]
fn each_append_extends_history_without_touching_it() {
    let mut crane = Crane::default();
    let mut previous: Vec<LogEntry> = Vec::new();
    for step in 0..4_u32 {
        let seconds = f64::from(step) * 60.0;
        if step % 2 == 0 {
            crane
                .log_entry_v1(ActivityRecord::new(seconds, Uuid::now_v7()).state(LogState::Start))
                .unwrap();
        } else {
            crane
                .log_entry_v0(format!("step {step}"), seconds, json!(step), Value::Null)
                .unwrap();
        }

        let current: Vec<LogEntry> = crane.activity_log().entries().cloned().collect();
        assert_eq!(current.len(), previous.len() + 1);
        assert_eq!(current.get(..previous.len()), Some(previous.as_slice()));
        previous = current;
    }
}

#[test]
fn mixed_schema_export_has_equal_length_columns() {
    let mut crane = Crane::default();
    crane
        .log_entry_v0("mobilised", 0.0, json!(0), json!({"lon": 4.3, "lat": 52.0}))
        .unwrap();
    crane
        .log_entry_v1(ActivityRecord::new(10.0, "A").state(LogState::Stop))
        .unwrap();

    let table = crane.activity_log().as_table();
    assert_eq!(table.len(), 2);
    for column in table.columns() {
        assert_eq!(column.cells().len(), 2);
    }
    assert_eq!(
        table.column(columns::ACTIVITY_STATE),
        Some([None, Some(json!("STOP"))].as_slice())
    );
    assert_eq!(
        table.column(columns::GEOMETRY),
        Some([Some(json!({"lon": 4.3, "lat": 52.0})), None].as_slice())
    );
}

#[test]
fn legacy_alias_rejects_raw_seconds() {
    let mut crane = Crane::default();
    let err = crane
        .log_entry("hello", Some(TimeValue::Float(1.0)), Value::Null, Value::Null)
        .unwrap_err();
    assert_eq!(err.kind(), LogErrorKind::Validation);
}

#[test]
fn legacy_alias_matches_record_v0() {
    let at = Utc.with_ymd_and_hms(2022, 5, 17, 6, 30, 0).unwrap();

    let mut legacy = Crane::default();
    legacy
        .log_entry("hello", Some(TimeValue::Absolute(at)), json!(7), Value::Null)
        .unwrap();

    let mut direct = Crane::default();
    direct
        .log_entry_v0("hello", at.timestamp(), json!(7), Value::Null)
        .unwrap();

    assert_eq!(legacy.activity_log(), direct.activity_log());
}

#[test]
fn v0_and_v1_use_different_wall_clocks() {
    // Known quirk: V1 stores the UTC reading, V0 the local reading, of the
    // same seconds value. Kept for compatibility with existing logs.
    let seconds = 1_600_000_000_i64;
    let mut crane = Crane::default();
    crane
        .log_entry_v1(ActivityRecord::new(1_600_000_000.0, ActivityId::from("A")))
        .unwrap();
    crane
        .log_entry_v0("same instant", seconds, Value::Null, Value::Null)
        .unwrap();

    let instant = Utc.timestamp_opt(seconds, 0).unwrap();
    let stamps: Vec<_> = crane.activity_log().entries().map(LogEntry::timestamp).collect();
    assert_eq!(
        stamps,
        [
            instant.naive_utc(),
            instant.with_timezone(&Local).naive_local()
        ]
    );
}
