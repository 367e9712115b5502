//! Flattened view of the V1 entries of many logs.
//!
//! Downstream analysis only needs who logged what, when, and in which
//! state. [`recorded_activities`] collects that from every entity's log
//! into one time-ordered list.

use chrono::NaiveDateTime;
use serde::Serialize;

use logbook_core::ActivityLog;
use logbook_types::{ActivityId, LogState};

/// One V1 entry, tagged with the entity that logged it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedActivity {
    /// Name of the entity whose log held the entry.
    pub source: String,
    /// UTC wall-clock time of the entry.
    pub timestamp: NaiveDateTime,
    /// The activity the entry is about.
    pub activity_id: ActivityId,
    /// Lifecycle state recorded.
    pub activity_state: LogState,
}

/// Collect the V1 entries of every `(name, log)` pair, ordered by time.
///
/// The sort is stable: entries with the same timestamp keep source order,
/// then insertion order. V0 entries carry no activity and are skipped.
pub fn recorded_activities<'a, I>(sources: I) -> Vec<RecordedActivity>
where
    I: IntoIterator<Item = (&'a str, &'a ActivityLog)>,
{
    let mut rows: Vec<RecordedActivity> = sources
        .into_iter()
        .flat_map(|(source, log)| {
            log.activity_entries().map(move |entry| RecordedActivity {
                source: source.to_owned(),
                timestamp: entry.timestamp,
                activity_id: entry.activity_id.clone(),
                activity_state: entry.activity_state,
            })
        })
        .collect();
    rows.sort_by_key(|row| row.timestamp);
    rows
}
