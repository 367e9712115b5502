//! Column-oriented export of an activity log.
//!
//! A [`LogTable`] pivots a run of entries into named columns holding one
//! cell per entry. Columns appear in the order their field was first seen.
//! A field that an entry does not have (a V1 field on a V0 row, or the
//! reverse) is a missing cell, `None` in memory.
//!
//! V0 payloads may themselves be JSON `null`, so the serialized form keeps
//! the cells and the missing marker apart: `columns` holds the cells (a
//! missing cell is written as `null`), and `missing` lists, per column,
//! the rows where the field was absent. Columns without gaps are left out
//! of `missing`.
//!
//! ```text
//! {
//!   "rows": 2,
//!   "columns": {"Message": ["arrived", null], "Value": [null, null], "ActivityID": [null, "A"], ...},
//!   "missing": {"Message": [1], "Value": [1], "ActivityID": [0], ...}
//! }
//! ```

use chrono::NaiveDateTime;
use serde::Serialize;
use serde::ser::{SerializeMap, SerializeStruct};
use serde_json::Value;

use logbook_types::{ActivityEntry, LogEntry, MessageEntry};

/// Column names, matching the record field names.
pub mod columns {
    /// Entry timestamp (both schemas).
    pub const TIMESTAMP: &str = "Timestamp";
    /// V1 activity identifier.
    pub const ACTIVITY_ID: &str = "ActivityID";
    /// V1 activity state name.
    pub const ACTIVITY_STATE: &str = "ActivityState";
    /// V1 object state mapping.
    pub const OBJECT_STATE: &str = "ObjectState";
    /// V1 activity label mapping.
    pub const ACTIVITY_LABEL: &str = "ActivityLabel";
    /// V0 message text.
    pub const MESSAGE: &str = "Message";
    /// V0 opaque value.
    pub const VALUE: &str = "Value";
    /// V0 opaque geometry.
    pub const GEOMETRY: &str = "Geometry";
}

/// Text format of timestamp cells; fractional seconds only when non-zero.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// One named column of a [`LogTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: &'static str,
    cells: Vec<Option<Value>>,
}

impl Column {
    /// Column name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Cells, one per row; `None` marks a missing field.
    pub fn cells(&self) -> &[Option<Value>] {
        &self.cells
    }

    /// Rows where the entry had no such field.
    pub fn missing_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(row, cell)| cell.is_none().then_some(row))
    }
}

/// Column-oriented view of a sequence of log entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogTable {
    columns: Vec<Column>,
    rows: usize,
}

impl LogTable {
    /// Pivot `entries` into columns, preserving their order as row order.
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        let mut table = Self::default();
        for entry in entries {
            table.push_row(entry_fields(entry));
        }
        table
    }

    /// Number of rows (entries).
    pub const fn len(&self) -> usize {
        self.rows
    }

    /// Whether the table has no rows.
    pub const fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Column names in first-seen order.
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(Column::name)
    }

    /// All columns in first-seen order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Cells of the named column, if any entry had that field.
    pub fn column(&self, name: &str) -> Option<&[Option<Value>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(Column::cells)
    }

    /// The value at `row` in column `name`; `None` if missing or out of range.
    pub fn cell(&self, row: usize, name: &str) -> Option<&Value> {
        self.column(name)
            .and_then(|cells| cells.get(row))
            .and_then(Option::as_ref)
    }

    fn push_row(&mut self, fields: Vec<(&'static str, Value)>) {
        let row = self.rows;
        for (name, value) in fields {
            let column = match self.columns.iter().position(|c| c.name == name) {
                Some(index) => self.columns.get_mut(index),
                None => {
                    self.columns.push(Column {
                        name,
                        cells: vec![None; row],
                    });
                    self.columns.last_mut()
                }
            };
            if let Some(column) = column {
                column.cells.push(Some(value));
            }
        }

        self.rows = row.saturating_add(1);
        for column in &mut self.columns {
            column.cells.resize(self.rows, None);
        }
    }
}

impl Serialize for LogTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut table = serializer.serialize_struct("LogTable", 3)?;
        table.serialize_field("rows", &self.rows)?;
        table.serialize_field("columns", &ColumnCells(&self.columns))?;
        table.serialize_field("missing", &MissingRows(&self.columns))?;
        table.end()
    }
}

/// `{column: [cells]}` in column order.
struct ColumnCells<'a>(&'a [Column]);

impl Serialize for ColumnCells<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for column in self.0 {
            map.serialize_entry(column.name, &column.cells)?;
        }
        map.end()
    }
}

/// `{column: [rows]}` for the columns that have gaps.
struct MissingRows<'a>(&'a [Column]);

impl Serialize for MissingRows<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for column in self.0 {
            let rows: Vec<usize> = column.missing_rows().collect();
            if !rows.is_empty() {
                map.serialize_entry(column.name, &rows)?;
            }
        }
        map.end()
    }
}

/// Flatten one entry into `(column, value)` pairs in schema field order.
fn entry_fields(entry: &LogEntry) -> Vec<(&'static str, Value)> {
    match entry {
        LogEntry::Activity(entry) => activity_fields(entry),
        LogEntry::Message(entry) => message_fields(entry),
    }
}

fn activity_fields(entry: &ActivityEntry) -> Vec<(&'static str, Value)> {
    vec![
        (columns::TIMESTAMP, timestamp_cell(entry.timestamp)),
        (
            columns::ACTIVITY_ID,
            Value::String(entry.activity_id.as_str().to_owned()),
        ),
        (
            columns::ACTIVITY_STATE,
            Value::String(entry.activity_state.name().to_owned()),
        ),
        (
            columns::OBJECT_STATE,
            Value::Object(entry.object_state.clone().into_iter().collect()),
        ),
        (
            columns::ACTIVITY_LABEL,
            Value::Object(
                entry
                    .activity_label
                    .as_map()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
        ),
    ]
}

fn message_fields(entry: &MessageEntry) -> Vec<(&'static str, Value)> {
    vec![
        (columns::MESSAGE, Value::String(entry.message.clone())),
        (columns::TIMESTAMP, timestamp_cell(entry.timestamp)),
        (columns::VALUE, entry.value.clone()),
        (columns::GEOMETRY, entry.geometry.clone()),
    ]
}

fn timestamp_cell(timestamp: NaiveDateTime) -> Value {
    Value::String(timestamp.format(TIMESTAMP_FORMAT).to_string())
}
