//! Append-only activity log for simulation entities.
//!
//! Every simulated entity (vessel, site, equipment) owns one
//! [`ActivityLog`]. Simulation steps append structured entries describing
//! what the entity was doing and what state it was in; after the run the
//! entries are read back for analysis, either record by record or as a
//! column-oriented [`LogTable`].
//!
//! # Architecture
//!
//! - [`log`] -- The [`ActivityLog`] store: recording, iteration, export.
//! - [`entry`] -- The [`ActivityRecord`] builder and entry validation.
//! - [`state`] -- The [`StateCapture`] capability and the [`LoggedEntity`]
//!   trait that ties an entity's state to its log.
//! - [`table`] -- Column-oriented export tolerant of mixed schemas.
//! - [`time`] -- Seconds-to-wall-clock conversion rules.
//!
//! # Schemas
//!
//! | Schema | Fields | Time input | Wall clock |
//! |--------|--------|------------|------------|
//! | V1 | Timestamp, `ActivityID`, `ActivityState`, `ObjectState`, `ActivityLabel` | float seconds | UTC |
//! | V0 | Message, Timestamp, Value, Geometry | numeric seconds | local |
//!
//! The UTC/local split is historical and kept as-is so old and new logs
//! keep comparing the way they always have.
//!
//! # Usage
//!
//! ```
//! use logbook_core::{ActivityLog, ActivityRecord};
//! use logbook_types::{LogState, ObjectState};
//!
//! let mut log = ActivityLog::new();
//! log.record_v1(
//!     ObjectState::new(),
//!     ActivityRecord::new(1_700_000_000.0, "load-1").state(LogState::Start),
//! )
//! .ok();
//! log.record_v0("arrived at quay", 1_700_000_060.0, serde_json::Value::Null, serde_json::Value::Null)
//!     .ok();
//!
//! let table = log.as_table();
//! assert_eq!(table.len(), 2);
//! ```

pub mod entry;
pub mod log;
pub mod state;
pub mod table;
pub mod time;

// Re-export primary types at crate root.
pub use entry::ActivityRecord;
pub use log::ActivityLog;
pub use state::{LoggedEntity, StateCapture, merge_states};
pub use table::LogTable;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Broad category of a [`LogError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogErrorKind {
    /// A value does not have the required type.
    Type,
    /// A well-typed value breaks a content rule.
    Validation,
    /// An internal invariant was broken.
    Internal,
}

/// Errors that can occur when recording log entries.
///
/// A failed recording call never appends anything.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LogError {
    /// V1 time was not given as float seconds.
    #[error("expected t of type float, got {actual}")]
    TimeNotFloat {
        /// Kind of value that was supplied.
        actual: &'static str,
    },

    /// V0 time was not given as numeric seconds.
    #[error("expected t as numeric seconds, got {actual}")]
    TimeNotNumeric {
        /// Kind of value that was supplied.
        actual: &'static str,
    },

    /// V0 message was not text.
    #[error("expected message of type string, got {actual}")]
    MessageNotText {
        /// Kind of value that was supplied.
        actual: &'static str,
    },

    /// A non-empty activity label lacks `type` or `ref`.
    #[error("activity label is missing required key `{missing}`")]
    IncompleteLabel {
        /// The first required key that was absent.
        missing: &'static str,
    },

    /// The legacy call was made without a time.
    #[error("expected t as second argument or as named argument")]
    MissingTime,

    /// The legacy call was given something other than an absolute time.
    #[error("expected t as an absolute time, got {actual}")]
    TimeNotAbsolute {
        /// Kind of value that was supplied.
        actual: &'static str,
    },

    /// Seconds are not finite or fall outside the representable dates.
    #[error("time {seconds} s is outside the representable range")]
    TimeOutOfRange {
        /// The rejected seconds value.
        seconds: f64,
    },

    /// An internal error that should not occur in normal operation.
    #[error("internal log error: {0}")]
    Internal(&'static str),
}

impl LogError {
    /// The category this error belongs to.
    pub const fn kind(&self) -> LogErrorKind {
        match self {
            Self::TimeNotFloat { .. } | Self::TimeNotNumeric { .. } | Self::MessageNotText { .. } => {
                LogErrorKind::Type
            }
            Self::IncompleteLabel { .. }
            | Self::MissingTime
            | Self::TimeNotAbsolute { .. }
            | Self::TimeOutOfRange { .. } => LogErrorKind::Validation,
            Self::Internal(_) => LogErrorKind::Internal,
        }
    }
}

/// Short name of a JSON value's kind, for error messages.
pub(crate) const fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
