//! Conversion of simulated seconds into stored wall-clock timestamps.
//!
//! The simulation clock counts seconds since the Unix epoch as `f64`.
//! Entries store a naive wall-clock reading of that instant:
//!
//! - V1 entries use the UTC reading ([`utc_wall_clock`]).
//! - V0 entries use the local-zone reading ([`local_wall_clock`]).
//!
//! Both are resolved to whole microseconds, rounding to nearest.

use chrono::{DateTime, Local, NaiveDateTime, Utc};

use logbook_types::TimeValue;

use crate::LogError;

/// Microseconds in one second.
const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Largest magnitude of microseconds accepted before the integer cast.
///
/// Below `i64::MAX` and well above chrono's own date range, so chrono
/// remains the authority on which instants exist.
const MAX_ABS_MICROS: f64 = 9.0e18;

/// Accept only float seconds (V1 rule).
pub const fn require_float(t: &TimeValue) -> Result<f64, LogError> {
    match t {
        TimeValue::Float(seconds) => Ok(*seconds),
        other => Err(LogError::TimeNotFloat {
            actual: other.kind_name(),
        }),
    }
}

/// Accept float or integer seconds (V0 rule).
#[allow(clippy::cast_precision_loss)]
pub const fn require_numeric(t: &TimeValue) -> Result<f64, LogError> {
    match t {
        TimeValue::Float(seconds) => Ok(*seconds),
        TimeValue::Integer(seconds) => Ok(*seconds as f64),
        other => Err(LogError::TimeNotNumeric {
            actual: other.kind_name(),
        }),
    }
}

/// Accept only an absolute time (legacy call rule).
pub const fn require_absolute(t: &TimeValue) -> Result<DateTime<Utc>, LogError> {
    match t {
        TimeValue::Absolute(at) => Ok(*at),
        other => Err(LogError::TimeNotAbsolute {
            actual: other.kind_name(),
        }),
    }
}

/// Resolve seconds since the epoch to an instant.
///
/// # Errors
///
/// Returns [`LogError::TimeOutOfRange`] for non-finite seconds or instants
/// outside chrono's supported range.
pub fn instant_from_seconds(seconds: f64) -> Result<DateTime<Utc>, LogError> {
    let micros = (seconds * MICROS_PER_SECOND).round();
    if !micros.is_finite() || micros.abs() >= MAX_ABS_MICROS {
        return Err(LogError::TimeOutOfRange { seconds });
    }
    // In range per the check above.
    #[allow(clippy::cast_possible_truncation)]
    let micros = micros as i64;
    DateTime::from_timestamp_micros(micros).ok_or(LogError::TimeOutOfRange { seconds })
}

/// UTC wall-clock reading of `seconds` since the epoch.
pub fn utc_wall_clock(seconds: f64) -> Result<NaiveDateTime, LogError> {
    instant_from_seconds(seconds).map(|at| at.naive_utc())
}

/// Local-zone wall-clock reading of `seconds` since the epoch.
pub fn local_wall_clock(seconds: f64) -> Result<NaiveDateTime, LogError> {
    instant_from_seconds(seconds).map(|at| at.with_timezone(&Local).naive_local())
}

/// Seconds since the epoch of an absolute time, at microsecond precision.
#[allow(clippy::cast_precision_loss)]
pub fn seconds_since_epoch(at: DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / MICROS_PER_SECOND
}
