//! Enumeration types for activity log entries.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Activity lifecycle state
// ---------------------------------------------------------------------------

/// Lifecycle state of an activity at the moment an entry was recorded.
///
/// Serialized and exported by name (`"START"`, `"WAIT_STOP"`, ...). Each
/// state also carries a stable integer code, see [`LogState::code`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum LogState {
    /// The activity began.
    Start,
    /// The activity finished.
    Stop,
    /// The activity started waiting (e.g. for a resource or another activity).
    WaitStart,
    /// The activity stopped waiting.
    WaitStop,
    /// State was not specified by the caller.
    #[default]
    Unknown,
}

impl LogState {
    /// All states, in code order with [`LogState::Unknown`] last.
    pub const ALL: [Self; 5] = [
        Self::Start,
        Self::Stop,
        Self::WaitStart,
        Self::WaitStop,
        Self::Unknown,
    ];

    /// The exported name of this state.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Stop => "STOP",
            Self::WaitStart => "WAIT_START",
            Self::WaitStop => "WAIT_STOP",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// The integer code of this state (`-1` for [`LogState::Unknown`]).
    pub const fn code(self) -> i8 {
        match self {
            Self::Start => 1,
            Self::Stop => 2,
            Self::WaitStart => 3,
            Self::WaitStop => 4,
            Self::Unknown => -1,
        }
    }
}

impl core::fmt::Display for LogState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Entry schema version
// ---------------------------------------------------------------------------

/// Which historical record schema an entry follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EntrySchema {
    /// Legacy message schema: message, timestamp, value, geometry.
    V0,
    /// Activity schema: timestamp, activity id, state, object state, label.
    V1,
}
