//! Shared type definitions for the Logbook simulation logger.
//!
//! This crate is the single source of truth for the log record model used
//! across the workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for visualization front-ends.
//!
//! # Modules
//!
//! - [`ids`] -- Entity/run UUID wrappers and the opaque [`ActivityId`]
//! - [`enums`] -- [`LogState`] lifecycle states and [`EntrySchema`]
//! - [`structs`] -- V0/V1 entries, the [`LogEntry`] union, labels, time input

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{EntrySchema, LogState};
pub use ids::{ActivityId, EntityId, RunId};
pub use structs::{
    ActivityEntry, ActivityLabel, LABEL_REF_KEY, LABEL_TYPE_KEY, LogEntry, MessageEntry,
    ObjectState, TimeValue,
};
