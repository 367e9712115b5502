//! Post-run analysis of recorded activity logs.
//!
//! Consumes the read side of [`logbook_core::ActivityLog`] after a
//! simulation run has finished and infers which activities depend on
//! which, as input for critical-path construction.
//!
//! # Modules
//!
//! - [`recorded`] -- [`RecordedActivity`] rows gathered from many logs.
//! - [`dependencies`] -- The [`DependencySource`] trait and
//!   [`DependenciesFromRecordedActivities`].

pub mod dependencies;
pub mod recorded;

pub use dependencies::{Dependency, DependenciesFromRecordedActivities, DependencySource};
pub use recorded::{RecordedActivity, recorded_activities};
