//! Activity dependencies inferred from recorded activities.
//!
//! The critical path of a run is a chain of activities where each one
//! could only begin because the previous one ended. The recorded logs do
//! not say which activity waited on which, so this module approximates it
//! from timing alone: when activity A stops at exactly the instant
//! activity B starts (or stops waiting), B is taken to depend on A.
//!
//! The rule is deliberately generous. Unrelated activities that happen to
//! share a boundary instant are linked too, so the result is a candidate
//! list for a later graph step, not a verdict.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use logbook_core::ActivityLog;
use logbook_types::{ActivityId, LogState};

use crate::recorded::{RecordedActivity, recorded_activities};

/// A directed dependency: `effect` depends on `cause`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Dependency {
    /// The activity that ended.
    pub cause: ActivityId,
    /// The activity that began (or resumed) as it ended.
    pub effect: ActivityId,
}

/// Source of activity dependencies for critical-path construction.
pub trait DependencySource {
    /// All dependencies, each listed once.
    fn dependency_list(&self) -> Vec<Dependency>;
}

/// Dependencies matched on identical timestamps of recorded activities.
#[derive(Debug, Clone, Default)]
pub struct DependenciesFromRecordedActivities {
    recorded: Vec<RecordedActivity>,
}

impl DependenciesFromRecordedActivities {
    /// Wrap already collected activities; they are re-sorted by time.
    pub fn new(mut recorded: Vec<RecordedActivity>) -> Self {
        recorded.sort_by_key(|row| row.timestamp);
        Self { recorded }
    }

    /// Collect activities from every `(name, log)` pair.
    pub fn from_logs<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a ActivityLog)>,
    {
        Self {
            recorded: recorded_activities(sources),
        }
    }

    /// The activities the dependencies are inferred from, in time order.
    pub fn recorded_activities(&self) -> &[RecordedActivity] {
        &self.recorded
    }
}

impl DependencySource for DependenciesFromRecordedActivities {
    /// Pairs are ordered by the instant they were found at, then by log
    /// order within that instant.
    fn dependency_list(&self) -> Vec<Dependency> {
        let mut seen = BTreeSet::new();
        let mut dependencies = Vec::new();

        for instant in self.recorded.chunk_by(|a, b| a.timestamp == b.timestamp) {
            let causes = instant
                .iter()
                .filter(|row| row.activity_state == LogState::Stop);
            for cause in causes {
                let effects = instant.iter().filter(|row| is_effect(row.activity_state));
                for effect in effects {
                    if effect.activity_id == cause.activity_id {
                        continue;
                    }
                    let dependency = Dependency {
                        cause: cause.activity_id.clone(),
                        effect: effect.activity_id.clone(),
                    };
                    if seen.insert(dependency.clone()) {
                        dependencies.push(dependency);
                    }
                }
            }
        }

        debug!(
            recorded = self.recorded.len(),
            dependencies = dependencies.len(),
            "dependencies inferred from recorded activities"
        );
        dependencies
    }
}

/// States that mark an activity getting under way.
const fn is_effect(state: LogState) -> bool {
    matches!(state, LogState::Start | LogState::WaitStop)
}
