//! Schedule sources supplying on-call assignment records.
//!
//! The claim engine only needs a list of [`AssignmentRecord`]s; where they
//! come from is behind the [`ScheduleSource`] trait. [`PagerDutyClient`] is
//! the production source.

mod pagerduty;

use chrono::{DateTime, Utc};

use crate::error::ClaimResult;
use crate::models::AssignmentRecord;

pub use pagerduty::{DEFAULT_PAGERDUTY_URL, PagerDutyClient};

/// What to fetch from a schedule source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleQuery {
    /// Name (or name fragment) of the schedule.
    pub schedule_name: String,
    /// Start of the window.
    pub since: DateTime<Utc>,
    /// End of the window.
    pub until: DateTime<Utc>,
    /// API credential for the service.
    pub api_token: String,
}

/// A supplier of rendered on-call assignments.
pub trait ScheduleSource: Send + Sync {
    /// Fetches the assignments of the queried schedule within its window,
    /// in the order the service renders them.
    fn fetch_assignments(&self, query: &ScheduleQuery) -> ClaimResult<Vec<AssignmentRecord>>;
}

/// A fixed list of assignments, returned for any query.
#[derive(Debug, Clone, Default)]
pub struct StaticSchedule {
    records: Vec<AssignmentRecord>,
}

impl StaticSchedule {
    /// Creates a source that always returns `records`.
    pub fn new(records: Vec<AssignmentRecord>) -> Self {
        Self { records }
    }
}

impl ScheduleSource for StaticSchedule {
    fn fetch_assignments(&self, _query: &ScheduleQuery) -> ClaimResult<Vec<AssignmentRecord>> {
        Ok(self.records.clone())
    }
}
