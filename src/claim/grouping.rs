//! Grouping of assignment records into per-person periods.
//!
//! This module partitions a flat, time-ordered list of assignment records
//! into one ordered period list per assignee.

use tracing::warn;

use crate::error::ClaimError;
use crate::models::{AssignmentRecord, Period, PersonPeriods};

/// A record that was left out of the grouping because it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record in the input.
    pub index: usize,
    /// The assignee named by the record.
    pub assignee: String,
    /// Why the record was skipped.
    pub error: ClaimError,
}

/// The result of grouping assignment records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingResult {
    /// Periods per assignee, each list in input order.
    pub periods: PersonPeriods,
    /// Records dropped because a timestamp did not parse.
    pub skipped: Vec<SkippedRecord>,
}

impl GroupingResult {
    /// Returns the number of periods across all assignees.
    pub fn period_count(&self) -> usize {
        self.periods.values().map(Vec::len).sum()
    }
}

/// Groups assignment records by assignee.
///
/// Each record becomes one [`Period`] appended to its assignee's list, so the
/// periods of a person appear in the same relative order as their records.
/// Nothing is sorted, merged or deduplicated.
///
/// A record whose `start` or `end` is not valid RFC 3339 is skipped: it is
/// logged, listed in [`GroupingResult::skipped`], and does not affect any
/// other record. An assignee whose every record was skipped has no entry.
///
/// # Examples
///
/// ```
/// use oncall_claim::claim::group_assignments;
/// use oncall_claim::models::AssignmentRecord;
///
/// let records = vec![
///     AssignmentRecord::new("Alice", "2024-01-01T00:00:00Z", "2024-01-08T00:00:00Z"),
///     AssignmentRecord::new("Bob", "2024-01-01T00:00:00Z", "2024-01-08T00:00:00Z"),
///     AssignmentRecord::new("Alice", "2024-01-08T00:00:00Z", "2024-01-15T00:00:00Z"),
/// ];
///
/// let result = group_assignments(&records);
/// assert_eq!(result.periods["Alice"].len(), 2);
/// assert_eq!(result.periods["Bob"].len(), 1);
/// assert!(result.skipped.is_empty());
/// ```
pub fn group_assignments(records: &[AssignmentRecord]) -> GroupingResult {
    let mut result = GroupingResult::default();

    for (index, record) in records.iter().enumerate() {
        match Period::from_record(record) {
            Ok(period) => result
                .periods
                .entry(record.assignee.clone())
                .or_default()
                .push(period),
            Err(error) => {
                warn!(
                    index,
                    assignee = %record.assignee,
                    error = %error,
                    "Skipping assignment with unparseable timestamp"
                );
                result.skipped.push(SkippedRecord {
                    index,
                    assignee: record.assignee.clone(),
                    error,
                });
            }
        }
    }

    result
}
