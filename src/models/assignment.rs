//! Assignment record model.
//!
//! An [`AssignmentRecord`] is one rendered entry of an on-call schedule, as
//! handed over by the schedule source. Timestamps are kept as the raw strings
//! the source supplied; parsing happens during grouping.

use serde::{Deserialize, Serialize};

/// One entry describing a person being on call for a contiguous time window.
///
/// # Example
///
/// ```
/// use oncall_claim::models::AssignmentRecord;
///
/// let record = AssignmentRecord::new("Alice", "2024-01-01T00:00:00Z", "2024-01-08T00:00:00Z");
/// assert_eq!(record.assignee, "Alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Display name of the person on call.
    pub assignee: String,
    /// Start of the window, RFC 3339.
    pub start: String,
    /// End of the window, RFC 3339.
    pub end: String,
}

impl AssignmentRecord {
    /// Creates a record from its parts.
    pub fn new(
        assignee: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            assignee: assignee.into(),
            start: start.into(),
            end: end.into(),
        }
    }
}
