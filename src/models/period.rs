//! On-call period model.
//!
//! This module defines [`Period`], the parsed time window of one assignment,
//! and [`PersonPeriods`], the per-assignee grouping of periods.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{ClaimError, ClaimResult};

use super::AssignmentRecord;

/// Format used for a period's dates on the claim form ("02 Jan 2006").
pub const ROW_DATE_FORMAT: &str = "%d %b %Y";

/// Periods keyed by assignee display name.
///
/// Iteration is lexicographic by assignee so that documents are produced in a
/// stable order; the periods of each assignee keep their input order.
pub type PersonPeriods = BTreeMap<String, Vec<Period>>;

/// The time window of one on-call assignment.
///
/// Timestamps keep the UTC offset they were supplied with, so dates render
/// in the schedule's own timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Start of the window.
    pub from: DateTime<FixedOffset>,
    /// End of the window.
    pub to: DateTime<FixedOffset>,
}

impl Period {
    /// Creates a period from already-parsed timestamps.
    pub fn new(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> Self {
        Self { from, to }
    }

    /// Parses the RFC 3339 timestamps of an assignment record.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::TimestampParse`] naming the first timestamp that
    /// failed to parse.
    ///
    /// # Example
    ///
    /// ```
    /// use oncall_claim::models::{AssignmentRecord, Period};
    ///
    /// let record = AssignmentRecord::new("Alice", "2024-01-01T00:00:00+08:00", "2024-01-08T00:00:00+08:00");
    /// let period = Period::from_record(&record).unwrap();
    /// assert_eq!(period.date_range_label(), "01 Jan 2024 to 08 Jan 2024");
    /// ```
    pub fn from_record(record: &AssignmentRecord) -> ClaimResult<Self> {
        let from = parse_timestamp("start", &record.start)?;
        let to = parse_timestamp("end", &record.end)?;
        Ok(Self { from, to })
    }

    /// Returns the row text for this period, e.g. "01 Jan 2024 to 08 Jan 2024".
    pub fn date_range_label(&self) -> String {
        format!(
            "{} to {}",
            self.from.format(ROW_DATE_FORMAT),
            self.to.format(ROW_DATE_FORMAT)
        )
    }
}

fn parse_timestamp(field: &str, value: &str) -> ClaimResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|e| ClaimError::TimestampParse {
        field: field.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}
