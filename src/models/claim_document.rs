//! Claim document model.
//!
//! A [`ClaimDocument`] holds everything printed on one person's claim form.
//! It is built once from grouped periods and never mutated afterwards.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Period;

/// Format used for the claim reference date ("Monday, 02 Jan 2006").
pub const CLAIM_DATE_FORMAT: &str = "%A, %d %b %Y";

/// The content of a single claim form.
///
/// # Example
///
/// ```
/// use oncall_claim::models::ClaimDocument;
/// use chrono::DateTime;
/// use rust_decimal::Decimal;
///
/// let claim_date = DateTime::parse_from_rfc3339("2024-02-05T10:00:00Z").unwrap();
/// let document = ClaimDocument {
///     assignee: "Alice".to_string(),
///     claim_date,
///     rows: vec![],
///     period_count: 0,
///     rate: Decimal::new(45500, 2),
///     total: Decimal::ZERO,
///     file_name: "claim.pdf".to_string(),
/// };
/// assert_eq!(document.claim_date_label(), "Monday, 05 Feb 2024");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimDocument {
    /// Display name of the claimant.
    pub assignee: String,
    /// Reference date printed under the name.
    pub claim_date: DateTime<FixedOffset>,
    /// Periods printed as rows, in stored order (capped).
    pub rows: Vec<Period>,
    /// Number of periods the claimant actually has (uncapped).
    pub period_count: usize,
    /// Amount per period.
    pub rate: Decimal,
    /// Grand total printed at the bottom of the form.
    pub total: Decimal,
    /// File name derived from the full period range and the claimant.
    pub file_name: String,
}

impl ClaimDocument {
    /// Returns the formatted claim reference date.
    pub fn claim_date_label(&self) -> String {
        self.claim_date.format(CLAIM_DATE_FORMAT).to_string()
    }

    /// Returns `true` when some periods did not fit on the form.
    pub fn is_truncated(&self) -> bool {
        self.period_count > self.rows.len()
    }
}
