//! Claim amount calculation.
//!
//! Each on-call period is claimed at a flat rate. This module computes the
//! grand total for a claim form and formats amounts the way the form prints
//! them.

use rust_decimal::Decimal;

use crate::config::TotalBasis;

/// The computed total of a claim form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimAmount {
    /// Amount per period.
    pub rate: Decimal,
    /// Number of periods the total was computed from.
    pub counted_periods: usize,
    /// `rate x counted_periods`.
    pub total: Decimal,
}

/// Calculates the grand total for a claim.
///
/// # Arguments
///
/// * `rate` - The flat amount per period
/// * `period_count` - How many periods the claimant has
/// * `rendered_rows` - How many of them fit on the form
/// * `basis` - Which of the two counts the total is based on
///
/// With [`TotalBasis::RenderedRows`] a claimant with more periods than rows
/// is only paid for the printed rows.
///
/// # Examples
///
/// ```
/// use oncall_claim::claim::calculate_claim_amount;
/// use oncall_claim::config::TotalBasis;
/// use rust_decimal::Decimal;
///
/// let amount = calculate_claim_amount(Decimal::new(45500, 2), 12, 10, TotalBasis::RenderedRows);
/// assert_eq!(amount.counted_periods, 10);
/// assert_eq!(amount.total, Decimal::new(4550, 0));
/// ```
pub fn calculate_claim_amount(
    rate: Decimal,
    period_count: usize,
    rendered_rows: usize,
    basis: TotalBasis,
) -> ClaimAmount {
    let counted_periods = match basis {
        TotalBasis::RenderedRows => rendered_rows.min(period_count),
        TotalBasis::AllPeriods => period_count,
    };

    ClaimAmount {
        rate,
        counted_periods,
        total: rate * Decimal::from(counted_periods),
    }
}

/// Formats an amount with its currency prefix, e.g. "RM 455" or "RM 455.5".
///
/// Trailing zeros are dropped.
pub fn format_amount(currency: &str, amount: Decimal) -> String {
    format!("{} {}", currency, amount.normalize())
}
