//! Claim document construction and naming.

use chrono::{DateTime, FixedOffset};

use crate::config::ClaimConfig;
use crate::models::{ClaimDocument, Period};

use super::amount::calculate_claim_amount;

/// Date format used in claim file names.
pub const FILE_NAME_DATE_FORMAT: &str = "%Y-%m-%d";

/// Derives the file name of a claim from its full period list.
///
/// The name spans from the first period's start to the last period's end, in
/// stored order, over every period including those that do not fit on the
/// form: `"2024-01-01 until 2024-01-15 Alice support oncall claim.pdf"`.
///
/// Path separators inside the assignee name are replaced with `-` so the
/// file always lands in the output directory.
///
/// Returns `None` for an empty period list.
pub fn claim_file_name(assignee: &str, periods: &[Period]) -> Option<String> {
    let first = periods.first()?;
    let last = periods.last()?;
    let assignee = assignee.replace(['/', '\\'], "-");

    Some(format!(
        "{} until {} {} support oncall claim.pdf",
        first.from.format(FILE_NAME_DATE_FORMAT),
        last.to.format(FILE_NAME_DATE_FORMAT),
        assignee
    ))
}

/// Builds the claim document for one assignee.
///
/// Only the first `config.max_rows` periods become rows; the total follows
/// `config.total_basis`. Returns `None` when the assignee has no periods.
///
/// # Examples
///
/// ```
/// use oncall_claim::claim::build_claim_document;
/// use oncall_claim::config::ClaimConfig;
/// use oncall_claim::models::{AssignmentRecord, Period};
/// use chrono::DateTime;
/// use rust_decimal::Decimal;
///
/// let periods: Vec<Period> = [
///     ("2024-01-01T00:00:00Z", "2024-01-08T00:00:00Z"),
///     ("2024-01-08T00:00:00Z", "2024-01-15T00:00:00Z"),
/// ]
/// .iter()
/// .map(|(s, e)| Period::from_record(&AssignmentRecord::new("Alice", *s, *e)).unwrap())
/// .collect();
///
/// let claim_date = DateTime::parse_from_rfc3339("2024-01-31T00:00:00Z").unwrap();
/// let document = build_claim_document("Alice", &periods, claim_date, &ClaimConfig::default()).unwrap();
///
/// assert_eq!(document.total, Decimal::new(910, 0));
/// assert_eq!(document.file_name, "2024-01-01 until 2024-01-15 Alice support oncall claim.pdf");
/// ```
pub fn build_claim_document(
    assignee: &str,
    periods: &[Period],
    claim_date: DateTime<FixedOffset>,
    config: &ClaimConfig,
) -> Option<ClaimDocument> {
    let file_name = claim_file_name(assignee, periods)?;
    let rows: Vec<Period> = periods.iter().take(config.max_rows).copied().collect();
    let amount = calculate_claim_amount(config.rate, periods.len(), rows.len(), config.total_basis);

    Some(ClaimDocument {
        assignee: assignee.to_string(),
        claim_date,
        rows,
        period_count: periods.len(),
        rate: amount.rate,
        total: amount.total,
        file_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TotalBasis;
    use crate::models::AssignmentRecord;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn weekly_periods(count: usize) -> Vec<Period> {
        let first = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
        (0..count)
            .map(|i| {
                let from = first + Duration::weeks(i as i64);
                Period::new(from, from + Duration::weeks(1))
            })
            .collect()
    }

    fn claim_date() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-06-03T09:00:00+08:00").unwrap()
    }

    /// CD-001: few periods, every one rendered
    #[test]
    fn test_cd_001_all_periods_rendered() {
        let periods = weekly_periods(3);
        let document =
            build_claim_document("Alice", &periods, claim_date(), &ClaimConfig::default()).unwrap();

        assert_eq!(document.rows, periods);
        assert_eq!(document.period_count, 3);
        assert!(!document.is_truncated());
        assert_eq!(document.total, Decimal::new(1365, 0));
    }

    /// CD-002: more than ten periods, capped rows and total, uncapped name
    #[test]
    fn test_cd_002_capped_rows_uncapped_name() {
        let periods = weekly_periods(12);
        let document =
            build_claim_document("Alice", &periods, claim_date(), &ClaimConfig::default()).unwrap();

        assert_eq!(document.rows.len(), 10);
        assert_eq!(document.rows[..], periods[..10]);
        assert_eq!(document.period_count, 12);
        assert!(document.is_truncated());
        // Capped: 10 x 455, not 12 x 455
        assert_eq!(document.total, Decimal::new(4550, 0));
        // 12 weeks from 1 Jan ends 25 Mar
        assert_eq!(
            document.file_name,
            "2024-01-01 until 2024-03-25 Alice support oncall claim.pdf"
        );
    }

    /// CD-003: the total basis can count every period
    #[test]
    fn test_cd_003_all_periods_basis() {
        let config = ClaimConfig {
            total_basis: TotalBasis::AllPeriods,
            ..ClaimConfig::default()
        };
        let document =
            build_claim_document("Alice", &weekly_periods(12), claim_date(), &config).unwrap();

        assert_eq!(document.rows.len(), 10);
        assert_eq!(document.total, Decimal::new(5460, 0));
    }

    /// CD-004: rate and cap come from configuration
    #[test]
    fn test_cd_004_configurable_rate_and_cap() {
        let config = ClaimConfig {
            rate: Decimal::new(10050, 2),
            max_rows: 2,
            ..ClaimConfig::default()
        };
        let document =
            build_claim_document("Alice", &weekly_periods(5), claim_date(), &config).unwrap();

        assert_eq!(document.rows.len(), 2);
        assert_eq!(document.total, Decimal::new(201, 0));
    }

    #[test]
    fn test_empty_periods_yield_no_document() {
        assert!(build_claim_document("Alice", &[], claim_date(), &ClaimConfig::default()).is_none());
        assert!(claim_file_name("Alice", &[]).is_none());
    }

    #[test]
    fn test_file_name_uses_stored_order() {
        // Last stored period ends earlier than the first one starts
        let records = [
            AssignmentRecord::new("Bob", "2024-05-01T00:00:00Z", "2024-05-08T00:00:00Z"),
            AssignmentRecord::new("Bob", "2024-02-01T00:00:00Z", "2024-02-08T00:00:00Z"),
        ];
        let periods: Vec<Period> = records
            .iter()
            .map(|r| Period::from_record(r).unwrap())
            .collect();

        assert_eq!(
            claim_file_name("Bob", &periods).unwrap(),
            "2024-05-01 until 2024-02-08 Bob support oncall claim.pdf"
        );
    }

    #[test]
    fn test_file_name_replaces_path_separators() {
        let name = claim_file_name("Ops/Infra", &weekly_periods(1)).unwrap();
        assert_eq!(name, "2024-01-01 until 2024-01-08 Ops-Infra support oncall claim.pdf");
    }

    #[test]
    fn test_file_name_is_deterministic() {
        let periods = weekly_periods(4);
        assert_eq!(
            claim_file_name("Alice", &periods),
            claim_file_name("Alice", &periods.clone())
        );
    }
}
