//! Relative time expressions for the claim window.
//!
//! Users give the window as `now-1mo`, `now-2w`, `now+1d`, chains such as
//! `now-1mo+3d`, or absolute RFC 3339 timestamps. Resolution happens at the
//! entry points; the claim engine only sees absolute timestamps.

use chrono::{DateTime, Months, TimeDelta, Utc};

use crate::error::{ClaimError, ClaimResult};

const NOW: &str = "now";

/// Resolves a time expression against `now`.
///
/// Supported units: `y` (years), `mo` (months), `w` (weeks), `d` (days),
/// `h` (hours), `m` (minutes), `s` (seconds). A term without a sign reuses
/// the previous term's sign, so `now-1w2d` is nine days ago.
///
/// # Examples
///
/// ```
/// use oncall_claim::time_expr::parse_time_expression;
/// use chrono::{DateTime, Utc};
///
/// let now: DateTime<Utc> = "2024-03-31T12:00:00Z".parse().unwrap();
///
/// let since = parse_time_expression("now-1mo", now).unwrap();
/// assert_eq!(since.to_rfc3339(), "2024-02-29T12:00:00+00:00");
///
/// let fixed = parse_time_expression("2024-01-01T00:00:00+08:00", now).unwrap();
/// assert_eq!(fixed.to_rfc3339(), "2023-12-31T16:00:00+00:00");
/// ```
pub fn parse_time_expression(expression: &str, now: DateTime<Utc>) -> ClaimResult<DateTime<Utc>> {
    let trimmed = expression.trim();
    let invalid = |message: &str| ClaimError::InvalidTimeExpression {
        expression: expression.to_string(),
        message: message.to_string(),
    };

    let Some(mut rest) = trimmed.strip_prefix(NOW) else {
        return DateTime::parse_from_rfc3339(trimmed)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| invalid(&e.to_string()));
    };

    let mut resolved = now;
    let mut sign: Option<bool> = None;

    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix('+') {
            sign = Some(false);
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('-') {
            sign = Some(true);
            rest = stripped;
        }
        let Some(negative) = sign else {
            return Err(invalid("expected '+' or '-' after 'now'"));
        };

        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 {
            return Err(invalid("expected a number"));
        }
        let amount: i64 = rest[..digits]
            .parse()
            .map_err(|_| invalid("number out of range"))?;
        rest = &rest[digits..];

        let unit_len = rest.chars().take_while(char::is_ascii_alphabetic).count();
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        resolved = apply_term(resolved, amount, unit, negative).ok_or_else(|| match unit {
            "y" | "mo" | "w" | "d" | "h" | "m" | "s" => invalid("result out of range"),
            "" => invalid("missing unit"),
            _ => invalid(&format!("unknown unit '{}'", unit)),
        })?;
    }

    Ok(resolved)
}

fn apply_term(
    at: DateTime<Utc>,
    amount: i64,
    unit: &str,
    negative: bool,
) -> Option<DateTime<Utc>> {
    let months = match unit {
        "y" => Some(amount.checked_mul(12)?),
        "mo" => Some(amount),
        _ => None,
    };

    if let Some(months) = months {
        let months = Months::new(u32::try_from(months).ok()?);
        return if negative {
            at.checked_sub_months(months)
        } else {
            at.checked_add_months(months)
        };
    }

    let seconds_per_unit = match unit {
        "w" => 7 * 86_400,
        "d" => 86_400,
        "h" => 3_600,
        "m" => 60,
        "s" => 1,
        _ => return None,
    };
    let delta = TimeDelta::try_seconds(amount.checked_mul(seconds_per_unit)?)?;

    if negative {
        at.checked_sub_signed(delta)
    } else {
        at.checked_add_signed(delta)
    }
}
