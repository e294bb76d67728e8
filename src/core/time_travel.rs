//! Time expressions for temporal claims.
//!
//! Resolves expressions such as `+15m`, `2024-01-15T14:30:00Z` or
//! `1705312200` to an absolute instant. The CLI uses them for `iat`,
//! `exp` and `nbf` when encoding, and to evaluate a token at a simulated
//! moment when decoding.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::error::JwtCodecError;

const SECONDS_PER_UNIT: [(char, i64); 6] = [
    ('s', 1),
    ('m', 60),
    ('h', 3_600),
    ('d', 86_400),
    ('w', 604_800),
    ('y', 31_536_000),
];

/// A parsed time target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeTarget {
    /// The resolved absolute timestamp.
    pub timestamp: DateTime<Utc>,
    /// The original expression provided by the user.
    pub expression: String,
}

/// Parse a time expression relative to the current time.
///
/// Supports the following formats:
/// - `now`
/// - Relative: `+7d`, `-1h`, `+30m`, `+2w`, `+1y`, `-5s` (a year is 365 days)
/// - Absolute ISO 8601: `2024-01-15T14:30:00Z`, `2024-01-15T14:30:00+02:00`,
///   `2024-01-15T14:30:00` (UTC) or `2024-01-15` (midnight UTC)
/// - Absolute Unix epoch seconds: `1705312200`
///
/// # Errors
///
/// Returns [`JwtCodecError::InvalidTimeExpression`] if the expression
/// doesn't match any known format or lands outside the representable range.
pub fn parse_time_expression(expression: &str) -> Result<TimeTarget, JwtCodecError> {
    parse_time_expression_at(expression, Utc::now())
}

/// Parse a time expression, resolving relative forms against `now`.
///
/// # Errors
///
/// See [`parse_time_expression`].
pub fn parse_time_expression_at(
    expression: &str,
    now: DateTime<Utc>,
) -> Result<TimeTarget, JwtCodecError> {
    let trimmed = expression.trim();
    let invalid = |reason: String| JwtCodecError::InvalidTimeExpression {
        expression: expression.to_string(),
        reason,
    };

    let timestamp = if trimmed.is_empty() {
        return Err(invalid("expression is empty".to_string()));
    } else if trimmed.eq_ignore_ascii_case("now") {
        now
    } else if let Some(offset) = trimmed.strip_prefix('+') {
        let delta = parse_offset(offset).map_err(invalid)?;
        now.checked_add_signed(delta)
            .ok_or_else(|| invalid("result is out of range".to_string()))?
    } else if let Some(offset) = trimmed.strip_prefix('-') {
        let delta = parse_offset(offset).map_err(invalid)?;
        now.checked_sub_signed(delta)
            .ok_or_else(|| invalid("result is out of range".to_string()))?
    } else if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let seconds: i64 = trimmed
            .parse()
            .map_err(|_| invalid("epoch seconds are out of range".to_string()))?;
        DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| invalid("epoch seconds are out of range".to_string()))?
    } else {
        parse_absolute(trimmed).ok_or_else(|| {
            invalid(
                "expected 'now', a signed offset like +7d, an ISO 8601 date-time, or epoch seconds"
                    .to_string(),
            )
        })?
    };

    Ok(TimeTarget {
        timestamp,
        expression: trimmed.to_string(),
    })
}

/// Parse the magnitude and unit of a relative offset such as `7d`.
fn parse_offset(offset: &str) -> Result<Duration, String> {
    let Some(unit) = offset.chars().last() else {
        return Err("missing amount and unit after the sign".to_string());
    };
    let amount = &offset[..offset.len() - unit.len_utf8()];

    let Some(&(_, unit_seconds)) = SECONDS_PER_UNIT.iter().find(|(u, _)| *u == unit) else {
        return Err(format!(
            "unknown unit '{}' (expected one of s, m, h, d, w, y)",
            unit.escape_default()
        ));
    };
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not a whole number", amount.escape_default()));
    }

    amount
        .parse::<i64>()
        .ok()
        .and_then(|n| n.checked_mul(unit_seconds))
        .and_then(Duration::try_seconds)
        .ok_or_else(|| "offset is out of range".to_string())
}

fn parse_absolute(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
