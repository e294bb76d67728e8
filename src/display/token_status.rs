//! Token status display for temporal claims.
//!
//! Renders human-readable status information for JWT temporal claims
//! (`exp`, `iat`, `nbf`) including expiry status with color coding.

use chrono::{DateTime, Duration, Utc};
use jwt_codec::core::ClaimSet;
use owo_colors::OwoColorize;
use serde_json::Value;

use super::{paint, section_heading};

/// The temporal claims of a token, verified or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemporalClaims {
    pub issued_at: Option<DateTime<Utc>>,
    pub expiration: Option<DateTime<Utc>>,
    pub not_before: Option<DateTime<Utc>>,
}

impl TemporalClaims {
    /// Read `iat`, `exp` and `nbf` from a raw payload. Values that are not
    /// numeric dates are ignored.
    pub fn from_payload(payload: &Value) -> Self {
        let read = |name: &str| {
            payload
                .get(name)
                .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
                .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
        };
        Self {
            issued_at: read("iat"),
            expiration: read("exp"),
            not_before: read("nbf"),
        }
    }
}

impl From<&ClaimSet> for TemporalClaims {
    fn from(claims: &ClaimSet) -> Self {
        Self {
            issued_at: claims.issued_at,
            expiration: claims.expiration,
            not_before: claims.not_before,
        }
    }
}

/// Render the temporal status of a token as of `now`.
///
/// Lists each present temporal claim with its distance from `now`, then a
/// status line:
/// - Expired tokens: red "EXPIRED (X ago)"
/// - Not-yet-valid tokens: yellow "NOT YET VALID (valid in X)"
/// - Valid tokens: green "VALID (expires in X)"
///
/// `now` is truncated to whole seconds, the resolution decoding uses.
pub fn render_token_status(claims: &TemporalClaims, now: DateTime<Utc>, use_color: bool) -> String {
    let now = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
    let mut lines = vec![section_heading("Token Status", use_color)];

    for (label, at) in [
        ("Issued at", claims.issued_at),
        ("Not before", claims.not_before),
        ("Expires", claims.expiration),
    ] {
        if let Some(at) = at {
            lines.push(format!(
                "{:<12}{} ({})",
                format!("{label}:"),
                at.format("%Y-%m-%d %H:%M:%S UTC"),
                relative_to(at, now)
            ));
        }
    }

    let status = match (claims.expiration, claims.not_before) {
        (Some(exp), _) if exp < now => paint(
            &format!("EXPIRED ({} ago)", format_duration(now - exp)),
            use_color,
            |s| s.red().bold().to_string(),
        ),
        (_, Some(nbf)) if nbf > now => paint(
            &format!("NOT YET VALID (valid in {})", format_duration(nbf - now)),
            use_color,
            |s| s.yellow().bold().to_string(),
        ),
        (Some(exp), _) => paint(
            &format!("VALID (expires in {})", format_duration(exp - now)),
            use_color,
            |s| s.green().bold().to_string(),
        ),
        (None, _) => paint("VALID (no expiration)", use_color, |s| {
            s.green().bold().to_string()
        }),
    };
    lines.push(format!("{:<12}{status}", "Status:"));

    lines.join("\n")
}

fn relative_to(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if at <= now {
        format!("{} ago", format_duration(now - at))
    } else {
        format!("in {}", format_duration(at - now))
    }
}

/// Format a duration with its two most significant units, e.g. `3d 4h`.
pub fn format_duration(duration: Duration) -> String {
    let mut remaining = duration.num_seconds().unsigned_abs();
    if remaining == 0 {
        return "0s".to_string();
    }

    let mut parts = Vec::new();
    for (unit, seconds) in [("d", 86_400), ("h", 3_600), ("m", 60), ("s", 1)] {
        let count = remaining / seconds;
        remaining %= seconds;
        if count > 0 || !parts.is_empty() {
            parts.push(format!("{count}{unit}"));
        }
        if parts.len() == 2 {
            break;
        }
    }
    parts.retain(|p| !p.starts_with('0'));
    parts.join(" ")
}
