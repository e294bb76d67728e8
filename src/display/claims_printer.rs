//! Rendering of a verified claim set.

use jwt_codec::core::{ClaimSet, SignatureAlgorithm};
use owo_colors::OwoColorize;

use super::{paint, section_heading};

/// Render the claims of a verified token as labelled lines.
///
/// Unset registered claims are omitted. Custom claims follow in their
/// original order, structured values as compact JSON.
pub fn render_claim_set(claims: &ClaimSet, algorithm: SignatureAlgorithm, use_color: bool) -> String {
    let label = |text: &str| paint(&format!("{text:<12}"), use_color, |s| s.cyan().to_string());
    let timestamp = |at: chrono::DateTime<chrono::Utc>| {
        format!("{} ({})", at.format("%Y-%m-%d %H:%M:%S UTC"), at.timestamp())
    };

    let mut lines = vec![
        section_heading("Verified Claims", use_color),
        format!(
            "{}{}",
            label("Algorithm:"),
            paint(algorithm.short_name(), use_color, |s| s.green().bold().to_string())
        ),
    ];

    let registered = [
        ("Issuer:", claims.issuer.clone()),
        ("Subject:", claims.subject.clone()),
        ("Audience:", claims.audience.as_ref().map(ToString::to_string)),
        ("Issued at:", claims.issued_at.map(timestamp)),
        ("Expires:", claims.expiration.map(timestamp)),
        ("Not before:", claims.not_before.map(timestamp)),
        ("JWT ID:", claims.unique_id.clone()),
    ];
    for (name, value) in registered {
        if let Some(value) = value {
            lines.push(format!("{}{value}", label(name)));
        }
    }

    if !claims.other_claims().is_empty() {
        lines.push(section_heading("Custom Claims", use_color));
        for claim in claims.other_claims() {
            lines.push(format!(
                "{}: {}",
                paint(claim.key(), use_color, |s| s.cyan().to_string()),
                claim.value()
            ));
        }
    }

    lines.join("\n")
}
