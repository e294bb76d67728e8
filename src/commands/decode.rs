//! Handler for the `decode` subcommand.
//!
//! Verifies a JWT with the selected algorithm and key, checks its
//! validity window (optionally at a simulated time), and prints the
//! verified claims.

use anyhow::Result;
use chrono::{DateTime, Utc};
use jwt_codec::core::time_travel::parse_time_expression;
use jwt_codec::core::{ClaimSet, SignatureAlgorithm, decode_at};
use serde::Serialize;
use tracing::debug;

use super::{read_key, read_token};
use crate::cli::DecodeArgs;
use crate::display::claims_printer::render_claim_set;
use crate::display::stdout_supports_color;
use crate::display::token_status::{TemporalClaims, render_token_status};

/// Machine-readable output of `decode --json`.
#[derive(Serialize)]
struct DecodeReport<'a> {
    algorithm: &'a str,
    evaluated_at: DateTime<Utc>,
    claims: &'a ClaimSet,
}

/// Execute the `decode` subcommand with the given arguments.
pub fn execute(args: &DecodeArgs) -> Result<()> {
    let token = read_token(&args.token)?;
    let algorithm = SignatureAlgorithm::select(args.alg.as_deref())?;
    let key = read_key(&args.key)?;

    let now = match &args.time_travel {
        Some(expression) => {
            let target = parse_time_expression(expression)?;
            debug!(expression = %target.expression, at = %target.timestamp, "time travel");
            target.timestamp
        }
        None => Utc::now(),
    };

    let claims = decode_at(&token, algorithm, &key, now)?;
    debug!(%algorithm, key = key.kind(), "token verified");

    if args.json {
        let report = DecodeReport {
            algorithm: algorithm.short_name(),
            evaluated_at: now,
            claims: &claims,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let use_color = stdout_supports_color();
    println!("{}", render_claim_set(&claims, algorithm, use_color));
    println!();
    println!(
        "{}",
        render_token_status(&TemporalClaims::from(&claims), now, use_color)
    );
    Ok(())
}
