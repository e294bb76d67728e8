//! Handler for the `encode` subcommand.
//!
//! Builds a claim set from the command-line options, signs it with the
//! selected algorithm and key, and prints the compact token.

use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};
use jwt_codec::core::time_travel::parse_time_expression_at;
use jwt_codec::core::{Audience, ClaimSet, SignatureAlgorithm, encode};
use tracing::debug;

use super::read_key;
use crate::cli::EncodeArgs;

/// Execute the `encode` subcommand with the given arguments.
pub fn execute(args: &EncodeArgs) -> Result<()> {
    let algorithm = SignatureAlgorithm::select(args.alg.as_deref())?;
    let key = read_key(&args.key)?;
    let claims = build_claims(args, Utc::now())?;

    let started = Instant::now();
    let token = encode(&claims, algorithm, &key)?;
    debug!(
        %algorithm,
        key = key.kind(),
        custom_claims = claims.other_claims().len(),
        elapsed = ?started.elapsed(),
        "token encoded"
    );

    println!("{token}");
    Ok(())
}

/// Time expressions are resolved against a single `now`, so `--iat now
/// --exp +15m` yields exactly fifteen minutes of validity.
fn build_claims(args: &EncodeArgs, now: DateTime<Utc>) -> Result<ClaimSet> {
    let resolve = |expression: &Option<String>| -> Result<Option<DateTime<Utc>>> {
        Ok(match expression {
            Some(expression) => Some(parse_time_expression_at(expression, now)?.timestamp),
            None => None,
        })
    };

    let mut claims = ClaimSet::new();
    claims.issuer = args.iss.clone();
    claims.subject = args.sub.clone();
    claims.audience = match args.aud.as_slice() {
        [] => None,
        [only] => Some(Audience::from(only.as_str())),
        many => Some(Audience::Multiple(many.to_vec())),
    };
    claims.unique_id = args.jti.clone();
    claims.issued_at = resolve(&args.iat)?;
    claims.expiration = resolve(&args.exp)?;
    claims.not_before = resolve(&args.nbf)?;

    for claim in &args.claims {
        claims.insert_claim(claim.key.clone(), claim.value.clone())?;
    }
    Ok(claims)
}
