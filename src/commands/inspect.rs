//! Handler for the `inspect` subcommand.
//!
//! Decodes and pretty-prints a JWT's header and payload without
//! verifying its signature. Supports reading the token from a CLI
//! argument, environment variable, or stdin.

use anyhow::Result;
use chrono::Utc;
use jwt_codec::core::inspect;
use serde_json::json;

use super::read_token;
use crate::cli::InspectArgs;
use crate::display::json_printer::render_json;
use crate::display::token_status::{TemporalClaims, render_token_status};
use crate::display::{section_heading, stdout_supports_color};

/// Execute the `inspect` subcommand with the given arguments.
pub fn execute(args: &InspectArgs) -> Result<()> {
    let token = read_token(&args.token)?;
    let decoded = inspect(&token)?;

    if args.json {
        let output = json!({
            "header": decoded.header,
            "payload": decoded.payload,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let use_color = stdout_supports_color();
    println!("{}", section_heading("Header", use_color));
    println!("{}", render_json(&decoded.header, use_color));
    println!();
    println!("{}", section_heading("Payload", use_color));
    println!("{}", render_json(&decoded.payload, use_color));
    println!();
    println!(
        "{}",
        render_token_status(
            &TemporalClaims::from_payload(&decoded.payload),
            Utc::now(),
            use_color
        )
    );
    println!();
    println!("Signature not verified; use `decode` with a key to verify it.");
    Ok(())
}
