//! Handler for the `algorithms` subcommand.

use jwt_codec::core::{KeyGenerationType, SignatureAlgorithm};
use owo_colors::OwoColorize;

use crate::display::{paint, stdout_supports_color};

/// Print the supported algorithms, sorted by name.
pub fn execute() {
    println!("{}", render_table(stdout_supports_color()));
}

fn render_table(use_color: bool) -> String {
    let heading = format!("{:<8}{:<20}{:<10}{}", "ALG", "FAMILY", "DIGEST", "KEYGEN TYPE");
    let mut lines = vec![paint(&heading, use_color, |s| s.bold().to_string())];

    for alg in SignatureAlgorithm::sorted_by_name() {
        lines.push(format!(
            "{:<8}{:<20}{:<10}{}",
            alg.short_name(),
            alg.family().description(),
            format!("SHA-{}", alg.digest_bits()),
            KeyGenerationType::for_algorithm(alg).cli_name()
        ));
    }
    lines.join("\n")
}
