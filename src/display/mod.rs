//! Terminal display and formatting utilities.
//!
//! Handles colorized JSON output, claim set rendering and token status
//! rendering for human-readable terminal output. Renderers return
//! `String`s so that commands decide where output goes.

pub mod claims_printer;
pub mod json_printer;
pub mod token_status;

use std::io::{self, IsTerminal};

use owo_colors::OwoColorize;

/// Whether stdout should receive ANSI colors.
///
/// Colors are off when stdout is not a terminal or `NO_COLOR` is set.
pub fn stdout_supports_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Apply `color_fn` only when colors are enabled.
pub(crate) fn paint(text: &str, use_color: bool, color_fn: impl FnOnce(&str) -> String) -> String {
    if use_color {
        color_fn(text)
    } else {
        text.to_string()
    }
}

/// A `--- Title ---` section heading.
pub fn section_heading(title: &str, use_color: bool) -> String {
    paint(&format!("--- {title} ---"), use_color, |t| t.bold().to_string())
}
