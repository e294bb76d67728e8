//! Colorized JSON pretty-printing for terminal output.
//!
//! Renders JSON values with syntax highlighting:
//! - Field names in cyan
//! - Strings in green
//! - Numbers in yellow
//! - Booleans in magenta
//! - Null in red

use owo_colors::OwoColorize;
use serde_json::Value;

use super::paint;

const INDENT: &str = "  ";

/// Render a JSON value with colorized syntax highlighting.
///
/// Uses 2-space indentation. When `use_color` is false, the output is
/// identical to `serde_json::to_string_pretty` (suitable for machine
/// consumption or piping).
pub fn render_json(value: &Value, use_color: bool) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0, use_color);
    out
}

fn write_value(out: &mut String, value: &Value, depth: usize, use_color: bool) {
    match value {
        Value::Null => out.push_str(&paint("null", use_color, |s| s.red().to_string())),
        Value::Bool(flag) => out.push_str(&paint(
            &flag.to_string(),
            use_color,
            |s| s.magenta().to_string(),
        )),
        Value::Number(number) => out.push_str(&paint(
            &number.to_string(),
            use_color,
            |s| s.yellow().to_string(),
        )),
        Value::String(_) => out.push_str(&paint(
            &value.to_string(),
            use_color,
            |s| s.green().to_string(),
        )),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                out.push_str(&INDENT.repeat(depth + 1));
                write_value(out, item, depth + 1, use_color);
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str(&INDENT.repeat(depth));
            out.push(']');
        }
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                out.push_str(&INDENT.repeat(depth + 1));
                let quoted = Value::String(key.clone()).to_string();
                out.push_str(&paint(&quoted, use_color, |s| s.cyan().to_string()));
                out.push_str(": ");
                write_value(out, item, depth + 1, use_color);
                if i + 1 < map.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str(&INDENT.repeat(depth));
            out.push('}');
        }
    }
}
