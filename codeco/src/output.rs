//! @ai:module:intent Format command output for different formats (JSON, text)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_lexed, format_styles, to_json
//! @ai:module:depends_on annotation
//! @ai:module:stateless true

use crate::annotation::{AnnotationBlock, Lexed, MalformedToken};
use colored::Colorize;
use serde::Serialize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Format a lexing result as a string
/// @ai:effects pure
pub fn format_lexed(lexed: &Lexed, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(lexed).unwrap_or_default(),
        OutputFormat::JsonPretty => serde_json::to_string_pretty(lexed).unwrap_or_default(),
        OutputFormat::Text => format_lexed_text(lexed),
    }
}

/// @ai:intent Format a lexing result as human-readable text
/// @ai:effects pure
fn format_lexed_text(lexed: &Lexed) -> String {
    let mut output = String::new();

    output.push_str(&format!("{} ({}):\n", "Annotations".bold(), lexed.blocks.len()));

    for (idx, block) in lexed.blocks.iter().enumerate() {
        output.push_str(&format_block(idx + 1, block));
    }

    output.push('\n');
    output.push_str(&format_warnings_text(&lexed.warnings));
    output
}

fn format_block(number: usize, block: &AnnotationBlock) -> String {
    let mut output = String::new();

    let targets = match &block.args {
        None => "narrative".dimmed().to_string(),
        Some(args) if args.is_empty() => "no valid targets".yellow().to_string(),
        Some(args) => args
            .iter()
            .map(|arg| arg.to_string())
            .collect::<Vec<_>>()
            .join(" ")
            .cyan()
            .to_string(),
    };

    output.push_str(&format!("  #{} (line {}) -> {}", number, block.line, targets));
    if block.hidden {
        output.push_str(&format!(" {}", "[hidden]".magenta()));
    }
    output.push('\n');

    let first_line = block.body.lines().find(|line| !line.trim().is_empty());
    if let Some(first_line) = first_line {
        output.push_str(&format!("      {}\n", first_line.trim()));
    }

    output
}

fn format_warnings_text(warnings: &[MalformedToken]) -> String {
    let mut output = String::new();

    for warning in warnings {
        output.push_str(&format!("{} {}\n", "WARN".yellow().bold(), warning));
    }

    if warnings.is_empty() {
        output.push_str(&format!("{} All range tokens parsed\n", "OK".green().bold()));
    } else {
        output.push_str(&format!(
            "{} malformed range tokens\n",
            warnings.len().to_string().yellow()
        ));
    }

    output
}

/// @ai:intent Format the available highlight styles
/// @ai:effects pure
pub fn format_styles(styles: &[&str], default: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&styles, false),
        OutputFormat::JsonPretty => to_json(&styles, true),
        OutputFormat::Text => styles
            .iter()
            .map(|style| {
                if *style == default {
                    format!("{} {}\n", style.bold(), "(default)".dimmed())
                } else {
                    format!("{}\n", style)
                }
            })
            .collect(),
    }
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}
