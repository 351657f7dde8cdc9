//! @ai:module:intent Highlight source code into a line-addressable HTML table
//! @ai:module:layer infrastructure
//! @ai:module:public_api highlight, HighlightOptions, Highlighted, available_styles, DEFAULT_STYLE
//! @ai:module:depends_on html, error
//! @ai:module:thread_safe true
//!
//! Every source line is wrapped in `<span id="{prefix}line-{N}">` with `N`
//! starting at 1. The client script resolves annotation targets through
//! exactly these ids.

use crate::error::{Error, Result};
use crate::html::escape_attr;
use once_cell::sync::Lazy;
use std::path::Path;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

pub const DEFAULT_STYLE: &str = "InspiredGitHub";

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// @ai:intent How to pick the language and the colors of the highlighted code
#[derive(Debug, Clone, Default)]
pub struct HighlightOptions<'a> {
    /// File name hint; its extension selects the language.
    pub filename: Option<&'a Path>,
    /// Explicit language name or extension, tried before the file name.
    pub language: Option<&'a str>,
    /// Theme name; `DEFAULT_STYLE` when absent.
    pub style: Option<&'a str>,
}

/// @ai:intent Highlighted code and the style sheet it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    pub html: String,
    pub css: String,
    pub language: String,
}

/// @ai:intent Names of the highlight styles that can be requested
pub fn available_styles() -> Vec<&'static str> {
    THEME_SET.themes.keys().map(String::as_str).collect()
}

/// @ai:intent Highlight code as a two-column table of line numbers and line spans
/// @ai:pre prefix is the same prefix the annotation metadata carries
/// @ai:post html contains one element with id "{prefix}line-{N}" per source line
/// @ai:edge_cases no language can be resolved -> Err(UnresolvableLanguage), no fallback
/// @ai:effects pure
pub fn highlight(code: &str, prefix: &str, options: &HighlightOptions<'_>) -> Result<Highlighted> {
    let style = options.style.unwrap_or(DEFAULT_STYLE);
    let theme = THEME_SET
        .themes
        .get(style)
        .ok_or_else(|| Error::UnknownStyle(style.to_string()))?;
    let syntax = resolve_syntax(code, options)?;

    tracing::debug!(language = %syntax.name, style, "highlighting code");

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut numbers = Vec::new();
    let mut lines = String::new();

    for (idx, line) in LinesWithEndings::from(code).enumerate() {
        let number = idx + 1;
        let regions = highlighter
            .highlight_line(line, &SYNTAX_SET)
            .map_err(|e| Error::Highlight(e.to_string()))?;

        // Keep the newline outside the span so character offsets cover the line text only.
        let trimmed: Vec<_> = regions
            .iter()
            .map(|(style, text)| (*style, text.trim_end_matches(['\r', '\n'])))
            .collect();
        let body = styled_line_to_highlighted_html(&trimmed, IncludeBackground::No)
            .map_err(|e| Error::Highlight(e.to_string()))?;

        numbers.push(number.to_string());
        lines.push_str(&format!(
            "<span id=\"{}line-{}\">{}</span>\n",
            escape_attr(prefix),
            number,
            body
        ));
    }

    let html = format!(
        "<table class=\"highlighttable\"><tr>\
         <td class=\"linenos\"><div class=\"linenodiv\"><pre>{}</pre></div></td>\
         <td class=\"code\"><div class=\"highlight\"><pre>{}</pre></div></td>\
         </tr></table>",
        numbers.join("\n"),
        lines
    );

    Ok(Highlighted {
        html,
        css: theme_css(theme),
        language: syntax.name.clone(),
    })
}

/// @ai:intent Resolve the syntax from an explicit language, the file name, then the first line
fn resolve_syntax(code: &str, options: &HighlightOptions<'_>) -> Result<&'static SyntaxReference> {
    let set: &'static SyntaxSet = &SYNTAX_SET;

    if let Some(language) = options.language {
        return set
            .find_syntax_by_token(language)
            .ok_or_else(|| Error::UnresolvableLanguage {
                hint: format!("language `{}`", language),
            });
    }

    if let Some(path) = options.filename {
        let by_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| set.find_syntax_by_extension(ext));
        // Extension-less names such as "Makefile" are registered as extensions too.
        let by_name = || {
            path.file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| set.find_syntax_by_extension(name))
        };
        if let Some(syntax) = by_extension.or_else(by_name) {
            return Ok(syntax);
        }
    }

    code.lines()
        .next()
        .and_then(|first| set.find_syntax_by_first_line(first))
        .ok_or_else(|| Error::UnresolvableLanguage {
            hint: options
                .filename
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "the code block".to_string()),
        })
}

fn hex_color(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

/// @ai:intent Style sheet for the highlight table in the given theme
fn theme_css(theme: &Theme) -> String {
    let settings = &theme.settings;
    let background = settings.background.map_or_else(|| "#ffffff".to_string(), hex_color);
    let foreground = settings.foreground.map_or_else(|| "#000000".to_string(), hex_color);
    let line_highlight = settings
        .line_highlight
        .map_or_else(|| "#ffffcc".to_string(), hex_color);
    let selection = settings.selection.map_or_else(|| "#ffd27f".to_string(), hex_color);

    format!(
        "table.highlighttable {{ border-spacing: 0; width: 100%; background: {bg}; }}\n\
         table.highlighttable td {{ padding: 0; vertical-align: top; }}\n\
         table.highlighttable td.linenos {{ color: #999999; text-align: right; padding-right: 8px; user-select: none; }}\n\
         table.highlighttable pre {{ margin: 0; line-height: 125%; }}\n\
         table.highlighttable .highlight {{ background: {bg}; color: {fg}; }}\n\
         table.highlighttable .hll {{ background-color: {hll}; display: inline-block; width: 100%; }}\n\
         table.highlighttable .hll-chars {{ background-color: {sel}; }}\n",
        bg = background,
        fg = foreground,
        hll = line_highlight,
        sel = selection,
    )
}
