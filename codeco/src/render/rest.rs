//! @ai:module:intent Render structured-document (reStructuredText) annotation bodies
//! @ai:module:layer infrastructure
//! @ai:module:public_api RestRenderer
//! @ai:module:depends_on render, html
//! @ai:module:stateless true
//!
//! Supported subset: section titles (underline, optional overline),
//! paragraphs, bullet and enumerated lists, literal blocks introduced by
//! `::`, block quotes, transitions, comments, and the inline markup
//! ``` ``literal`` ```, `**strong**`, `*emphasis*`, `` `title` `` and
//! `` `text <url>`_ `` plus standalone URLs.
//!
//! Only the body fragment is produced. Problems are graded like docutils
//! system messages (1 info, 2 warning, 3 error, 4 severe); the first problem
//! at or above `halt_level` aborts rendering.

use super::{MarkupRenderer, RenderOptions};
use crate::dialect::MarkupDialect;
use crate::error::{Error, Result};
use crate::html::{escape_attr, escape_text};
use once_cell::sync::Lazy;
use regex::Regex;

const KNOWN_KEYS: &[&str] = &["initial_header_level", "doctitle_xform", "halt_level"];
const ADORNMENT_CHARS: &str = "=-`:'\"~^_*+#<>.";
const WARNING: u8 = 2;
const ERROR: u8 = 3;
const SEVERE: u8 = 4;

static ENUMERATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\((?P<p>[0-9]+|#)\)|(?P<n>[0-9]+|#)[.)])(?: +|$)").expect("Invalid regex")
});

/// @ai:intent Renderer for the structured-document dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct RestRenderer;

impl MarkupRenderer for RestRenderer {
    fn dialect(&self) -> MarkupDialect {
        MarkupDialect::Rest
    }

    fn base_options(&self) -> RenderOptions {
        RenderOptions::new()
            .with("initial_header_level", 1)
            .with("doctitle_xform", false)
            .with("halt_level", 4)
    }

    /// @ai:intent Render a reStructuredText body fragment
    /// @ai:post Err(Render) names the line and message of the first halting problem
    /// @ai:effects pure
    fn render_merged(&self, body: &str, options: &RenderOptions) -> Result<String> {
        for key in options.keys().filter(|key| !KNOWN_KEYS.contains(key)) {
            tracing::warn!("ignoring unknown rest option `{}`", key);
        }
        let settings = Settings::from_options(options)?;

        let lines: Vec<Line> = body
            .lines()
            .enumerate()
            .map(|(idx, text)| Line {
                number: idx + 1,
                text: expand_tabs(text),
            })
            .collect();

        let mut ctx = Context::default();
        let mut blocks = parse_blocks(&lines, &mut ctx, false);

        if settings.doctitle_xform {
            promote_title(&mut blocks);
        }

        let html = render_blocks(&blocks, &settings, &mut ctx);

        if let Some(problem) = ctx
            .problems
            .iter()
            .find(|problem| problem.level >= settings.halt_level)
        {
            return Err(Error::Render {
                dialect: MarkupDialect::Rest.name().to_string(),
                message: problem.to_string(),
            });
        }
        for problem in &ctx.problems {
            tracing::warn!("rest: {}", problem);
        }

        Ok(html)
    }
}

#[derive(Debug, Clone, Copy)]
struct Settings {
    initial_header_level: u8,
    doctitle_xform: bool,
    halt_level: u8,
}

impl Settings {
    fn from_options(options: &RenderOptions) -> Result<Self> {
        let ranged = |key: &str, default: i64, range: std::ops::RangeInclusive<i64>| -> Result<u8> {
            let value = options.integer(key)?.unwrap_or(default);
            if range.contains(&value) {
                Ok(value as u8)
            } else {
                Err(Error::InvalidOption {
                    key: key.to_string(),
                    message: format!(
                        "expected a value in {}..={}, found {}",
                        range.start(),
                        range.end(),
                        value
                    ),
                })
            }
        };

        Ok(Self {
            initial_header_level: ranged("initial_header_level", 1, 1..=6)?,
            doctitle_xform: options.bool("doctitle_xform")?.unwrap_or(false),
            halt_level: ranged("halt_level", 4, 1..=5)?,
        })
    }
}

#[derive(Debug, Clone)]
struct Line {
    number: usize,
    text: String,
}

impl Line {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start_matches(' ').len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Adornment {
    ch: char,
    overline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Section { style: Adornment, title: String, line: usize },
    Paragraph { text: String, line: usize },
    Literal(String),
    BulletList(Vec<Vec<Block>>),
    EnumeratedList { start: usize, items: Vec<Vec<Block>> },
    Quote(Vec<Block>),
    Transition,
}

#[derive(Debug, Clone)]
struct Problem {
    level: u8,
    line: usize,
    message: String,
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.level {
            1 => "INFO",
            WARNING => "WARNING",
            ERROR => "ERROR",
            _ => "SEVERE",
        };
        write!(f, "line {}: ({}/{}) {}", self.line, label, self.level, self.message)
    }
}

#[derive(Debug, Default)]
struct Context {
    /// Title styles in order of first appearance; the index is the level.
    styles: Vec<Adornment>,
    problems: Vec<Problem>,
}

impl Context {
    fn report(&mut self, level: u8, line: usize, message: impl Into<String>) {
        self.problems.push(Problem {
            level,
            line,
            message: message.into(),
        });
    }

    fn level_of(&mut self, style: Adornment) -> usize {
        match self.styles.iter().position(|s| *s == style) {
            Some(level) => level,
            None => {
                self.styles.push(style);
                self.styles.len() - 1
            }
        }
    }
}

fn expand_tabs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\t' {
            let pad = 8 - out.chars().count() % 8;
            out.extend(std::iter::repeat(' ').take(pad));
        } else {
            out.push(ch);
        }
    }
    out
}

/// @ai:intent Return the adornment character when the line is a run of one punctuation char
fn adornment_char(text: &str) -> Option<char> {
    let trimmed = text.trim_end();
    let first = trimmed.chars().next()?;
    if trimmed.chars().count() < 2 || !ADORNMENT_CHARS.contains(first) {
        return None;
    }
    trimmed.chars().all(|c| c == first).then_some(first)
}

/// @ai:intent Index just past an indented run (blank lines included) starting at `start`
fn indented_end(lines: &[Line], start: usize) -> usize {
    let mut end = start;
    while end < lines.len() && (lines[end].is_blank() || lines[end].indent() > 0) {
        end += 1;
    }
    end
}

/// @ai:intent Strip the common indentation of a run of lines, dropping trailing blanks
fn dedent(lines: &[Line]) -> Vec<Line> {
    let mut lines = lines.to_vec();
    while lines.last().is_some_and(Line::is_blank) {
        lines.pop();
    }
    let width = lines
        .iter()
        .filter(|line| !line.is_blank())
        .map(Line::indent)
        .min()
        .unwrap_or(0);
    lines
        .into_iter()
        .map(|line| Line {
            number: line.number,
            text: line.text.get(width..).unwrap_or("").to_string(),
        })
        .collect()
}

fn bullet_width(text: &str) -> Option<usize> {
    let mut chars = text.chars();
    let bullet = chars.next()?;
    if !"-*+".contains(bullet) {
        return None;
    }
    match chars.next() {
        None => Some(2),
        Some(' ') => Some(text.len() - text[1..].trim_start_matches(' ').len()),
        Some(_) => None,
    }
}

fn enumerator(text: &str) -> Option<(Option<usize>, usize)> {
    let captures = ENUMERATOR_RE.captures(text)?;
    let value = captures
        .name("p")
        .or_else(|| captures.name("n"))
        .and_then(|m| m.as_str().parse::<usize>().ok());
    let width = captures.get(0).map_or(0, |m| m.end()).max(2);
    Some((value, width))
}

/// @ai:intent Parse a run of lines into blocks; `nested` forbids section titles
fn parse_blocks(lines: &[Line], ctx: &mut Context, nested: bool) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];

        if line.is_blank() {
            i += 1;
            continue;
        }

        if line.indent() > 0 {
            let end = indented_end(lines, i);
            let inner = dedent(&lines[i..end]);
            blocks.push(Block::Quote(parse_blocks(&inner, ctx, true)));
            i = end;
            continue;
        }

        let text = line.text.as_str();

        if text == ".." || text.starts_with(".. ") {
            i = indented_end(lines, i + 1);
            continue;
        }

        if let Some(ch) = adornment_char(text) {
            let overlined = i + 2 < lines.len()
                && !lines[i + 1].is_blank()
                && adornment_char(&lines[i + 2].text) == Some(ch);
            if overlined {
                let title = lines[i + 1].text.trim().to_string();
                let style = Adornment { ch, overline: true };
                push_section(&mut blocks, ctx, nested, style, title, lines[i + 1].number);
                i += 3;
                continue;
            }

            let blank_before = i == 0 || lines[i - 1].is_blank();
            let blank_after = i + 1 == lines.len() || lines[i + 1].is_blank();
            if blank_before && blank_after && text.trim_end().chars().count() >= 4 {
                if nested {
                    ctx.report(SEVERE, line.number, "Unexpected transition.");
                } else {
                    blocks.push(Block::Transition);
                }
                i += 1;
                continue;
            }
        }

        if i + 1 < lines.len() {
            if let Some(ch) = adornment_char(&lines[i + 1].text) {
                let title = text.trim();
                let title_len = title.chars().count();
                let underline_len = lines[i + 1].text.trim_end().chars().count();
                if underline_len >= title_len || underline_len >= 4 {
                    if underline_len < title_len {
                        ctx.report(WARNING, lines[i + 1].number, "Title underline too short.");
                    }
                    let style = Adornment { ch, overline: false };
                    push_section(&mut blocks, ctx, nested, style, title.to_string(), line.number);
                    i += 2;
                    continue;
                }
            }
        }

        if bullet_width(text).is_some() {
            let bullet = text.chars().next();
            let mut items = Vec::new();
            while i < lines.len() && lines[i].text.chars().next() == bullet {
                let Some(width) = bullet_width(&lines[i].text) else {
                    break;
                };
                let (item, next) = list_item(lines, i, width);
                items.push(parse_blocks(&item, ctx, true));
                i = skip_blank(lines, next);
            }
            blocks.push(Block::BulletList(items));
            continue;
        }

        if let Some((first, _)) = enumerator(text) {
            let mut items = Vec::new();
            while i < lines.len() {
                let Some((_, width)) = enumerator(&lines[i].text) else {
                    break;
                };
                let (item, next) = list_item(lines, i, width);
                items.push(parse_blocks(&item, ctx, true));
                i = skip_blank(lines, next);
            }
            blocks.push(Block::EnumeratedList {
                start: first.unwrap_or(1),
                items,
            });
            continue;
        }

        i = paragraph(lines, i, ctx, &mut blocks);
    }

    blocks
}

fn skip_blank(lines: &[Line], mut i: usize) -> usize {
    while i < lines.len() && lines[i].is_blank() {
        i += 1;
    }
    i
}

fn push_section(
    blocks: &mut Vec<Block>,
    ctx: &mut Context,
    nested: bool,
    style: Adornment,
    title: String,
    line: usize,
) {
    if nested {
        ctx.report(SEVERE, line, "Unexpected section title.");
        blocks.push(Block::Paragraph { text: title, line });
    } else {
        blocks.push(Block::Section { style, title, line });
    }
}

/// @ai:intent Cut one list item: first line after the marker plus lines indented by `width`
fn list_item(lines: &[Line], start: usize, width: usize) -> (Vec<Line>, usize) {
    let first = &lines[start];
    let mut item = vec![Line {
        number: first.number,
        text: first.text.get(width..).unwrap_or("").trim_start().to_string(),
    }];

    let mut i = start + 1;
    while i < lines.len() && (lines[i].is_blank() || lines[i].indent() >= width) {
        item.push(Line {
            number: lines[i].number,
            text: lines[i].text.get(width..).unwrap_or("").to_string(),
        });
        i += 1;
    }
    while item.last().is_some_and(Line::is_blank) {
        item.pop();
    }
    (item, i)
}

/// @ai:intent Consume a paragraph and an optional literal block introduced by `::`
fn paragraph(lines: &[Line], start: usize, ctx: &mut Context, blocks: &mut Vec<Block>) -> usize {
    let mut i = start;
    let mut parts = Vec::new();
    while i < lines.len() && !lines[i].is_blank() {
        if lines[i].indent() > 0 {
            ctx.report(ERROR, lines[i].number, "Unexpected indentation.");
            break;
        }
        parts.push(lines[i].text.trim_end());
        i += 1;
    }
    let mut text = parts.join("\n");
    let line = lines[start].number;

    if !text.ends_with("::") {
        blocks.push(Block::Paragraph { text, line });
        return i;
    }

    if text == "::" {
        text.clear();
    } else if text[..text.len() - 2].ends_with(char::is_whitespace) {
        text = text[..text.len() - 2].trim_end().to_string();
    } else {
        text.pop();
    }
    if !text.is_empty() {
        blocks.push(Block::Paragraph { text, line });
    }

    let next = skip_blank(lines, i);
    if next < lines.len() && next > i && lines[next].indent() > 0 {
        let end = indented_end(lines, next);
        let literal = dedent(&lines[next..end])
            .into_iter()
            .map(|line| line.text)
            .collect::<Vec<_>>()
            .join("\n");
        blocks.push(Block::Literal(literal));
        return end;
    }

    let last = lines[i.saturating_sub(1)].number;
    ctx.report(WARNING, last, "Literal block expected; none found.");
    i
}

/// @ai:intent Drop a lone leading document title the way docutils' doctitle transform does
fn promote_title(blocks: &mut Vec<Block>) {
    let Some(Block::Section { style, .. }) = blocks.first() else {
        return;
    };
    let style = *style;
    let same_style = blocks
        .iter()
        .filter(|b| matches!(b, Block::Section { style: s, .. } if *s == style))
        .count();
    if same_style == 1 {
        blocks.remove(0);
    }
}

fn render_blocks(blocks: &[Block], settings: &Settings, ctx: &mut Context) -> String {
    let mut out = String::new();
    for block in blocks {
        render_block(block, settings, ctx, &mut out);
    }
    out
}

fn render_block(block: &Block, settings: &Settings, ctx: &mut Context, out: &mut String) {
    match block {
        Block::Section { style, title, line } => {
            let level = (settings.initial_header_level as usize + ctx.level_of(*style)).min(6);
            let title = render_inline(title, *line, ctx);
            out.push_str(&format!("<h{0}>{1}</h{0}>\n", level, title));
        }
        Block::Paragraph { text, line } => {
            let text = render_inline(text, *line, ctx);
            out.push_str(&format!("<p>{}</p>\n", text));
        }
        Block::Literal(text) => {
            out.push_str(&format!(
                "<pre class=\"literal-block\">{}</pre>\n",
                escape_text(text)
            ));
        }
        Block::BulletList(items) => {
            render_list("ul", "", items, settings, ctx, out);
        }
        Block::EnumeratedList { start, items } => {
            let start = if *start == 1 {
                String::new()
            } else {
                format!(" start=\"{}\"", start)
            };
            render_list("ol", &start, items, settings, ctx, out);
        }
        Block::Quote(inner) => {
            out.push_str("<blockquote>\n");
            out.push_str(&render_blocks(inner, settings, ctx));
            out.push_str("</blockquote>\n");
        }
        Block::Transition => out.push_str("<hr class=\"docutils\">\n"),
    }
}

fn render_list(
    tag: &str,
    extra_attrs: &str,
    items: &[Vec<Block>],
    settings: &Settings,
    ctx: &mut Context,
    out: &mut String,
) {
    let simple = items.iter().all(|item| {
        item.len() <= 1 && matches!(item.first(), None | Some(Block::Paragraph { .. }))
    });
    let class = if simple { " class=\"simple\"" } else { "" };
    out.push_str(&format!("<{}{}{}>\n", tag, class, extra_attrs));

    for item in items {
        match (simple, item.first()) {
            (true, Some(Block::Paragraph { text, line })) => {
                out.push_str(&format!("<li>{}</li>\n", render_inline(text, *line, ctx)));
            }
            (true, _) => out.push_str("<li></li>\n"),
            (false, _) => {
                out.push_str("<li>");
                out.push_str(&render_blocks(item, settings, ctx));
                out.push_str("</li>\n");
            }
        }
    }
    out.push_str(&format!("</{}>\n", tag));
}

/// @ai:intent Render inline markup of one paragraph
fn render_inline(text: &str, line: usize, ctx: &mut Context) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let rest: String = chars[i..].iter().take(8).collect();

        if chars[i] == '\\' && i + 1 < chars.len() {
            out.push_str(&escape_text(&chars[i + 1].to_string()));
            i += 2;
            continue;
        }

        if rest.starts_with("``") && can_open(&chars, i, 2) {
            match find_close(&chars, i + 2, "``") {
                Some(end) => {
                    let inner: String = chars[i + 2..end].iter().collect();
                    out.push_str(&format!(
                        "<code class=\"docutils literal\">{}</code>",
                        escape_text(&inner)
                    ));
                    i = end + 2;
                }
                None => {
                    ctx.report(WARNING, line, "Inline literal start-string without end-string.");
                    out.push_str("``");
                    i += 2;
                }
            }
            continue;
        }

        if rest.starts_with("**") && can_open(&chars, i, 2) {
            match find_close(&chars, i + 2, "**") {
                Some(end) => {
                    let inner: String = chars[i + 2..end].iter().collect();
                    out.push_str(&format!("<strong>{}</strong>", escape_text(&inner)));
                    i = end + 2;
                }
                None => {
                    ctx.report(WARNING, line, "Inline strong start-string without end-string.");
                    out.push_str("**");
                    i += 2;
                }
            }
            continue;
        }

        if chars[i] == '*' && can_open(&chars, i, 1) {
            match find_close(&chars, i + 1, "*") {
                Some(end) => {
                    let inner: String = chars[i + 1..end].iter().collect();
                    out.push_str(&format!("<em>{}</em>", escape_text(&inner)));
                    i = end + 1;
                }
                None => {
                    ctx.report(WARNING, line, "Inline emphasis start-string without end-string.");
                    out.push('*');
                    i += 1;
                }
            }
            continue;
        }

        if chars[i] == '`' && can_open(&chars, i, 1) {
            match find_close(&chars, i + 1, "`") {
                Some(end) => {
                    let inner: String = chars[i + 1..end].iter().collect();
                    let underscores = chars[end + 1..].iter().take_while(|c| **c == '_').count();
                    if underscores > 0 {
                        out.push_str(&render_reference(&inner, line, ctx));
                    } else {
                        out.push_str(&format!("<cite>{}</cite>", escape_text(&inner)));
                    }
                    i = end + 1 + underscores.min(2);
                }
                None => {
                    ctx.report(
                        WARNING,
                        line,
                        "Inline interpreted text or phrase reference start-string without end-string.",
                    );
                    out.push('`');
                    i += 1;
                }
            }
            continue;
        }

        if (rest.starts_with("http://") || rest.starts_with("https://"))
            && (i == 0 || !chars[i - 1].is_alphanumeric())
        {
            let mut end = i;
            while end < chars.len() && !chars[end].is_whitespace() && chars[end] != '<' {
                end += 1;
            }
            while end > i && ".,;:!?)'\"".contains(chars[end - 1]) {
                end -= 1;
            }
            let url: String = chars[i..end].iter().collect();
            out.push_str(&format!(
                "<a class=\"reference external\" href=\"{}\">{}</a>",
                escape_attr(&url),
                escape_text(&url)
            ));
            i = end;
            continue;
        }

        out.push_str(&escape_text(&chars[i].to_string()));
        i += 1;
    }

    out
}

/// @ai:intent Render `text <url>`_ as a link; other named references have no target here
fn render_reference(inner: &str, line: usize, ctx: &mut Context) -> String {
    let trimmed = inner.trim_end();
    if let (Some(open), true) = (trimmed.rfind('<'), trimmed.ends_with('>')) {
        let url = trimmed[open + 1..trimmed.len() - 1].trim();
        let label = trimmed[..open].trim();
        let label = if label.is_empty() { url } else { label };
        return format!(
            "<a class=\"reference external\" href=\"{}\">{}</a>",
            escape_attr(url),
            escape_text(label)
        );
    }
    ctx.report(ERROR, line, format!("Unknown target name: \"{}\".", inner.to_lowercase()));
    escape_text(inner)
}

/// @ai:intent Inline start-string rule: preceded by start or whitespace/opening punctuation, followed by non-space
fn can_open(chars: &[char], i: usize, len: usize) -> bool {
    let before_ok = i == 0 || chars[i - 1].is_whitespace() || "'\"([{<-/:".contains(chars[i - 1]);
    let after_ok = chars.get(i + len).is_some_and(|c| !c.is_whitespace());
    before_ok && after_ok
}

/// @ai:intent Find an end-string preceded by non-space and followed by end or whitespace/punctuation
fn find_close(chars: &[char], from: usize, delim: &str) -> Option<usize> {
    let delim: Vec<char> = delim.chars().collect();
    let mut j = from + 1;
    while j + delim.len() <= chars.len() {
        let matches = chars[j..j + delim.len()] == delim[..];
        let before_ok = !chars[j - 1].is_whitespace();
        let after_ok = chars
            .get(j + delim.len())
            .map_or(true, |c| c.is_whitespace() || "'\")]}>-/:.,;!?\\_".contains(*c));
        if matches && before_ok && after_ok {
            return Some(j);
        }
        j += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(body: &str) -> String {
        RestRenderer.render(body, &RenderOptions::new()).unwrap()
    }

    #[test]
    fn test_paragraph_with_inline_markup() {
        assert_eq!(
            render("Some *emphasis*, **strong** and ``code < 1``."),
            "<p>Some <em>emphasis</em>, <strong>strong</strong> and \
             <code class=\"docutils literal\">code &lt; 1</code>.</p>\n"
        );
    }

    #[test]
    fn test_titles_start_at_initial_level() {
        let html = render("Title\n=====\n\nText\n\nSub\n---\n\nMore");
        assert_eq!(html, "<h1>Title</h1>\n<p>Text</p>\n<h2>Sub</h2>\n<p>More</p>\n");
    }

    #[test]
    fn test_title_is_not_promoted_by_default() {
        let html = render("Only Title\n==========\n\nBody");
        assert!(html.starts_with("<h1>Only Title</h1>"));
    }

    #[test]
    fn test_doctitle_xform_drops_lone_title() {
        let options = RenderOptions::new().with("doctitle_xform", true);
        let html = RestRenderer
            .render("Doc\n===\n\nBody\n\nPart\n----\n", &options)
            .unwrap();
        assert_eq!(html, "<p>Body</p>\n<h1>Part</h1>\n");
    }

    #[test]
    fn test_initial_header_level_option() {
        let options = RenderOptions::new().with("initial_header_level", 3);
        let html = RestRenderer.render("Top\n===\n", &options).unwrap();
        assert_eq!(html, "<h3>Top</h3>\n");
    }

    #[test]
    fn test_lists() {
        let html = render("- one\n- two\n\n1. first\n2. second");
        assert_eq!(
            html,
            "<ul class=\"simple\">\n<li>one</li>\n<li>two</li>\n</ul>\n\
             <ol class=\"simple\">\n<li>first</li>\n<li>second</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_literal_block() {
        let html = render("Example::\n\n    x = 1\n      y\n\nAfter");
        assert_eq!(
            html,
            "<p>Example:</p>\n<pre class=\"literal-block\">x = 1\n  y</pre>\n<p>After</p>\n"
        );
    }

    #[test]
    fn test_expanded_literal_marker() {
        let html = render("Example ::\n\n    x\n");
        assert!(html.starts_with("<p>Example</p>\n"));
    }

    #[test]
    fn test_external_link() {
        let html = render("See `the docs <https://example.org/a?b=1&c=2>`_.");
        assert_eq!(
            html,
            "<p>See <a class=\"reference external\" href=\"https://example.org/a?b=1&amp;c=2\">the docs</a>.</p>\n"
        );
    }

    #[test]
    fn test_comment_is_skipped() {
        assert_eq!(render(".. note to self\n   continued\n\nVisible"), "<p>Visible</p>\n");
    }

    #[test]
    fn test_unterminated_literal_renders_with_warning() {
        assert_eq!(render("a ``b"), "<p>a ``b</p>\n");
    }

    #[test]
    fn test_halt_level_turns_warning_into_error() {
        let options = RenderOptions::new().with("halt_level", 2);
        match RestRenderer.render("a ``b", &options) {
            Err(Error::Render { dialect, message }) => {
                assert_eq!(dialect, "rest");
                assert!(message.contains("line 1"));
                assert!(message.contains("Inline literal"));
            }
            other => panic!("expected render error, got {:?}", other),
        }
    }

    #[test]
    fn test_section_inside_list_is_severe() {
        let result = RestRenderer.render("- item\n\n  Title\n  =====\n", &RenderOptions::new());
        assert!(matches!(result, Err(Error::Render { .. })));
    }

    #[test]
    fn test_invalid_header_level() {
        let options = RenderOptions::new().with("initial_header_level", 9);
        assert!(matches!(
            RestRenderer.render("x", &options),
            Err(Error::InvalidOption { .. })
        ));
    }
}
