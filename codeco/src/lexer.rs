//! @ai:module:intent Split an annotation stream into ordered annotation blocks
//! @ai:module:layer domain
//! @ai:module:public_api parse, is_marker
//! @ai:module:depends_on annotation, range
//! @ai:module:stateless true
//!
//! A marker line starts a new block:
//!
//! ```text
//! <[annotation]>1 2[0,4]
//! <[hidden-annotation]>3
//! ```
//!
//! The optional `hidden-` flag collapses the block body client-side. The rest
//! of the marker line is a whitespace separated list of range tokens (see
//! [`crate::range`]); a marker with nothing after it yields a block without
//! code targets.

use crate::annotation::{AnnotationBlock, Lexed, MalformedToken, RangeArg};
use crate::range::parse_range_list;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<\[(?P<hidden>hidden-)?annotation\]>(?P<args>.*)$").expect("Invalid regex")
});

/// @ai:intent Header data of a block, taken from its marker line
#[derive(Debug)]
struct Marker {
    hidden: bool,
    args: Option<Vec<RangeArg>>,
    line: usize,
}

impl Marker {
    /// @ai:intent Build a marker from regex captures, collecting malformed tokens
    /// @ai:effects pure
    fn from_captures(captures: &Captures<'_>, line: usize) -> (Self, Vec<MalformedToken>) {
        let hidden = captures.name("hidden").is_some();
        let raw_args = captures.name("args").map_or("", |m| m.as_str());

        let (args, malformed) = if raw_args.trim().is_empty() {
            (None, Vec::new())
        } else {
            let (args, malformed) = parse_range_list(raw_args, line);
            (Some(args), malformed)
        };

        (Self { hidden, args, line }, malformed)
    }

    /// @ai:intent Turn the marker and its accumulated body lines into a finished block
    fn close(self, prefix: &str, body: &[&str]) -> AnnotationBlock {
        AnnotationBlock {
            prefix: prefix.to_string(),
            hidden: self.hidden,
            args: self.args,
            body: body.join("\n"),
            line: self.line,
        }
    }
}

/// @ai:intent Lexer states: before the first marker, or inside a block
enum State<'a> {
    Scanning,
    Accumulating { marker: Marker, body: Vec<&'a str> },
}

/// @ai:intent Check whether a line opens a new annotation block
/// @ai:effects pure
pub fn is_marker(line: &str) -> bool {
    MARKER_RE.is_match(line)
}

/// @ai:intent Partition an annotation stream into blocks sharing one prefix
/// @ai:post blocks.len() equals the number of marker lines, in source order
/// @ai:post text before the first marker is discarded
/// @ai:edge_cases no marker at all yields an empty result, not an error
/// @ai:effects pure
pub fn parse(text: &str, prefix: &str) -> Lexed {
    let mut lexed = Lexed::default();
    let mut state = State::Scanning;

    for (idx, line) in text.lines().enumerate() {
        let line_number = idx + 1;

        let Some(captures) = MARKER_RE.captures(line) else {
            if let State::Accumulating { body, .. } = &mut state {
                body.push(line);
            }
            continue;
        };

        let (marker, malformed) = Marker::from_captures(&captures, line_number);
        for warning in malformed {
            tracing::warn!("{}", warning);
            lexed.warnings.push(warning);
        }

        let next = State::Accumulating {
            marker,
            body: Vec::new(),
        };
        if let State::Accumulating { marker, body } = std::mem::replace(&mut state, next) {
            lexed.blocks.push(marker.close(prefix, &body));
        }
    }

    if let State::Accumulating { marker, body } = state {
        lexed.blocks.push(marker.close(prefix, &body));
    }

    tracing::debug!(
        blocks = lexed.blocks.len(),
        warnings = lexed.warnings.len(),
        "lexed annotation stream"
    );

    lexed
}
