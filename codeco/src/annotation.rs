//! @ai:module:intent Define data structures for annotation blocks and their code targets
//! @ai:module:layer domain
//! @ai:module:public_api RangeArg, AnnotationBlock, AnnotationMeta, MalformedToken, Lexed
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::fmt;

/// @ai:intent One targeting unit: a code line plus an optional inclusive character range
///
/// On the wire the character bounds are named `beg` and `end` and are `null`
/// when the whole line is targeted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RangeArg {
    pub line: usize,
    #[serde(rename = "beg")]
    pub char_begin: Option<usize>,
    #[serde(rename = "end")]
    pub char_end: Option<usize>,
}

impl RangeArg {
    /// @ai:intent Target a whole line
    pub fn line(line: usize) -> Self {
        Self {
            line,
            char_begin: None,
            char_end: None,
        }
    }

    /// @ai:intent Target the inclusive character interval [begin, end] of a line
    /// @ai:assumes begin <= end is not checked; a reversed interval highlights nothing
    pub fn chars(line: usize, begin: usize, end: usize) -> Self {
        Self {
            line,
            char_begin: Some(begin),
            char_end: Some(end),
        }
    }
}

impl fmt::Display for RangeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.char_begin, self.char_end) {
            (Some(begin), Some(end)) => write!(f, "{}[{},{}]", self.line, begin, end),
            _ => write!(f, "{}", self.line),
        }
    }
}

/// @ai:intent Metadata shipped to the browser with every rendered annotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotationMeta {
    pub prefix: String,
    pub hidden: bool,
    pub args: Option<Vec<RangeArg>>,
}

/// @ai:intent One annotation unit produced by the lexer; never mutated afterwards
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotationBlock {
    pub prefix: String,
    pub hidden: bool,
    pub args: Option<Vec<RangeArg>>,
    pub body: String,
    /// 1-based line of the marker in the annotation stream.
    pub line: usize,
}

impl AnnotationBlock {
    /// @ai:intent Extract the client metadata of this block
    /// @ai:effects pure
    pub fn meta(&self) -> AnnotationMeta {
        AnnotationMeta {
            prefix: self.prefix.clone(),
            hidden: self.hidden,
            args: self.args.clone(),
        }
    }
}

/// @ai:intent Non-fatal diagnostic for a range token that fails the grammar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MalformedToken {
    pub token: String,
    pub line: usize,
}

impl fmt::Display for MalformedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: unparsable range token `{}` (expected LINE or LINE[BEGIN,END])",
            self.line, self.token
        )
    }
}

/// @ai:intent Result of one lexing pass over an annotation stream
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Lexed {
    pub blocks: Vec<AnnotationBlock>,
    pub warnings: Vec<MalformedToken>,
}

impl Lexed {
    /// @ai:intent Check if every range token in the stream was well formed
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_arg_wire_names() {
        let json = serde_json::to_string(&RangeArg::chars(2, 0, 4)).unwrap();
        assert_eq!(json, r#"{"line":2,"beg":0,"end":4}"#);

        let json = serde_json::to_string(&RangeArg::line(7)).unwrap();
        assert_eq!(json, r#"{"line":7,"beg":null,"end":null}"#);
    }

    #[test]
    fn test_meta_without_args_serializes_null() {
        let meta = AnnotationMeta {
            prefix: "ab".to_string(),
            hidden: true,
            args: None,
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"prefix":"ab","hidden":true,"args":null}"#);
    }

    #[test]
    fn test_range_arg_display() {
        assert_eq!(RangeArg::line(3).to_string(), "3");
        assert_eq!(RangeArg::chars(3, 1, 9).to_string(), "3[1,9]");
    }

    #[test]
    fn test_narrative_block() {
        let block = AnnotationBlock {
            prefix: String::new(),
            hidden: false,
            args: None,
            body: "Just words".to_string(),
            line: 1,
        };
        assert_eq!(block.meta().args, None);
    }
}
