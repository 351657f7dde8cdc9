//! @ai:module:intent Parse range argument tokens of annotation marker lines
//! @ai:module:layer domain
//! @ai:module:public_api parse_token, parse_range_list
//! @ai:module:depends_on annotation
//! @ai:module:stateless true
//!
//! Grammar of a single token:
//!
//! ```text
//! token = line ( "[" begin "," end "]" )?
//! ```
//!
//! where `line`, `begin` and `end` are unsigned decimal integers. The parser
//! is purely syntactic: `begin > end` is accepted as written.

use crate::annotation::{MalformedToken, RangeArg};
use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<line>[0-9]+)(?:\[(?P<begin>[0-9]+),(?P<end>[0-9]+)\])?$")
        .expect("Invalid regex")
});

/// @ai:intent Parse one whitespace-free token into a RangeArg
/// @ai:pre token contains no whitespace
/// @ai:post Err carries the token and the stream line it came from
/// @ai:example ("12", 1) -> Ok(12)
/// @ai:example ("2[0,4]", 1) -> Ok(2[0,4])
/// @ai:example ("1[1]", 5) -> Err(line 5, "1[1]")
/// @ai:effects pure
pub fn parse_token(token: &str, line_number: usize) -> Result<RangeArg, MalformedToken> {
    let malformed = || MalformedToken {
        token: token.to_string(),
        line: line_number,
    };

    let captures = TOKEN_RE.captures(token).ok_or_else(malformed)?;

    // Digits-only groups can still overflow usize.
    let number = |name: &str| -> Result<Option<usize>, MalformedToken> {
        captures
            .name(name)
            .map(|m| m.as_str().parse::<usize>().map_err(|_| malformed()))
            .transpose()
    };

    let line = number("line")?.ok_or_else(malformed)?;
    match (number("begin")?, number("end")?) {
        (Some(begin), Some(end)) => Ok(RangeArg::chars(line, begin, end)),
        _ => Ok(RangeArg::line(line)),
    }
}

/// @ai:intent Parse a whitespace separated list of range tokens
/// @ai:post args keep source order; malformed tokens are omitted from args and listed in the second element
/// @ai:effects pure
pub fn parse_range_list(text: &str, line_number: usize) -> (Vec<RangeArg>, Vec<MalformedToken>) {
    let mut args = Vec::new();
    let mut malformed = Vec::new();

    for token in text.split_whitespace() {
        match parse_token(token, line_number) {
            Ok(arg) => args.push(arg),
            Err(bad) => malformed.push(bad),
        }
    }

    (args, malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_only() {
        assert_eq!(parse_token("5", 1), Ok(RangeArg::line(5)));
    }

    #[test]
    fn test_line_with_chars() {
        assert_eq!(parse_token("2[0,4]", 1), Ok(RangeArg::chars(2, 0, 4)));
    }

    #[test]
    fn test_reversed_interval_is_kept() {
        assert_eq!(parse_token("3[9,2]", 1), Ok(RangeArg::chars(3, 9, 2)));
    }

    #[test]
    fn test_malformed_tokens() {
        for token in ["[1,2]", "abc", "1[1]", "5[1,]", "1[,2]", "-3", "1[1,2]x", "1 [1,2]"] {
            let err = parse_token(token, 7).unwrap_err();
            assert_eq!(err.token, token);
            assert_eq!(err.line, 7);
        }
    }

    #[test]
    fn test_overflow_is_malformed() {
        assert!(parse_token("99999999999999999999999999", 1).is_err());
        assert!(parse_token("1[0,99999999999999999999999999]", 1).is_err());
    }

    #[test]
    fn test_list_keeps_siblings_of_malformed_token() {
        let (args, bad) = parse_range_list("  5[1,]  4[2,3] abc 9 ", 3);
        assert_eq!(args, vec![RangeArg::chars(4, 2, 3), RangeArg::line(9)]);
        assert_eq!(
            bad.iter().map(|b| b.token.as_str()).collect::<Vec<_>>(),
            vec!["5[1,]", "abc"]
        );
        assert!(bad.iter().all(|b| b.line == 3));
    }

    #[test]
    fn test_empty_list() {
        let (args, bad) = parse_range_list("   ", 1);
        assert!(args.is_empty());
        assert!(bad.is_empty());
    }
}
