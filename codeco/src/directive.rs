//! @ai:module:intent Render one divider-separated content block as a two-column fragment
//! @ai:module:layer application
//! @ai:module:public_api split_content, render_directive, DIVIDER_PATTERN
//! @ai:module:depends_on processor, error
//! @ai:module:stateless true

use crate::error::Result;
use crate::processor::{process, ProcessOptions, Processed};
use once_cell::sync::Lazy;
use regex::Regex;

/// A divider line holds at least ten `=` signs.
pub const DIVIDER_PATTERN: &str = r"^<\[={10,}\]> *$";

static DIVIDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(DIVIDER_PATTERN).expect("Invalid regex"));

/// @ai:intent Split content into code and annotations at the first divider line
/// @ai:post the divider line itself belongs to neither part
/// @ai:edge_cases no divider -> everything is code, annotations are empty
/// @ai:edge_cases later divider lines are kept as annotation text
/// @ai:example ("x = 1\n<[==========]>\n<[annotation]>1\nnote") -> ("x = 1", "<[annotation]>1\nnote")
/// @ai:effects pure
pub fn split_content(content: &str) -> (String, String) {
    let mut code = Vec::new();
    let mut annotations = Vec::new();
    let mut found = false;

    for line in content.lines() {
        if !found && DIVIDER_RE.is_match(line) {
            found = true;
            continue;
        }
        if found {
            annotations.push(line);
        } else {
            code.push(line);
        }
    }

    (code.join("\n"), annotations.join("\n"))
}

/// @ai:intent Fill the two-column table with a processed pairing
/// @ai:effects pure
pub fn two_columns(processed: &Processed) -> String {
    format!(
        "<table class=\"two-columns\">\n    <tr>\n        <td class=\"left\">{}</td>\n        <td class=\"right\">{}</td>\n    </tr>\n</table>\n",
        processed.annotations, processed.code
    )
}

/// @ai:intent Split, process and lay out a directive body
/// @ai:post annotations are in the left column, highlighted code in the right
/// @ai:effects random (prefix generation when no explicit prefix is set)
pub fn render_directive(content: &str, options: &ProcessOptions) -> Result<String> {
    let (code, annotations) = split_content(content);
    tracing::debug!(
        code_lines = code.lines().count(),
        annotation_lines = annotations.lines().count(),
        "split directive content"
    );
    let processed = process(&code, &annotations, options)?;
    Ok(two_columns(&processed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_at_first_divider() {
        let (code, annotations) = split_content(
            "x = 1\ny = 2\n<[==========]>  \n<[annotation]>1\nnote\n<[===========]>\nmore",
        );
        assert_eq!(code, "x = 1\ny = 2");
        assert_eq!(annotations, "<[annotation]>1\nnote\n<[===========]>\nmore");
    }

    #[test]
    fn test_split_without_divider() {
        let (code, annotations) = split_content("x = 1\n<[==========]> trailing\n");
        assert_eq!(code, "x = 1\n<[==========]> trailing");
        assert_eq!(annotations, "");
    }

    #[test]
    fn test_short_rules_are_not_dividers() {
        let content = "x = 1\n<[=]>\n<[=========]>\n<[]>\n<[annotation]>1\nnote";
        let (code, annotations) = split_content(content);
        assert_eq!(code, content);
        assert_eq!(annotations, "");
    }

    #[test]
    fn test_render_directive() {
        let options = ProcessOptions {
            prefix: Some("d".to_string()),
            language: Some("python".to_string()),
            ..Default::default()
        };
        let html =
            render_directive("x = 1\n<[===========]>\n<[annotation]>1\nSets x", &options).unwrap();

        assert!(html.starts_with("<table class=\"two-columns\">"));
        let left = html.find("<td class=\"left\"><div class=\"annotations\">").unwrap();
        let right = html.find("<td class=\"right\"><table class=\"highlighttable\">").unwrap();
        assert!(left < right);
        assert!(html.contains("id=\"dline-1\""));
        assert!(html.contains("Sets x"));
    }
}
