//! @ai:module:intent Define the supported annotation markup dialects
//! @ai:module:layer domain
//! @ai:module:public_api MarkupDialect, detect_dialect
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// @ai:intent Markup language an annotation stream is written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupDialect {
    /// Lightweight markup (CommonMark).
    #[default]
    Markdown,
    /// Structured document markup (reStructuredText).
    Rest,
}

impl MarkupDialect {
    pub const ALL: [MarkupDialect; 2] = [MarkupDialect::Markdown, MarkupDialect::Rest];

    /// @ai:intent Canonical dialect name
    /// @ai:effects pure
    pub fn name(&self) -> &'static str {
        match self {
            MarkupDialect::Markdown => "markdown",
            MarkupDialect::Rest => "rest",
        }
    }

    /// @ai:intent Names accepted by from_name, canonical name first
    pub fn aliases(&self) -> &[&'static str] {
        match self {
            MarkupDialect::Markdown => &["markdown", "md", "lightweight"],
            MarkupDialect::Rest => &["rest", "rst", "restructuredtext"],
        }
    }

    /// @ai:intent File extensions of annotation files in this dialect
    pub fn extensions(&self) -> &[&'static str] {
        match self {
            MarkupDialect::Markdown => &["md", "markdown", "mkd"],
            MarkupDialect::Rest => &["rst", "rest"],
        }
    }

    /// @ai:intent Resolve a dialect from a configuration name
    /// @ai:post Err(UnknownDialect) for any name not listed in aliases()
    /// @ai:example ("rst") -> Ok(Rest)
    /// @ai:example ("asciidoc") -> Err(UnknownDialect)
    /// @ai:effects pure
    pub fn from_name(name: &str) -> Result<Self> {
        let wanted = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|dialect| dialect.aliases().contains(&wanted.as_str()))
            .ok_or_else(|| Error::UnknownDialect(name.to_string()))
    }
}

impl FromStr for MarkupDialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for MarkupDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// @ai:intent Detect the annotation dialect from a file path
/// @ai:example ("notes.md") -> Some(Markdown)
/// @ai:example ("notes.rst") -> Some(Rest)
/// @ai:example ("notes.txt") -> None
/// @ai:effects pure
pub fn detect_dialect(path: &Path) -> Option<MarkupDialect> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    MarkupDialect::ALL
        .into_iter()
        .find(|dialect| dialect.extensions().contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(MarkupDialect::from_name("markdown").unwrap(), MarkupDialect::Markdown);
        assert_eq!(MarkupDialect::from_name("RST").unwrap(), MarkupDialect::Rest);
        assert_eq!("rest".parse::<MarkupDialect>().unwrap(), MarkupDialect::Rest);
    }

    #[test]
    fn test_unknown_name() {
        match MarkupDialect::from_name("asciidoc") {
            Err(Error::UnknownDialect(name)) => assert_eq!(name, "asciidoc"),
            other => panic!("expected UnknownDialect, got {:?}", other),
        }
    }

    #[test]
    fn test_detect_dialect() {
        assert_eq!(detect_dialect(Path::new("a.md")), Some(MarkupDialect::Markdown));
        assert_eq!(detect_dialect(Path::new("a.RST")), Some(MarkupDialect::Rest));
        assert_eq!(detect_dialect(Path::new("a.txt")), None);
        assert_eq!(detect_dialect(Path::new("README")), None);
    }
}
