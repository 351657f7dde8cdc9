//! @ai:module:intent Configuration structs for document generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api CodecoConfig, RenderConfig, HighlightConfig, DocumentConfig
//! @ai:module:depends_on processor, render, dialect, error
//! @ai:module:stateless true

use crate::dialect::MarkupDialect;
use crate::document::DEFAULT_TITLE;
use crate::error::{Error, Result};
use crate::highlight::DEFAULT_STYLE;
use crate::prefix::DEFAULT_PREFIX_LENGTH;
use crate::processor::ProcessOptions;
use crate::render::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Main configuration, read from a TOML file
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecoConfig {
    /// Fixed prefix; a fresh one is generated per pairing when absent.
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default = "default_prefix_length")]
    pub prefix_length: usize,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub document: DocumentConfig,
}

/// @ai:intent Annotation markup configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Dialect name or alias.
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub options: RenderOptions,
}

/// @ai:intent Code highlighting configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// @ai:intent Document assembly configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// Template file; the built-in template is used when absent.
    #[serde(default)]
    pub template: Option<PathBuf>,
}

impl Default for CodecoConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            prefix_length: default_prefix_length(),
            render: RenderConfig::default(),
            highlight: HighlightConfig::default(),
            document: DocumentConfig::default(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            options: RenderOptions::default(),
        }
    }
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            style: default_style(),
            language: None,
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            template: None,
        }
    }
}

fn default_prefix_length() -> usize {
    DEFAULT_PREFIX_LENGTH
}

fn default_format() -> String {
    MarkupDialect::default().name().to_string()
}

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl CodecoConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Translate into processing options
    /// @ai:edge_cases unknown render format -> Err(UnknownDialect) before any rendering
    /// @ai:effects pure
    pub fn to_process_options(&self) -> Result<ProcessOptions> {
        Ok(ProcessOptions {
            dialect: MarkupDialect::from_name(&self.render.format)?,
            style: self.highlight.style.clone(),
            prefix: self.prefix.clone(),
            prefix_length: self.prefix_length,
            filename: None,
            language: self.highlight.language.clone(),
            render_options: self.render.options.clone(),
        })
    }

    /// @ai:intent Read the configured template file, if any
    /// @ai:effects fs:read
    pub fn template(&self) -> Result<Option<String>> {
        self.document
            .template
            .as_deref()
            .map(|path| {
                std::fs::read_to_string(path).map_err(|e| Error::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                })
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: CodecoConfig = toml::from_str("").unwrap();
        assert_eq!(config.prefix, None);
        assert_eq!(config.prefix_length, 10);
        assert_eq!(config.render.format, "markdown");
        assert_eq!(config.highlight.style, "InspiredGitHub");
        assert_eq!(config.document.title, "Codeco");
    }

    #[test]
    fn test_load_full_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
prefix = "doc"

[render]
format = "rst"

[render.options]
initial_header_level = 2
halt_level = 3

[highlight]
style = "base16-ocean.dark"
language = "rust"

[document]
title = "Walkthrough"
"#
        )
        .unwrap();

        let config = CodecoConfig::load(file.path()).unwrap();
        let options = config.to_process_options().unwrap();

        assert_eq!(options.dialect, MarkupDialect::Rest);
        assert_eq!(options.prefix.as_deref(), Some("doc"));
        assert_eq!(options.language.as_deref(), Some("rust"));
        assert_eq!(options.style, "base16-ocean.dark");
        assert_eq!(
            options.render_options.get("initial_header_level"),
            Some(&serde_json::json!(2))
        );
        assert_eq!(config.document.title, "Walkthrough");
    }

    #[test]
    fn test_unknown_format_fails() {
        let config = CodecoConfig {
            render: RenderConfig {
                format: "asciidoc".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.to_process_options(),
            Err(Error::UnknownDialect(name)) if name == "asciidoc"
        ));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "prefix_length = \"ten\"").unwrap();
        assert!(matches!(CodecoConfig::load(file.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_template_is_read_error() {
        let mut config = CodecoConfig::default();
        config.document.template = Some(PathBuf::from("/no/such/template.html"));
        assert!(matches!(config.template(), Err(Error::FileRead { .. })));
    }
}
