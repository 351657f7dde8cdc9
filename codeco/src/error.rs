//! @ai:module:intent Define error types for the codeco pipeline
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all fatal codeco failures
///
/// Malformed range tokens are not errors: they surface as
/// [`crate::annotation::MalformedToken`] warnings and never stop the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown markup dialect: {0}")]
    UnknownDialect(String),

    #[error("Unknown highlight style: {0}")]
    UnknownStyle(String),

    #[error("Invalid renderer option `{key}`: {message}")]
    InvalidOption { key: String, message: String },

    #[error("Failed to render {dialect} annotation: {message}")]
    Render { dialect: String, message: String },

    #[error("Cannot determine the code language of {hint}")]
    UnresolvableLanguage { hint: String },

    #[error("Highlighting failed: {0}")]
    Highlight(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
