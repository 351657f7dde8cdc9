//! @ai:module:intent Render annotation bodies into HTML fragments
//! @ai:module:layer application
//! @ai:module:public_api MarkupRenderer, RenderOptions, renderer_for
//! @ai:module:depends_on dialect, error
//! @ai:module:stateless true

mod markdown;
mod rest;

pub use markdown::MarkdownRenderer;
pub use rest::RestRenderer;

use crate::dialect::MarkupDialect;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// @ai:intent Open set of renderer options, keyed by option name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderOptions(BTreeMap<String, Value>);

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// @ai:intent Layer these options over a base configuration
    /// @ai:post keys present in self win over keys of base
    /// @ai:effects pure
    pub fn merged_over(&self, base: RenderOptions) -> RenderOptions {
        let mut merged = base;
        merged
            .0
            .extend(self.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// @ai:intent Read a boolean option; null counts as absent
    pub fn bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(invalid(key, "a boolean", other)),
        }
    }

    /// @ai:intent Read an integer option; null counts as absent
    pub fn integer(&self, key: &str) -> Result<Option<i64>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| invalid(key, "an integer", &Value::Number(n.clone()))),
            Some(other) => Err(invalid(key, "an integer", other)),
        }
    }

    /// @ai:intent Read a string option; null counts as absent
    pub fn string(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(invalid(key, "a string", other)),
        }
    }
}

fn invalid(key: &str, expected: &str, found: &Value) -> Error {
    Error::InvalidOption {
        key: key.to_string(),
        message: format!("expected {}, found {}", expected, found),
    }
}

/// @ai:intent Capability shared by every markup dialect
pub trait MarkupRenderer {
    /// Dialect this renderer implements.
    fn dialect(&self) -> MarkupDialect;

    /// Fixed base configuration the caller's options are merged over.
    fn base_options(&self) -> RenderOptions;

    /// Render with an already merged configuration.
    fn render_merged(&self, body: &str, options: &RenderOptions) -> Result<String>;

    /// @ai:intent Render one annotation body into an HTML fragment
    /// @ai:post caller options take precedence over base_options()
    fn render(&self, body: &str, options: &RenderOptions) -> Result<String> {
        let merged = options.merged_over(self.base_options());
        self.render_merged(body, &merged)
    }
}

/// @ai:intent Select the renderer implementing a dialect
/// @ai:effects pure
pub fn renderer_for(dialect: MarkupDialect) -> &'static dyn MarkupRenderer {
    match dialect {
        MarkupDialect::Markdown => &MarkdownRenderer,
        MarkupDialect::Rest => &RestRenderer,
    }
}
