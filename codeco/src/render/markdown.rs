//! @ai:module:intent Render lightweight-markup (CommonMark) annotation bodies
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownRenderer
//! @ai:module:depends_on render
//! @ai:module:stateless true

use super::{MarkupRenderer, RenderOptions};
use crate::dialect::MarkupDialect;
use crate::error::Result;
use comrak::{markdown_to_html, ComrakOptions};

const KNOWN_KEYS: &[&str] = &[
    "table",
    "strikethrough",
    "autolink",
    "tasklist",
    "superscript",
    "footnotes",
    "header_ids",
    "smart",
    "hardbreaks",
    "unsafe",
];

/// @ai:intent Renderer for the lightweight-markup dialect, backed by comrak
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkupRenderer for MarkdownRenderer {
    fn dialect(&self) -> MarkupDialect {
        MarkupDialect::Markdown
    }

    fn base_options(&self) -> RenderOptions {
        // Raw HTML passes through so annotations can embed their own markup.
        RenderOptions::new()
            .with("table", true)
            .with("strikethrough", true)
            .with("autolink", true)
            .with("unsafe", true)
            .with("hardbreaks", false)
            .with("smart", false)
    }

    /// @ai:intent Render CommonMark with the merged option set
    /// @ai:post unknown option keys are ignored with a warning
    /// @ai:effects pure
    fn render_merged(&self, body: &str, options: &RenderOptions) -> Result<String> {
        for key in options.keys().filter(|key| !KNOWN_KEYS.contains(key)) {
            tracing::warn!("ignoring unknown markdown option `{}`", key);
        }

        let comrak_options = comrak_options(options)?;
        Ok(markdown_to_html(body, &comrak_options))
    }
}

/// @ai:intent Translate the open option map into comrak's option struct
fn comrak_options(options: &RenderOptions) -> Result<ComrakOptions<'static>> {
    let mut comrak = ComrakOptions::default();

    let flag = |key: &str| -> Result<bool> { Ok(options.bool(key)?.unwrap_or(false)) };

    comrak.extension.table = flag("table")?;
    comrak.extension.strikethrough = flag("strikethrough")?;
    comrak.extension.autolink = flag("autolink")?;
    comrak.extension.tasklist = flag("tasklist")?;
    comrak.extension.superscript = flag("superscript")?;
    comrak.extension.footnotes = flag("footnotes")?;
    comrak.extension.header_ids = options.string("header_ids")?;
    comrak.parse.smart = flag("smart")?;
    comrak.render.hardbreaks = flag("hardbreaks")?;
    comrak.render.unsafe_ = flag("unsafe")?;

    Ok(comrak)
}
