//! @ai:module:intent Run one code/annotation pairing through lexing, rendering, wrapping and highlighting
//! @ai:module:layer application
//! @ai:module:public_api process, process_files, read_file, ProcessOptions, Processed, SCRIPT, ANNOTATION_CSS
//! @ai:module:depends_on lexer, render, wrapper, highlight, prefix, error
//! @ai:module:stateless true

use crate::annotation::{AnnotationBlock, MalformedToken};
use crate::dialect::MarkupDialect;
use crate::error::{Error, Result};
use crate::highlight::{highlight, HighlightOptions, DEFAULT_STYLE};
use crate::lexer;
use crate::prefix::{resolve_prefix, DEFAULT_PREFIX_LENGTH};
use crate::render::{renderer_for, MarkupRenderer, RenderOptions};
use crate::wrapper::{wrap, RenderedAnnotation};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Client-side script implementing the hover protocol.
pub const SCRIPT: &str = include_str!("assets/codeco.js");

/// Style rules for the annotation column.
pub const ANNOTATION_CSS: &str = include_str!("assets/codeco.css");

/// @ai:intent Build-time options of one pairing
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub dialect: MarkupDialect,
    /// Highlight theme name.
    pub style: String,
    /// Explicit prefix; bypasses the generator when set.
    pub prefix: Option<String>,
    pub prefix_length: usize,
    /// File name hint for language detection.
    pub filename: Option<PathBuf>,
    /// Explicit language name, takes precedence over `filename`.
    pub language: Option<String>,
    pub render_options: RenderOptions,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            dialect: MarkupDialect::default(),
            style: DEFAULT_STYLE.to_string(),
            prefix: None,
            prefix_length: DEFAULT_PREFIX_LENGTH,
            filename: None,
            language: None,
            render_options: RenderOptions::default(),
        }
    }
}

/// @ai:intent Pieces of one processed pairing, ready for a template
#[derive(Debug, Clone, Serialize)]
pub struct Processed {
    pub style: String,
    pub script: String,
    /// The annotations section: every annotation node inside `div.annotations`.
    pub annotations: String,
    pub code: String,
    pub prefix: String,
    pub rendered: Vec<RenderedAnnotation>,
    pub warnings: Vec<MalformedToken>,
}

/// @ai:intent Process code and annotation text into highlighted code and wrapped annotations
/// @ai:post every annotation's metadata carries the same prefix as the code line ids
/// @ai:edge_cases malformed range tokens are returned as warnings, never as errors
/// @ai:effects random (prefix generation when no explicit prefix is set)
pub fn process(code: &str, annotations: &str, options: &ProcessOptions) -> Result<Processed> {
    let renderer = renderer_for(options.dialect);
    let prefix = resolve_prefix(options.prefix.as_deref(), options.prefix_length);

    let highlighted = highlight(
        code,
        &prefix,
        &HighlightOptions {
            filename: options.filename.as_deref(),
            language: options.language.as_deref(),
            style: Some(&options.style),
        },
    )?;

    let lexed = lexer::parse(annotations, &prefix);
    let rendered = render_blocks(&lexed.blocks, renderer, &options.render_options)?;

    tracing::debug!(
        prefix = %prefix,
        annotations = rendered.len(),
        dialect = %options.dialect,
        "processed pairing"
    );

    Ok(Processed {
        style: format!("{}\n{}", highlighted.css, ANNOTATION_CSS),
        script: SCRIPT.to_string(),
        annotations: annotations_section(&rendered),
        code: highlighted.html,
        prefix,
        rendered,
        warnings: lexed.warnings,
    })
}

/// @ai:intent Read a code file and an annotation file, then process them
/// @ai:post the code path doubles as the language hint unless one is set
/// @ai:effects fs:read
pub fn process_files(
    code_path: &Path,
    annotations_path: &Path,
    options: &ProcessOptions,
) -> Result<Processed> {
    let code = read_file(code_path)?;
    let annotations = read_file(annotations_path)?;

    let mut options = options.clone();
    if options.filename.is_none() {
        options.filename = Some(code_path.to_path_buf());
    }
    process(&code, &annotations, &options)
}

/// @ai:intent Read a UTF-8 file, naming the path on failure
/// @ai:effects fs:read
pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// @ai:intent Render and wrap every block in order
/// @ai:post the first rendering failure aborts; no partial result is returned
fn render_blocks(
    blocks: &[AnnotationBlock],
    renderer: &dyn MarkupRenderer,
    options: &RenderOptions,
) -> Result<Vec<RenderedAnnotation>> {
    blocks
        .iter()
        .map(|block| {
            let fragment = renderer.render(&block.body, options)?;
            wrap(&fragment, &block.meta())
        })
        .collect()
}

/// @ai:intent Join annotation nodes, in order, into the annotations section
/// @ai:effects pure
pub fn annotations_section(rendered: &[RenderedAnnotation]) -> String {
    let mut section = vec!["<div class=\"annotations\">".to_string()];
    section.extend(rendered.iter().map(RenderedAnnotation::markup));
    section.push("</div>".to_string());
    section.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationMeta, RangeArg};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn options() -> ProcessOptions {
        ProcessOptions {
            prefix: Some("ab".to_string()),
            language: Some("python".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_process_pairs_prefix_with_line_ids() {
        let processed = process(
            "x = 1\ny = 2\n",
            "<[annotation]>1\nFirst\n<[annotation]>2[0,0]\nSecond",
            &options(),
        )
        .unwrap();

        assert_eq!(processed.prefix, "ab");
        assert!(processed.code.contains("id=\"abline-1\""));
        assert!(processed.code.contains("id=\"abline-2\""));
        assert_eq!(processed.rendered.len(), 2);

        let meta: AnnotationMeta =
            serde_json::from_str(&processed.rendered[1].metadata_json).unwrap();
        assert_eq!(meta.prefix, "ab");
        assert_eq!(meta.args, Some(vec![RangeArg::chars(2, 0, 0)]));

        assert!(processed.annotations.starts_with("<div class=\"annotations\">"));
        assert!(processed.annotations.ends_with("</div>"));
        assert!(processed.style.contains("annotation_hidden"));
        assert_eq!(processed.script, SCRIPT);
    }

    #[test]
    fn test_generated_prefix_when_none_given() {
        let mut opts = options();
        opts.prefix = None;
        let processed = process("x = 1\n", "<[annotation]>1\nx", &opts).unwrap();
        assert_eq!(processed.prefix.len(), DEFAULT_PREFIX_LENGTH);
        assert!(processed
            .code
            .contains(&format!("id=\"{}line-1\"", processed.prefix)));
    }

    #[test]
    fn test_warnings_do_not_stop_processing() {
        let processed = process("x = 1\n", "<[annotation]>1[2] 1\nBody", &options()).unwrap();
        assert_eq!(processed.rendered.len(), 1);
        assert_eq!(processed.warnings.len(), 1);
        assert_eq!(processed.warnings[0].token, "1[2]");
    }

    #[test]
    fn test_render_failure_propagates() {
        let mut opts = options();
        opts.dialect = MarkupDialect::Rest;
        opts.render_options = RenderOptions::new().with("halt_level", 2);
        let result = process("x = 1\n", "<[annotation]>1\nbroken ``literal", &opts);
        assert!(matches!(result, Err(Error::Render { .. })));
    }

    #[test]
    fn test_process_files() {
        let mut code = NamedTempFile::with_suffix(".py").unwrap();
        write!(code, "def f():\n    pass\n").unwrap();
        let mut notes = NamedTempFile::with_suffix(".md").unwrap();
        write!(notes, "<[annotation]>1\n# Entry point").unwrap();

        let opts = ProcessOptions {
            prefix: Some("t".to_string()),
            ..Default::default()
        };
        let processed = process_files(code.path(), notes.path(), &opts).unwrap();
        assert!(processed.annotations.contains("<h1 class=\"ann_title\">Entry point</h1>"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = process_files(
            Path::new("/definitely/not/here.py"),
            Path::new("/definitely/not/here.md"),
            &options(),
        );
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }
}
