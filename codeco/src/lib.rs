//! @ai:module:intent codeco library for pairing source code with interactive annotations
//! @ai:module:layer infrastructure
//! @ai:module:public_api annotation, range, lexer, render, wrapper, prefix, highlight, processor, document, directive, config, output, error
//! @ai:module:stateless true
//!
//! # codeco
//!
//! Turns a source file and a stream of annotation blocks into one HTML
//! document. Each annotation names the code lines (or character ranges) it
//! talks about; hovering it in the browser highlights that code.
//!
//! Annotation streams are split by marker lines:
//!
//! ```text
//! <[annotation]>1 3[4,9]
//! # Setup
//! Explains line 1 and characters 4..=9 of line 3.
//! <[hidden-annotation]>7
//! Collapsed until hovered.
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use codeco::{document, ProcessOptions};
//! use std::path::Path;
//!
//! let options = ProcessOptions::default();
//! let doc = document::create_document(
//!     Path::new("fib.py"),
//!     Path::new("fib.md"),
//!     "Fibonacci",
//!     None,
//!     Some(Path::new("fib.html")),
//!     &options,
//! )
//! .unwrap();
//! println!("{} bytes", doc.as_str().len());
//! ```

pub mod annotation;
pub mod config;
pub mod dialect;
pub mod directive;
pub mod document;
pub mod error;
pub mod highlight;
pub mod html;
pub mod lexer;
pub mod output;
pub mod prefix;
pub mod processor;
pub mod range;
pub mod render;
pub mod wrapper;

pub use annotation::{AnnotationBlock, AnnotationMeta, Lexed, MalformedToken, RangeArg};
pub use config::CodecoConfig;
pub use dialect::{detect_dialect, MarkupDialect};
pub use directive::{render_directive, split_content};
pub use document::{assemble, create_document, Document};
pub use error::{Error, Result};
pub use highlight::{available_styles, Highlighted, HighlightOptions};
pub use output::{format_lexed, OutputFormat};
pub use prefix::{resolve_prefix, PrefixGenerator};
pub use processor::{process, process_files, read_file, ProcessOptions, Processed, SCRIPT};
pub use render::{renderer_for, MarkupRenderer, RenderOptions};
pub use wrapper::{wrap, RenderedAnnotation};
