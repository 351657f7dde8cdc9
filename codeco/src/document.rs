//! @ai:module:intent Assemble processed pieces into a self-contained HTML document
//! @ai:module:layer application
//! @ai:module:public_api assemble, fill_template, create_document, Document, DEFAULT_TEMPLATE
//! @ai:module:depends_on processor, wrapper, html, error
//!
//! Templates use the named placeholders `{title}`, `{style}`, `{script}`,
//! `{annotations}` and `{code}`. Any other brace text is left untouched.

use crate::error::{Error, Result};
use crate::html::escape_text;
use crate::processor::{annotations_section, process_files, ProcessOptions, Processed};
use crate::wrapper::RenderedAnnotation;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;

pub const DEFAULT_TITLE: &str = "Codeco";

pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta http-equiv="Content-Type" content="text/html; charset=utf-8" />
    <title>{title}</title>

    <style type="text/css">
    body {
        margin: 0;
        padding: 10px;
        background-color: lightsteelblue;
    }
    #wrapper {
        border: 1px solid lightgray;
        width: 80%;
        margin: auto;
        padding: 10px 20px;
        background-color: white;
    }
    </style>

    <style type="text/css">
    {style}
    </style>

    <script type="text/javascript">
    {script}
    </script>
</head>
<body>
<div id="wrapper">
{annotations}
{code}
</div>
</body>
</html>
"#;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(title|style|script|annotations|code)\}").expect("Invalid regex"));

/// @ai:intent Values substituted into a template
#[derive(Debug, Clone, Copy)]
pub struct Placeholders<'a> {
    pub title: &'a str,
    pub style: &'a str,
    pub script: &'a str,
    pub annotations: &'a str,
    pub code: &'a str,
}

/// @ai:intent Substitute every known placeholder in a single pass
/// @ai:post substituted values are never rescanned for placeholders
/// @ai:edge_cases a placeholder missing from the template drops that content silently
/// @ai:effects pure
pub fn fill_template(template: &str, values: &Placeholders<'_>) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| match &caps[1] {
            "title" => values.title,
            "style" => values.style,
            "script" => values.script,
            "annotations" => values.annotations,
            _ => values.code,
        })
        .into_owned()
}

/// @ai:intent A finished HTML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document(String);

impl Document {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// @ai:intent Write the document atomically through a temp file in the target directory
    /// @ai:post on failure the target is either untouched or absent, never truncated
    /// @ai:post a new file gets the default create mode; a replaced file keeps its mode
    /// @ai:effects fs:write
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let write_error = |source| Error::FileWrite {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Same mode as a plain create; the process umask still applies.
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let mut file = builder.tempfile_in(dir).map_err(write_error)?;

        // A replaced file keeps its permissions.
        if let Ok(existing) = fs::metadata(path) {
            file.as_file()
                .set_permissions(existing.permissions())
                .map_err(write_error)?;
        }

        file.write_all(self.0.as_bytes()).map_err(write_error)?;
        file.flush().map_err(write_error)?;
        file.persist(path).map_err(|e| write_error(e.error))?;

        tracing::debug!(path = %path.display(), bytes = self.0.len(), "wrote document");
        Ok(())
    }
}

impl From<String> for Document {
    fn from(html: String) -> Self {
        Self(html)
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// @ai:intent Join annotations into their section and fill the template
/// @ai:pre annotations are in lexing order
/// @ai:post the title is HTML-escaped; every other value is inserted verbatim
/// @ai:effects pure
pub fn assemble(
    title: &str,
    annotations: &[RenderedAnnotation],
    code: &str,
    style: &str,
    script: &str,
    template: Option<&str>,
) -> Document {
    let title = escape_text(title);
    let annotations = annotations_section(annotations);
    Document(fill_template(
        template.unwrap_or(DEFAULT_TEMPLATE),
        &Placeholders {
            title: &title,
            style,
            script,
            annotations: &annotations,
            code,
        },
    ))
}

impl Processed {
    /// @ai:intent Assemble this pairing into a document
    pub fn to_document(&self, title: &str, template: Option<&str>) -> Document {
        assemble(
            title,
            &self.rendered,
            &self.code,
            &self.style,
            &self.script,
            template,
        )
    }
}

/// @ai:intent Read, process and assemble one pairing; optionally persist it
/// @ai:post when `out` is set the returned document equals the written file
/// @ai:effects fs:read, fs:write
pub fn create_document(
    code_path: &Path,
    annotations_path: &Path,
    title: &str,
    template: Option<&str>,
    out: Option<&Path>,
    options: &ProcessOptions,
) -> Result<Document> {
    let processed = process_files(code_path, annotations_path, options)?;
    let document = processed.to_document(title, template);

    if let Some(path) = out {
        document.write_to(path)?;
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn annotation(body: &str) -> RenderedAnnotation {
        RenderedAnnotation {
            metadata_json: r#"{"prefix":"p","hidden":false,"args":null}"#.to_string(),
            html: format!("<div class=\"annotation_body\">{}</div>", body),
        }
    }

    #[test]
    fn test_assemble_default_template() {
        let doc = assemble("A <b>", &[annotation("<p>x</p>")], "<table/>", "S", "J", None);
        let html = doc.as_str();
        assert!(html.contains("<title>A &lt;b&gt;</title>"));
        assert!(html.contains("<div class=\"annotations\">\n<div class=\"annotation\">"));
        assert!(html.contains("<table/>"));
        assert!(html.contains("    S\n"));
        assert!(html.contains("    J\n"));
        assert!(html.contains("padding: 10px;"));
    }

    #[test]
    fn test_template_without_code_placeholder() {
        let doc = assemble(
            "T",
            &[annotation("<p>note</p>")],
            "CODE",
            "",
            "",
            Some("<h1>{title}</h1>{annotations}"),
        );
        assert!(doc.as_str().starts_with("<h1>T</h1><div class=\"annotations\">"));
        assert!(doc.as_str().contains("<p>note</p>"));
        assert!(!doc.as_str().contains("CODE"));
    }

    #[test]
    fn test_unknown_placeholders_stay() {
        let doc = assemble("T", &[], "", "", "", Some("{title} {author} {{code}}"));
        assert_eq!(doc.as_str(), "T {author} {}");
    }

    #[test]
    fn test_substitution_is_single_pass() {
        let filled = fill_template(
            "{code}",
            &Placeholders {
                title: "t",
                style: "",
                script: "",
                annotations: "",
                code: "{title}",
            },
        );
        assert_eq!(filled, "{title}");
    }

    #[test]
    fn test_write_to_replaces_target() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.html");
        fs::write(&path, "old contents that are longer").unwrap();

        let doc = assemble("T", &[], "", "", "", Some("{title}"));
        doc.write_to(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "T");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_gets_default_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let written = dir.path().join("doc.html");
        let plain = dir.path().join("plain.html");

        assemble("T", &[], "", "", "", None).write_to(&written).unwrap();
        fs::write(&plain, "T").unwrap();

        let mode = |path: &Path| fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&written), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn test_replaced_file_keeps_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.html");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        assemble("T", &[], "", "", "", None).write_to(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn test_failed_write_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.html");

        let doc = assemble("T", &[], "", "", "", None);
        let result = doc.write_to(&path);

        assert!(matches!(result, Err(Error::FileWrite { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_create_document_writes_output() {
        let dir = TempDir::new().unwrap();
        let code = dir.path().join("fib.py");
        let notes = dir.path().join("fib.md");
        let out = dir.path().join("fib.html");
        fs::write(&code, "def fib(n):\n    return n\n").unwrap();
        fs::write(&notes, "<[annotation]>1\n# Fibonacci\nRecursive.").unwrap();

        let options = ProcessOptions {
            prefix: Some("fib".to_string()),
            ..Default::default()
        };
        let doc = create_document(&code, &notes, "Fib", None, Some(&out), &options).unwrap();

        assert_eq!(fs::read_to_string(&out).unwrap(), doc.as_str());
        assert!(doc.as_str().contains("id=\"fibline-1\""));
        assert!(doc.as_str().contains("class=\"ann_title\">Fibonacci</h1>"));
    }
}
