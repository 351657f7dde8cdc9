//! @ai:module:intent CLI entry point for codeco document generation
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on config, document, directive, lexer, output

use codeco::{
    detect_dialect, directive, document, highlight, lexer, output, prefix, CodecoConfig,
    MarkupDialect, OutputFormat, ProcessOptions, Result,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codeco")]
#[command(author, version, about = "codeco - interactive code and annotation documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a code file and its annotations into an HTML document
    Render {
        /// Path to the source code file
        code: PathBuf,

        /// Path to the annotation file
        annotations: PathBuf,

        /// Write the document here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Annotation markup (markdown, rest); guessed from the file extension when omitted
        #[arg(long)]
        format: Option<String>,

        /// Highlight style
        #[arg(long)]
        style: Option<String>,

        /// Language of the code; guessed from the file name when omitted
        #[arg(long)]
        language: Option<String>,

        /// Fixed id prefix
        #[arg(long)]
        prefix: Option<String>,

        /// HTML template file with {title} {style} {script} {annotations} {code} placeholders
        #[arg(long)]
        template: Option<PathBuf>,

        /// Path to configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,
    },

    /// Parse an annotation file and show its blocks
    Parse {
        /// Path to the annotation file
        path: PathBuf,

        /// Id prefix attached to every block
        #[arg(long)]
        prefix: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,

        /// Fail with exit code 1 if malformed range tokens are found
        #[arg(long, default_value = "false")]
        strict: bool,
    },

    /// Render a divider-separated file as a two-column fragment
    Directive {
        /// File holding code, a <[==========]> divider line, then annotations
        path: PathBuf,

        /// Write the fragment here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Annotation markup (markdown, rest)
        #[arg(long)]
        format: Option<String>,

        /// Highlight style
        #[arg(long)]
        style: Option<String>,

        /// Language of the code
        #[arg(long)]
        language: Option<String>,

        /// Fixed id prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Path to configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,
    },

    /// List available highlight styles
    Styles {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

/// Processing flags shared by `render` and `directive`.
struct Overrides {
    format: Option<String>,
    style: Option<String>,
    language: Option<String>,
    prefix: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("codeco=warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            code,
            annotations,
            output,
            title,
            format,
            style,
            language,
            prefix,
            template,
            config,
        } => run_render(
            &code,
            &annotations,
            output.as_deref(),
            title,
            template.as_deref(),
            config.as_deref(),
            Overrides {
                format,
                style,
                language,
                prefix,
            },
        ),

        Commands::Parse {
            path,
            prefix,
            format,
            strict,
        } => run_parse(&path, prefix.as_deref(), format.into(), strict),

        Commands::Directive {
            path,
            output,
            format,
            style,
            language,
            prefix,
            config,
        } => run_directive(
            &path,
            output.as_deref(),
            config.as_deref(),
            Overrides {
                format,
                style,
                language,
                prefix,
            },
        ),

        Commands::Styles { format } => {
            println!(
                "{}",
                output::format_styles(
                    &highlight::available_styles(),
                    highlight::DEFAULT_STYLE,
                    format.into()
                )
                .trim_end()
            );
            Ok(ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<CodecoConfig> {
    match path {
        Some(path) => CodecoConfig::load(path),
        None => Ok(CodecoConfig::default()),
    }
}

/// CLI flags win over configuration values.
fn process_options(
    config: &CodecoConfig,
    overrides: Overrides,
    annotations_path: Option<&Path>,
    config_given: bool,
) -> Result<ProcessOptions> {
    let mut options = config.to_process_options()?;

    match overrides.format {
        Some(name) => options.dialect = MarkupDialect::from_name(&name)?,
        None if !config_given => {
            if let Some(dialect) = annotations_path.and_then(detect_dialect) {
                options.dialect = dialect;
            }
        }
        None => {}
    }
    if let Some(style) = overrides.style {
        options.style = style;
    }
    if overrides.language.is_some() {
        options.language = overrides.language;
    }
    if overrides.prefix.is_some() {
        options.prefix = overrides.prefix;
    }
    Ok(options)
}

fn run_render(
    code: &Path,
    annotations: &Path,
    out: Option<&Path>,
    title: Option<String>,
    template: Option<&Path>,
    config_path: Option<&Path>,
    overrides: Overrides,
) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let options = process_options(&config, overrides, Some(annotations), config_path.is_some())?;

    let template = match template {
        Some(path) => Some(codeco::read_file(path)?),
        None => config.template()?,
    };
    let title = title.unwrap_or_else(|| config.document.title.clone());

    let document = document::create_document(
        code,
        annotations,
        &title,
        template.as_deref(),
        out,
        &options,
    )?;

    match out {
        Some(path) => tracing::info!(path = %path.display(), "document written"),
        None => print!("{}", document),
    }
    Ok(ExitCode::SUCCESS)
}

fn run_parse(
    path: &Path,
    prefix: Option<&str>,
    format: OutputFormat,
    strict: bool,
) -> Result<ExitCode> {
    let text = codeco::read_file(path)?;
    let prefix = prefix::resolve_prefix(prefix, prefix::DEFAULT_PREFIX_LENGTH);
    let lexed = lexer::parse(&text, &prefix);

    println!("{}", output::format_lexed(&lexed, format).trim_end());

    if strict && !lexed.is_clean() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_directive(
    path: &Path,
    out: Option<&Path>,
    config_path: Option<&Path>,
    overrides: Overrides,
) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let options = process_options(&config, overrides, None, config_path.is_some())?;

    let content = codeco::read_file(path)?;
    let fragment = directive::render_directive(&content, &options)?;

    match out {
        Some(path) => document::Document::from(fragment).write_to(path)?,
        None => print!("{}", fragment),
    }
    Ok(ExitCode::SUCCESS)
}
