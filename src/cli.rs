use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// promptxml — build a PromptSpecification XML document from form fields.
///
/// Collects a task description, line count, tone, language, notes and
/// optional example lines, renders them as XML, and exports the result to
/// stdout, a file, or the clipboard.
#[derive(Debug, Parser)]
#[command(name = "promptxml", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the XML document once from flags, env vars and config file.
    Render(FieldArgs),

    /// Edit the fields interactively; every change re-renders the preview.
    Edit(FieldArgs),

    /// Print the supported tone and language values.
    Fields,
}

/// Field and export arguments shared by `render` and `edit`.
///
/// Every field can also be set via config file or env vars
/// (`PROMPTXML_TASK`, `PROMPTXML_TONE`, …). Precedence: CLI > env > file.
#[derive(Debug, Clone, clap::Args)]
pub struct FieldArgs {
    /// Task description (e.g. "Write a formal email").
    #[arg(long)]
    pub task: Option<String>,

    /// Preferred number of lines. Embedded as entered; not range-checked.
    #[arg(long)]
    pub lines: Option<String>,

    /// Tone: neutral, formal, informal, friendly or technical.
    #[arg(long)]
    pub tone: Option<String>,

    /// Output language (see `promptxml fields` for the list).
    #[arg(long)]
    pub language: Option<String>,

    /// Additional notes or constraints.
    #[arg(long)]
    pub notes: Option<String>,

    /// Serialize the Examples section.
    #[arg(long, default_value_t = false)]
    pub include_examples: bool,

    /// One example line; repeat the flag for multiple lines.
    #[arg(long = "example", conflicts_with = "examples_file")]
    pub examples: Vec<String>,

    /// Read example lines from this file (one per line).
    #[arg(long)]
    pub examples_file: Option<PathBuf>,

    /// Path to a TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the XML to this file. Bare `--output` means "prompt.xml".
    #[arg(long, num_args = 0..=1, default_missing_value = "prompt.xml")]
    pub output: Option<PathBuf>,

    /// Copy the XML to the clipboard.
    #[arg(long, default_value_t = false)]
    pub copy: bool,

    /// Log level filter (default: "info"). Supports tracing directives
    /// (e.g. "debug", "promptxml=trace,warn"). Overridden by PROMPTXML_LOG.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to a log file. When set, structured JSON logs are appended here
    /// in addition to the human-readable stderr output.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
