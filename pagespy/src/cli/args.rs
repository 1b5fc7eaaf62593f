//! CLI argument definitions
//!
//! All Clap derive structs for `PageSpy` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Render a single-page site and replay scroll sessions against its
/// active-section tracker.
#[derive(Parser, Debug)]
#[command(name = "pagespy", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "PAGESPY_COLOR")]
    pub color: ColorChoice,

    /// Log line format on stderr.
    #[arg(long, default_value = "human", global = true, env = "PAGESPY_LOG_FORMAT")]
    pub log_format: LogFormatArg,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the page with content injected and write the HTML.
    Render(RenderArgs),

    /// Validate content files without rendering.
    Validate(ValidateArgs),

    /// Replay a browsing trace against the rendered page.
    Simulate(SimulateArgs),

    /// Print the effective content (built-in or loaded).
    Content(ContentArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version and build information.
    Version(VersionArgs),
}

// ============================================================================
// Render
// ============================================================================

/// Arguments for `render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Content file (built-in content when omitted).
    #[arg(short, long, env = "PAGESPY_CONTENT")]
    pub content: Option<PathBuf>,

    /// Write HTML here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// URL fragment used to pick the initially active section.
    #[arg(long, default_value = "")]
    pub fragment: String,

    /// Footer year (defaults to the current year).
    #[arg(long)]
    pub year: Option<i32>,
}

// ============================================================================
// Validate
// ============================================================================

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Content files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

// ============================================================================
// Simulate
// ============================================================================

/// Arguments for `simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Trace file to replay.
    pub trace: PathBuf,

    /// Content file (built-in content when omitted).
    #[arg(short, long, env = "PAGESPY_CONTENT")]
    pub content: Option<PathBuf>,

    /// Override the trace's initial fragment.
    #[arg(long)]
    pub fragment: Option<String>,

    /// Write JSONL events here instead of stdout.
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Write the final page HTML to this file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print Prometheus metrics to stdout after the run.
    #[arg(long)]
    pub metrics: bool,

    /// Delay between trace events, in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,

    /// Footer year (defaults to the trace's year, then the current year).
    #[arg(long)]
    pub year: Option<i32>,
}

// ============================================================================
// Content
// ============================================================================

/// Arguments for `content`.
#[derive(Args, Debug)]
pub struct ContentArgs {
    /// Content file (built-in content when omitted).
    #[arg(short, long, env = "PAGESPY_CONTENT")]
    pub content: Option<PathBuf>,

    /// Serialization format.
    #[arg(long, default_value = "yaml")]
    pub format: ContentFormat,
}

// ============================================================================
// Utility Commands
// ============================================================================

/// Arguments for `completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    pub shell: Shell,
}

/// Arguments for `version`.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Value Enums
// ============================================================================

/// Color output control.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal support automatically.
    #[default]
    Auto,
    /// Always emit ANSI colors.
    Always,
    /// Never emit ANSI colors.
    Never,
}

/// Log line format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    /// Human-readable lines.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// Output format for report commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
}

/// Serialization format for `content`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ContentFormat {
    /// YAML, loadable with `--content`.
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

/// Supported shells for completion generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash
    Bash,
    /// Zsh
    Zsh,
    /// Fish
    Fish,
    /// `PowerShell`
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish
    Elvish,
}
