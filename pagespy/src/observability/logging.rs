//! Diagnostic logging on stderr.
//!
//! Stdout carries the command's real output (HTML, reports, JSONL events,
//! metrics), so every log line goes to stderr. Verbosity flags widen what
//! the two `PageSpy` crates log while third-party crates stay at `warn`:
//!
//! - default: warnings only (content warnings, ignored visibility entries)
//! - `-v`: startup and run summaries
//! - `-vv`: every dispatched page event and active-section change
//! - `-vvv`: per-section threshold crossings
//!
//! `PAGESPY_LOG_LEVEL` replaces the whole filter with any `EnvFilter`
//! directive string.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::cli::args::{ColorChoice, LogFormatArg};

/// Environment variable holding a full filter directive.
pub const LOG_LEVEL_ENV: &str = "PAGESPY_LOG_LEVEL";

/// Crates whose level follows the verbosity flags.
const OWN_TARGETS: [&str; 2] = ["pagespy", "pagespy_core"];

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain lines, colored when the terminal allows it.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Human => Self::Human,
            LogFormatArg::Json => Self::Json,
        }
    }
}

/// Level applied to the `PageSpy` crates for a `-v` count.
#[must_use]
pub const fn verbosity_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Filter directive for a `-v` count.
///
/// ```
/// use pagespy::observability::logging::verbosity_directive;
///
/// assert_eq!(verbosity_directive(0), "warn");
/// assert_eq!(
///     verbosity_directive(2),
///     "warn,pagespy=debug,pagespy_core=debug"
/// );
/// ```
#[must_use]
pub fn verbosity_directive(verbosity: u8) -> String {
    let level = verbosity_level(verbosity);
    if verbosity == 0 {
        return level.to_string();
    }
    let own: Vec<String> = OWN_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect();
    format!("warn,{}", own.join(","))
}

fn use_ansi(color: ColorChoice) -> bool {
    match color {
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    }
}

/// Installs the global subscriber.
///
/// Module targets are shown from `-vv` on, where events from the renderer,
/// the tracker and the runtime interleave. A second call is a no-op.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_directive(verbosity)));
    let show_target = verbosity >= 2;

    match format {
        LogFormat::Human => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(use_ansi(color))
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
