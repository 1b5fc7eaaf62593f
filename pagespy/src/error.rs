//! Error types for `PageSpy`
//!
//! The top-level error aggregates content, trace and I/O failures and maps
//! each to a process exit code.

use std::path::PathBuf;

use thiserror::Error;

pub use pagespy_core::error::{ConfigError, Severity, ThresholdError, ValidationIssue};

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `PageSpy` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Content error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Trace error (unreadable trace, unknown section reference)
    pub const TRACE_ERROR: i32 = 4;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `PageSpy` operations.
#[derive(Debug, Error)]
pub enum PageSpyError {
    /// Content loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid tracker settings
    #[error("invalid tracker settings: {0}")]
    Threshold(#[from] ThresholdError),

    /// Trace loading or replay error
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// Run was cancelled before completion
    #[error("interrupted")]
    Interrupted,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PageSpyError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Threshold(_) | Self::Json(_) | Self::Yaml(_) => {
                ExitCode::CONFIG_ERROR
            }
            Self::Trace(_) => ExitCode::TRACE_ERROR,
            Self::Interrupted => ExitCode::INTERRUPTED,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Trace Errors
// ============================================================================

/// Trace file loading and replay errors.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Trace file could not be parsed
    #[error("parse error in {path}{}: {message}", line.map_or_else(String::new, |l| format!(" (line {l})")))]
    ParseError {
        /// Path to the trace file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Trace file not found
    #[error("trace not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// A trace entry names a section the page does not have
    #[error("{location}: unknown section '{section}'")]
    UnknownSection {
        /// Where in the trace the reference appears (e.g. "events[3]")
        location: String,
        /// The unresolved section id
        section: String,
    },
}
