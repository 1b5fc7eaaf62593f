//! Core error types for `PageSpy`
//!
//! Content loading and validation errors shared across the workspace.
//! The tracker itself has no error paths: missing elements are handled by
//! silent early returns.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// Content Errors
// ============================================================================

/// Content file loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}{}: {message}", line.map_or_else(String::new, |l| format!(" (line {l})")))]
    ParseError {
        /// Path to the content file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Content validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the content file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced content file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Content file exceeds the configured size limit
    #[error("{path} is {size} bytes (limit: {limit})")]
    TooLarge {
        /// Path to the oversized file
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// One or more content files failed validation.
    #[error("{count} file(s) failed validation")]
    ValidationFailed {
        /// Number of files that failed validation.
        count: usize,
    },
}

// ============================================================================
// Tracker Errors
// ============================================================================

/// Rejected visibility threshold configurations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    /// A threshold lies outside `[0, 1]` or is not a number
    #[error("threshold {0} is outside [0, 1]")]
    OutOfRange(f64),

    /// Fewer distinct thresholds than the observer needs
    #[error("need at least {required} distinct thresholds, got {actual}")]
    TooFew {
        /// Minimum number of distinct points
        required: usize,
        /// Distinct points supplied
        actual: usize,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during content validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "modules[2].id")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl ValidationIssue {
    /// Creates an error-level issue.
    #[must_use]
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Creates a warning-level issue.
    #[must_use]
    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - validation failure that prevents the content from being used
    Error,
    /// Warning - potential issue that does not prevent loading
    Warning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue::error("modules[0].id", "id is empty");
        assert_eq!(issue.to_string(), "error: id is empty at modules[0].id");
    }

    #[test]
    fn test_validation_issue_warning_display() {
        let issue = ValidationIssue::warning("site.default_section", "no such section");
        assert_eq!(
            issue.to_string(),
            "warning: no such section at site.default_section"
        );
    }

    #[test]
    fn test_config_error_display_with_line() {
        let err = ConfigError::ParseError {
            path: PathBuf::from("content.yaml"),
            line: Some(42),
            message: "unexpected token".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("content.yaml"));
        assert!(text.contains("(line 42)"));
        assert!(text.contains("unexpected token"));
    }

    #[test]
    fn test_too_large_display() {
        let err = ConfigError::TooLarge {
            path: PathBuf::from("big.yaml"),
            size: 2048,
            limit: 1024,
        };
        assert_eq!(err.to_string(), "big.yaml is 2048 bytes (limit: 1024)");
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }

    #[test]
    fn test_threshold_error_display() {
        let err = ThresholdError::TooFew {
            required: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "need at least 3 distinct thresholds, got 2");
    }
}
