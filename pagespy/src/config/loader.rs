//! Content loader
//!
//! Loading pipeline for site content files:
//! 1. Size check against the configured limit
//! 2. YAML parsing
//! 3. Deserialization to typed content
//! 4. Validation (errors abort, warnings are returned)

use std::path::Path;

use pagespy_core::content::{SiteContent, Validator, builtin};
use pagespy_core::error::ConfigError;

/// Environment variable overriding the content size limit, in bytes.
pub const MAX_CONTENT_SIZE_ENV: &str = "PAGESPY_MAX_CONTENT_SIZE";

/// Default content size limit.
pub const DEFAULT_MAX_CONTENT_SIZE: u64 = 1024 * 1024;

// ============================================================================
// Public API
// ============================================================================

/// Options for the content loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Maximum content file size in bytes.
    pub max_content_size: u64,

    /// Treat validation warnings as errors.
    pub strict: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            max_content_size: env_or(MAX_CONTENT_SIZE_ENV, DEFAULT_MAX_CONTENT_SIZE),
            strict: false,
        }
    }
}

/// Result of loading a content file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated content.
    pub content: SiteContent,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during content loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Content loader.
#[derive(Debug, Default)]
pub struct ContentLoader {
    options: LoaderOptions,
}

impl ContentLoader {
    /// Creates a loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Loads `path`, or the compiled-in content when `path` is `None`.
    ///
    /// # Errors
    ///
    /// See [`ContentLoader::load`].
    pub fn load_or_builtin(&self, path: Option<&Path>) -> Result<LoadResult, ConfigError> {
        match path {
            Some(path) => self.load(path),
            None => Ok(LoadResult {
                content: builtin::site(),
                warnings: Vec::new(),
            }),
        }
    }

    /// Loads and validates a content file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file exceeds the size limit
    /// - YAML parsing fails
    /// - Validation reports errors (or warnings, in strict mode)
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        if metadata.len() > self.options.max_content_size {
            return Err(ConfigError::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit: self.options.max_content_size,
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        self.load_str(&raw, path)
    }

    /// Parses and validates content already read from `path`.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed or empty YAML and a validation
    /// error when validation fails.
    pub fn load_str(&self, raw: &str, path: &Path) -> Result<LoadResult, ConfigError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        let root: serde_yaml::Value =
            serde_yaml::from_str(raw).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;
        if root.is_null() {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "content file is empty".to_string(),
            });
        }

        let content: SiteContent =
            serde_yaml::from_value(root).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: format!("failed to deserialize content: {e}"),
            })?;

        let mut validator = Validator::new();
        let mut result = validator.validate(&content);
        if self.options.strict {
            result.errors.append(&mut result.warnings);
        }
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                errors: result.errors,
            });
        }

        let warnings = result
            .warnings
            .into_iter()
            .map(|issue| LoadWarning {
                message: issue.message,
                location: Some(issue.path),
            })
            .collect();

        Ok(LoadResult { content, warnings })
    }
}

/// Parses an environment variable with a default value.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const MINIMAL: &str = r"
site:
  title: Demo
modules:
  - id: projects
    name: Projects
    summary: Project records
    tags: [core]
    tables: [projects]
";

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn loader() -> ContentLoader {
        ContentLoader::new(LoaderOptions {
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
            strict: false,
        })
    }

    #[test]
    fn test_load_minimal_content() {
        let file = write_temp(MINIMAL);
        let result = loader().load(file.path()).unwrap();
        assert_eq!(result.content.site.title, "Demo");
        assert_eq!(result.content.modules.len(), 1);
        assert_eq!(result.content.nav.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = loader()
            .load(Path::new("/nonexistent/pagespy/site.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn test_size_limit() {
        let file = write_temp(MINIMAL);
        let small = ContentLoader::new(LoaderOptions {
            max_content_size: 8,
            strict: false,
        });
        assert!(matches!(
            small.load(file.path()).unwrap_err(),
            ConfigError::TooLarge { limit: 8, .. }
        ));
    }

    #[test]
    fn test_empty_file_is_parse_error() {
        let file = write_temp("");
        let err = loader().load(file.path()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_malformed_yaml_reports_line() {
        let file = write_temp("site:\n  title: [unclosed\n");
        match loader().load(file.path()).unwrap_err() {
            ConfigError::ParseError { line, .. } => assert!(line.is_some()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bom_is_stripped() {
        let result = loader()
            .load_str(&format!("\u{feff}{MINIMAL}"), Path::new("bom.yaml"))
            .unwrap();
        assert_eq!(result.content.site.title, "Demo");
    }

    #[test]
    fn test_validation_errors_abort() {
        let yaml = "modules:\n  - id: 'has space'\n    name: X\n";
        let err = loader().load_str(yaml, Path::new("bad.yaml")).unwrap_err();
        match err {
            ConfigError::ValidationError { errors, .. } => {
                assert!(errors.iter().any(|e| e.path == "modules[0].id"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_warnings_returned_and_strict_rejects_them() {
        let yaml = "site:\n  title: ''\n";
        let result = loader().load_str(yaml, Path::new("w.yaml")).unwrap();
        assert!(!result.warnings.is_empty());

        let strict = ContentLoader::new(LoaderOptions {
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
            strict: true,
        });
        assert!(strict.load_str(yaml, Path::new("w.yaml")).is_err());
    }

    #[test]
    fn test_builtin_when_no_path() {
        let result = loader().load_or_builtin(None).unwrap();
        assert_eq!(result.content.modules.len(), 10);
        assert!(result.warnings.is_empty());
    }
}
