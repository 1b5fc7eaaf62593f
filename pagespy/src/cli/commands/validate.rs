//! `validate` command
//!
//! Loads each content file through the full loading pipeline and reports
//! errors and warnings per file. Any failure makes the command fail after
//! every file has been reported.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ContentLoader, LoaderOptions};
use crate::error::{ConfigError, PageSpyError, ValidationIssue};

/// Validation outcome for one file.
#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    valid: bool,
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

/// Totals across all files.
#[derive(Debug, Serialize)]
struct Summary {
    files: usize,
    valid: usize,
    invalid: usize,
}

#[derive(Debug, Serialize)]
struct Report {
    files: Vec<FileReport>,
    summary: Summary,
}

/// Validate content files.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationFailed`] if any file is invalid.
pub fn run(args: &ValidateArgs) -> Result<(), PageSpyError> {
    let loader = ContentLoader::new(LoaderOptions {
        strict: args.strict,
        ..LoaderOptions::default()
    });

    let files: Vec<FileReport> = args
        .files
        .iter()
        .map(|path| check(&loader, path))
        .collect();
    let invalid = files.iter().filter(|f| !f.valid).count();
    let report = Report {
        summary: Summary {
            files: files.len(),
            valid: files.len() - invalid,
            invalid,
        },
        files,
    };

    match args.format {
        OutputFormat::Human => print_human(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if invalid > 0 {
        return Err(ConfigError::ValidationFailed { count: invalid }.into());
    }
    Ok(())
}

fn check(loader: &ContentLoader, path: &Path) -> FileReport {
    tracing::info!(file = %path.display(), "validating content");
    let display = path.display().to_string();
    match loader.load(path) {
        Ok(result) => FileReport {
            path: display,
            valid: true,
            errors: Vec::new(),
            warnings: result
                .warnings
                .into_iter()
                .map(|w| ValidationIssue::warning(w.location.unwrap_or_default(), w.message))
                .collect(),
        },
        Err(ConfigError::ValidationError { errors, .. }) => FileReport {
            path: display,
            valid: false,
            errors,
            warnings: Vec::new(),
        },
        Err(other) => FileReport {
            errors: vec![ValidationIssue::error(display.clone(), other.to_string())],
            path: display,
            valid: false,
            warnings: Vec::new(),
        },
    }
}

fn print_human(report: &Report) {
    for file in &report.files {
        let mark = if file.valid { "ok" } else { "FAILED" };
        println!("{}: {mark}", file.path);
        for issue in file.errors.iter().chain(&file.warnings) {
            println!("  {issue}");
        }
    }
    println!(
        "{} file(s): {} valid, {} invalid",
        report.summary.files, report.summary.valid, report.summary.invalid
    );
}
