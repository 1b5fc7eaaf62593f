//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod content;
pub mod render;
pub mod simulate;
pub mod validate;
pub mod version;

use std::path::Path;

use chrono::Datelike;
use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands};
use crate::config::{ContentLoader, LoadResult};
use crate::error::PageSpyError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), PageSpyError> {
    match cli.command {
        Commands::Render(args) => render::run(&args),
        Commands::Validate(args) => validate::run(&args),
        Commands::Simulate(args) => simulate::run(&args, cancel).await,
        Commands::Content(args) => content::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Loads content from `path` (or the built-in content) and logs warnings.
fn load_content(path: Option<&Path>) -> Result<LoadResult, PageSpyError> {
    let result = ContentLoader::with_defaults().load_or_builtin(path)?;
    match path {
        Some(path) => tracing::info!(file = %path.display(), "content loaded"),
        None => tracing::debug!("using built-in content"),
    }
    for warning in &result.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
    Ok(result)
}

/// Writes `text` to `path`, or to stdout when `path` is `None`.
fn write_output(path: Option<&Path>, text: &str) -> Result<(), PageSpyError> {
    match path {
        Some(path) => {
            std::fs::write(path, text)?;
            tracing::info!(file = %path.display(), bytes = text.len(), "output written");
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// The current calendar year in local time.
fn current_year() -> i32 {
    chrono::Local::now().year()
}
