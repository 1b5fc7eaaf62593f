//! `content` command
//!
//! Prints the effective site content. With no `--content` this dumps the
//! built-in content, which makes a starting point for a custom file.

use super::{load_content, write_output};
use crate::cli::args::{ContentArgs, ContentFormat};
use crate::error::PageSpyError;

/// Print the content.
///
/// # Errors
///
/// Returns an error if the content cannot be loaded or serialized.
pub fn run(args: &ContentArgs) -> Result<(), PageSpyError> {
    let loaded = load_content(args.content.as_deref())?;
    let text = match args.format {
        ContentFormat::Yaml => serde_yaml::to_string(&loaded.content)?,
        ContentFormat::Json => serde_json::to_string_pretty(&loaded.content)?,
    };
    write_output(None, text.trim_end())
}
