//! `render` command
//!
//! Renders the page shell, injects content, stamps the footer year and marks
//! the initially active section, then writes the resulting HTML.

use pagespy_core::dom::Document;
use pagespy_core::page::{Page, PageOptions};
use pagespy_core::render::render_shell;
use pagespy_core::spy::{SpyOptions, Viewport};

use super::{current_year, load_content, write_output};
use crate::cli::args::RenderArgs;
use crate::error::PageSpyError;

/// Render the page.
///
/// # Errors
///
/// Returns an error if the content cannot be loaded, its tracker settings
/// are invalid, or the output cannot be written.
pub fn run(args: &RenderArgs) -> Result<(), PageSpyError> {
    let loaded = load_content(args.content.as_deref())?;
    let content = &loaded.content;
    let spy_options = SpyOptions::from_content(content)?;

    let mut document = Document::parse(&render_shell(content));
    let (page, init) = Page::init(
        &mut document,
        content,
        spy_options,
        PageOptions {
            fragment: args.fragment.clone(),
            year: args.year.unwrap_or_else(current_year),
            viewport: Viewport::default(),
        },
    );
    tracing::info!(
        active = page.active().unwrap_or("<none>"),
        sections = init.sections.len(),
        "page rendered"
    );

    write_output(args.output.as_deref(), &document.to_html())
}
