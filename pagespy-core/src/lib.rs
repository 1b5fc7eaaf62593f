//! `PageSpy` Core: content model, renderer and active-section tracker
//!
//! This crate holds everything the page does: the site content and its
//! validation, markup rendering into mount points, the in-memory document
//! the page runs against, the scroll spy and the sidebar. `pagespy` (the
//! CLI) drives it from content files and recorded traces.

pub mod content;
pub mod dom;
pub mod error;
pub mod page;
pub mod render;
pub mod sidebar;
pub mod spy;

/// Version of the core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
