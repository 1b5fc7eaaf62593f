//! Content file loading.
//!
//! Content types and their validation live in `pagespy_core::content`; this
//! module reads them from disk.

pub mod loader;

pub use loader::{ContentLoader, LoadResult, LoadWarning, LoaderOptions};
