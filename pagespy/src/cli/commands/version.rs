//! Version information display
//!
//! Prints version metadata in human or JSON format.

use crate::cli::args::{OutputFormat, VersionArgs};

/// Print version information.
pub fn run(args: &VersionArgs) {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");
    let core = pagespy_core::VERSION;

    match args.format {
        OutputFormat::Human => {
            println!("{name} {version} (core {core})");
        }
        OutputFormat::Json => {
            println!(r#"{{"name":"{name}","version":"{version}","core":"{core}"}}"#);
        }
    }
}
