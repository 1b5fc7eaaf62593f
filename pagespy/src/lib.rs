//! `PageSpy` - single-page site renderer and scroll-spy simulator
//!
//! This library backs the `pagespy` binary: content loading, the CLI,
//! trace replay and the observability stack around `pagespy-core`.

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod runtime;
