//! Shared integration-test harness for running the `pagespy` binary as a
//! child process.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;

/// Runs the `pagespy` binary.
pub struct PageSpyProcess;

impl PageSpyProcess {
    /// Runs `pagespy` with `args` to completion and captures its output.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        Self::command(args)
            .output()
            .expect("failed to run pagespy")
    }

    /// Builds a `pagespy` command with the environment cleared of
    /// `PAGESPY_*` overrides.
    #[must_use]
    pub fn command(args: &[&str]) -> Command {
        let bin = env!("CARGO_BIN_EXE_pagespy");
        let mut cmd = Command::new(bin);
        cmd.args(args)
            .env_remove("PAGESPY_CONTENT")
            .env_remove("PAGESPY_LOG_LEVEL")
            .env_remove("PAGESPY_MAX_CONTENT_SIZE")
            .env("PAGESPY_COLOR", "never")
            .stdin(Stdio::null());
        cmd
    }

    /// Returns the path to a test fixture.
    #[must_use]
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    /// Parses newline-delimited JSON events.
    #[allow(clippy::missing_panics_doc)]
    pub fn parse_events(text: &str) -> Vec<Value> {
        text.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l).unwrap_or_else(|e| panic!("invalid JSONL: {e}\nline: {l}"))
            })
            .collect()
    }

    /// Reads a JSONL event file.
    #[allow(clippy::missing_panics_doc)]
    pub fn read_events(path: &Path) -> Vec<Value> {
        Self::parse_events(&std::fs::read_to_string(path).expect("events file missing"))
    }
}
