//! `simulate` command
//!
//! Replays a browsing trace against the rendered page and streams
//! structured events as JSONL.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::{current_year, load_content};
use crate::cli::args::SimulateArgs;
use crate::error::PageSpyError;
use crate::observability::{EventEmitter, init_metrics};
use crate::runtime::{SimulationOptions, Trace, simulate};

/// Replay a trace.
///
/// # Errors
///
/// Returns an error if the content or trace cannot be loaded, the trace
/// names unknown sections, an output file cannot be written, or the run was
/// interrupted.
pub async fn run(args: &SimulateArgs, cancel: CancellationToken) -> Result<(), PageSpyError> {
    let loaded = load_content(args.content.as_deref())?;
    let trace = Trace::load(&args.trace)?;
    tracing::info!(
        file = %args.trace.display(),
        events = trace.events.len(),
        "trace loaded"
    );

    let metrics = if args.metrics {
        Some(init_metrics()?)
    } else {
        None
    };
    let emitter = match &args.events {
        Some(path) => EventEmitter::from_file(path)?,
        None => EventEmitter::stdout(),
    };

    let options = SimulationOptions {
        fragment: args
            .fragment
            .clone()
            .unwrap_or_else(|| trace.fragment.clone()),
        year: args.year.or(trace.year).unwrap_or_else(current_year),
        delay: Duration::from_millis(args.delay_ms),
    };
    let report = simulate(&loaded.content, &trace, options, &emitter, cancel).await?;

    if let Some(path) = &args.output {
        std::fs::write(path, &report.html)?;
        tracing::info!(file = %path.display(), "final page written");
    }
    if let Some(handle) = metrics {
        print!("{}", handle.render());
    }

    if report.summary.cancelled {
        return Err(PageSpyError::Interrupted);
    }
    Ok(())
}
