//! Trace replay runtime
//!
//! Renders the page, resolves a [`Trace`] against it, and replays the
//! resulting events through a single-threaded event loop. A producer task
//! feeds the channel (optionally paced); the loop dispatches each event to
//! completion before reading the next.

pub mod event_loop;
pub mod trace;

use std::time::Duration;

use pagespy_core::content::SiteContent;
use pagespy_core::dom::Document;
use pagespy_core::page::{PageEvent, PageOptions};
use pagespy_core::render::render_shell;
use pagespy_core::spy::SpyOptions;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub use event_loop::{Session, run_event_loop};
pub use trace::{Trace, TraceEntry, TraceEvent};

use crate::error::PageSpyError;
use crate::observability::{EventEmitter, RunSummary};

/// Replay settings.
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    /// URL fragment at load time
    pub fragment: String,
    /// Footer year
    pub year: i32,
    /// Pause before each event
    pub delay: Duration,
}

/// Outcome of a replay.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    /// Run totals
    pub summary: RunSummary,
    /// The final document
    pub html: String,
}

/// Replays `trace` against `content`.
///
/// Cancellation is not an error here; the report's summary carries
/// `cancelled: true`.
///
/// # Errors
///
/// Returns an error if the tracker settings in `content` are invalid or the
/// trace references elements the rendered page does not have.
pub async fn simulate(
    content: &SiteContent,
    trace: &Trace,
    options: SimulationOptions,
    emitter: &EventEmitter,
    cancel: CancellationToken,
) -> Result<SimulationReport, PageSpyError> {
    let spy_options = SpyOptions::from_content(content)?;
    let document = Document::parse(&render_shell(content));
    let mut session = Session::start(
        document,
        content,
        spy_options,
        PageOptions {
            fragment: options.fragment,
            year: options.year,
            viewport: trace.viewport,
        },
        emitter,
    );

    let events = trace.resolve(session.document())?;
    info!(events = events.len(), "replaying trace");

    let (tx, rx) = mpsc::unbounded_channel();
    let producer = tokio::spawn(feed(events, tx, options.delay));

    let completed = run_event_loop(&mut session, rx, &cancel).await;
    if !completed {
        producer.abort();
    }

    let (document, summary) = session.finish(!completed);
    Ok(SimulationReport {
        summary,
        html: document.to_html(),
    })
}

/// Sends `events` in order, pausing `delay` before each.
async fn feed(events: Vec<PageEvent>, tx: mpsc::UnboundedSender<PageEvent>, delay: Duration) {
    for event in events {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if tx.send(event).is_err() {
            debug!("event loop gone, stopping producer");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pagespy_core::content::builtin;

    use super::*;

    const SCROLL_TRACE: &str = r"
viewport: { height: 800 }
layout:
  overview: { top: 0, height: 800 }
  modules: { top: 800, height: 1600 }
  roadmap: { top: 2400, height: 900 }
events:
  - type: scroll
    scroll_top: 1000
  - type: scroll
    scroll_top: 2500
";

    fn options() -> SimulationOptions {
        SimulationOptions {
            fragment: String::new(),
            year: 2026,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_simulate_scroll_trace() {
        let trace = Trace::parse(SCROLL_TRACE, Path::new("scroll.yaml")).unwrap();
        let emitter = EventEmitter::noop();
        let report = simulate(
            &builtin::site(),
            &trace,
            options(),
            &emitter,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(report.summary.events, 3);
        assert_eq!(report.summary.final_section.as_deref(), Some("roadmap"));
        assert!(!report.summary.cancelled);
        assert!(report.html.contains("2026"));
    }

    #[tokio::test]
    async fn test_simulate_with_delay() {
        let trace = Trace {
            events: vec![TraceEvent::MenuClick, TraceEvent::BackdropClick],
            ..Trace::default()
        };
        let emitter = EventEmitter::noop();
        let report = simulate(
            &builtin::site(),
            &trace,
            SimulationOptions {
                delay: Duration::from_millis(1),
                ..options()
            },
            &emitter,
            CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(report.summary.events, 2);
        assert_eq!(report.summary.final_section.as_deref(), Some("overview"));
    }

    #[tokio::test]
    async fn test_simulate_cancelled() {
        let trace = Trace::parse(SCROLL_TRACE, Path::new("scroll.yaml")).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let emitter = EventEmitter::noop();
        let report = simulate(&builtin::site(), &trace, options(), &emitter, cancel)
            .await
            .unwrap();
        assert!(report.summary.cancelled);
        assert_eq!(report.summary.events, 0);
    }

    #[test]
    fn test_simulate_rejects_bad_thresholds() {
        let mut content = builtin::site();
        content.tracker.thresholds = vec![0.5];
        let emitter = EventEmitter::noop();
        let err = tokio_test::block_on(simulate(
            &content,
            &Trace::default(),
            options(),
            &emitter,
            CancellationToken::new(),
        ))
        .unwrap_err();
        assert!(matches!(err, PageSpyError::Threshold(_)));
    }
}
