//! Structured event stream for `PageSpy`.
//!
//! Discrete, typed events emitted while a page runs. Events are serialized
//! as newline-delimited JSON (JSONL) and carry a monotonically increasing
//! sequence number for ordering.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during a page run.
///
/// Each variant is tagged with `"type"` when serialized so consumers can
/// dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Startup finished.
    PageInitialized {
        /// When startup finished.
        timestamp: DateTime<Utc>,
        /// Site title.
        title: String,
        /// Observed section ids.
        sections: Vec<String>,
        /// Whether the sidebar controller is active.
        sidebar: bool,
    },

    /// Content was injected into the mount points.
    ContentRendered {
        /// When rendering finished.
        timestamp: DateTime<Utc>,
        /// Module cards written, absent when the grid mount is missing.
        modules: Option<usize>,
        /// Roadmap phases written, absent when the timeline mount is missing.
        phases: Option<usize>,
    },

    /// The active section changed.
    ActiveSectionChanged {
        /// When the change happened.
        timestamp: DateTime<Utc>,
        /// Previously active section.
        previous: Option<String>,
        /// Newly active section.
        current: String,
        /// Winning visibility ratio, absent for the initial activation.
        ratio: Option<f64>,
    },

    /// The sidebar opened.
    SidebarOpened {
        /// When it opened.
        timestamp: DateTime<Utc>,
    },

    /// The sidebar closed.
    SidebarClosed {
        /// When it closed.
        timestamp: DateTime<Utc>,
    },

    /// Keyboard focus moved.
    FocusMoved {
        /// When focus moved.
        timestamp: DateTime<Utc>,
        /// Id of the focused element.
        target: String,
    },

    /// A trace replay finished.
    RunCompleted {
        /// When the run finished.
        timestamp: DateTime<Utc>,
        /// Run totals.
        summary: RunSummary,
    },
}

/// Totals for one trace replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Page events dispatched.
    pub events: usize,
    /// Visibility batches resolved.
    pub batches: u64,
    /// Batches with no intersecting section.
    pub empty_batches: u64,
    /// Active-section changes after startup.
    pub active_changes: u64,
    /// Active section at the end of the run.
    pub final_section: Option<String>,
    /// Wall-clock run time in milliseconds.
    pub duration_ms: u64,
    /// Whether the run was cancelled before the trace ended.
    pub cancelled: bool,
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) increments the sequence counter,
/// serializes the event as a single JSON line and flushes. Serialization or
/// I/O failures are dropped.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Creates an emitter that silently discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock()
            && let Ok(line) = serde_json::to_string(&envelope)
        {
            let _ = writeln!(w, "{line}");
            let _ = w.flush();
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use super::*;

    /// In-memory writer for capturing emitter output in tests.
    #[derive(Clone)]
    struct TestWriter(Arc<StdMutex<Vec<u8>>>);

    impl TestWriter {
        fn new() -> Self {
            Self(Arc::new(StdMutex::new(Vec::new())))
        }

        fn contents(&self) -> String {
            let buf = self.0.lock().unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn event_serializes_with_snake_case_tag() {
        let event = Event::ActiveSectionChanged {
            timestamp: fixed_time(),
            previous: Some("overview".to_owned()),
            current: "modules".to_owned(),
            ratio: Some(0.6),
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        assert_eq!(parsed["type"], "active_section_changed");
        assert_eq!(parsed["previous"], "overview");
        assert_eq!(parsed["current"], "modules");
    }

    #[test]
    fn emitter_increments_sequence() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(Event::SidebarOpened {
            timestamp: fixed_time(),
        });
        emitter.emit(Event::SidebarClosed {
            timestamp: Utc::now(),
        });
        assert_eq!(emitter.event_count(), 2);

        let lines: Vec<serde_json::Value> = tw
            .contents()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines[0]["sequence"], 0);
        assert_eq!(lines[0]["type"], "sidebar_opened");
        assert_eq!(lines[1]["sequence"], 1);
        assert_eq!(lines[1]["type"], "sidebar_closed");
    }

    #[test]
    fn run_summary_nests_under_completed_event() {
        let tw = TestWriter::new();
        let emitter = EventEmitter::new(Box::new(tw.clone()));
        emitter.emit(Event::RunCompleted {
            timestamp: fixed_time(),
            summary: RunSummary {
                events: 4,
                batches: 3,
                empty_batches: 1,
                active_changes: 2,
                final_section: Some("roadmap".to_owned()),
                duration_ms: 0,
                cancelled: false,
            },
        });
        let parsed: serde_json::Value = serde_json::from_str(tw.contents().trim()).unwrap();
        assert_eq!(parsed["type"], "run_completed");
        assert_eq!(parsed["summary"]["active_changes"], 2);
        assert_eq!(parsed["summary"]["final_section"], "roadmap");
    }

    #[test]
    fn noop_emitter_counts_but_discards() {
        let emitter = EventEmitter::noop();
        emitter.emit(Event::FocusMoved {
            timestamp: fixed_time(),
            target: "main".to_owned(),
        });
        assert_eq!(emitter.event_count(), 1);
    }
}
