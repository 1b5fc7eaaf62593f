//! Page event loop
//!
//! A [`Session`] owns the document and the page and turns every dispatched
//! event into structured events and metrics. [`run_event_loop`] feeds it
//! from a channel, one event at a time, until the channel closes or the
//! run is cancelled.

use std::time::Instant;

use chrono::Utc;
use pagespy_core::content::SiteContent;
use pagespy_core::dom::Document;
use pagespy_core::page::{Page, PageEffect, PageEvent, PageOptions};
use pagespy_core::spy::{ActiveChange, Resolution, SpyOptions};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::observability::metrics;
use crate::observability::{Event, EventEmitter, RunSummary};

// ============================================================================
// Session
// ============================================================================

/// A running page plus its run totals.
pub struct Session<'a> {
    document: Document,
    page: Page,
    emitter: &'a EventEmitter,
    summary: RunSummary,
    started: Instant,
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("active", &self.page.active())
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

impl<'a> Session<'a> {
    /// Initializes the page inside `document` and emits the startup events.
    pub fn start(
        mut document: Document,
        content: &SiteContent,
        spy_options: SpyOptions,
        options: PageOptions,
        emitter: &'a EventEmitter,
    ) -> Self {
        let started = Instant::now();
        let (page, init) = Page::init(&mut document, content, spy_options, options);

        emitter.emit(Event::ContentRendered {
            timestamp: Utc::now(),
            modules: init.render.modules,
            phases: init.render.phases,
        });
        if let Some(change) = &init.initial {
            emit_change(emitter, change, None);
        }
        emitter.emit(Event::PageInitialized {
            timestamp: Utc::now(),
            title: content.site.title.clone(),
            sections: init.sections.clone(),
            sidebar: init.sidebar,
        });
        metrics::set_observed_sections(init.sections.len());

        Self {
            document,
            page,
            emitter,
            summary: RunSummary::default(),
            started,
        }
    }

    /// The document the page runs against.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// The page.
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Totals so far.
    #[must_use]
    pub const fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Dispatches one event and records its effects.
    pub fn apply(&mut self, event: PageEvent) -> Vec<PageEffect> {
        if let PageEvent::Visibility(entries) = &event {
            let observer = self.page.spy().observer();
            let skipped = entries
                .iter()
                .filter(|entry| !observer.is_observing(entry.target))
                .count();
            if skipped > 0 {
                warn!(skipped, "ignoring visibility entries for unobserved elements");
            }
        }

        let effects = self.page.dispatch(&mut self.document, event);
        self.summary.events += 1;
        for effect in &effects {
            self.record(effect);
        }
        effects
    }

    fn record(&mut self, effect: &PageEffect) {
        match effect {
            PageEffect::Resolved(resolution) => {
                metrics::record_resolution(resolution);
                self.summary.batches += 1;
                match resolution {
                    Resolution::NoneVisible => self.summary.empty_batches += 1,
                    Resolution::Unchanged { .. } => {}
                    Resolution::Changed { change, ratio } => {
                        self.summary.active_changes += 1;
                        emit_change(self.emitter, change, Some(*ratio));
                    }
                }
            }
            PageEffect::SidebarOpened => {
                metrics::record_sidebar_toggle(true);
                self.emitter.emit(Event::SidebarOpened {
                    timestamp: Utc::now(),
                });
            }
            PageEffect::SidebarClosed => {
                metrics::record_sidebar_toggle(false);
                self.emitter.emit(Event::SidebarClosed {
                    timestamp: Utc::now(),
                });
            }
            PageEffect::FocusMoved { target } => {
                self.emitter.emit(Event::FocusMoved {
                    timestamp: Utc::now(),
                    target: target.clone(),
                });
            }
        }
    }

    /// Ends the run: emits `run_completed` and returns the document with the
    /// final totals.
    #[must_use]
    pub fn finish(mut self, cancelled: bool) -> (Document, RunSummary) {
        self.summary.final_section = self.page.active().map(ToString::to_string);
        self.summary.duration_ms =
            u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.summary.cancelled = cancelled;

        info!(
            events = self.summary.events,
            changes = self.summary.active_changes,
            active = self.summary.final_section.as_deref().unwrap_or("<none>"),
            cancelled,
            "run completed"
        );
        self.emitter.emit(Event::RunCompleted {
            timestamp: Utc::now(),
            summary: self.summary.clone(),
        });
        (self.document, self.summary)
    }
}

fn emit_change(emitter: &EventEmitter, change: &ActiveChange, ratio: Option<f64>) {
    emitter.emit(Event::ActiveSectionChanged {
        timestamp: Utc::now(),
        previous: change.previous.clone(),
        current: change.current.clone(),
        ratio,
    });
}

// ============================================================================
// Loop
// ============================================================================

/// Delivers events from `rx` to `session` until the channel closes.
///
/// Each event is handled to completion before the next is read. Returns
/// `false` if `cancel` fired first; nothing is dispatched after that.
pub async fn run_event_loop(
    session: &mut Session<'_>,
    mut rx: mpsc::UnboundedReceiver<PageEvent>,
    cancel: &CancellationToken,
) -> bool {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("event loop cancelled");
                return false;
            }
            next = rx.recv() => match next {
                Some(event) => {
                    session.apply(event);
                }
                None => return true,
            },
        }
    }
}
