//! Active-section tracking.
//!
//! [`ScrollSpy`] binds navigation controls to rendered sections, observes
//! those sections and resolves every visibility batch to a single active
//! section.
//!
//! # Architecture
//!
//! - [`geometry`]: viewport and section boxes, intersection ratios
//! - [`observer`]: threshold-crossing observer and winner selection
//! - [`navigation`]: section binding and the active-section state

pub mod geometry;
pub mod navigation;
pub mod observer;

use tracing::{debug, info};

use crate::content::{DEFAULT_SECTION, SiteContent};
use crate::dom::Dom;
use crate::error::ThresholdError;

pub use geometry::{Layout, LayoutSource, SectionBox, Viewport, intersection};
pub use navigation::{
    ACTIVE_CLASS, ActiveChange, NavigationState, SectionBinding, initial_section,
    nav_link_selector, section_id_from_href,
};
pub use observer::{Thresholds, VisibilityEntry, VisibilityObserver, select_most_visible};

/// Tracker settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SpyOptions {
    /// Observer thresholds
    pub thresholds: Thresholds,
    /// Section activated when the fragment names nothing bound
    pub default_section: String,
}

impl SpyOptions {
    /// Builds options from content settings.
    ///
    /// # Errors
    ///
    /// Returns [`ThresholdError`] if the configured thresholds are invalid.
    pub fn from_content(content: &SiteContent) -> Result<Self, ThresholdError> {
        Ok(Self {
            thresholds: Thresholds::new(content.tracker.thresholds.clone())?,
            default_section: content.site.default_section.clone(),
        })
    }
}

impl Default for SpyOptions {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            default_section: DEFAULT_SECTION.to_string(),
        }
    }
}

/// Result of resolving one visibility batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Nothing in the batch intersected; the active section is unchanged.
    NoneVisible,
    /// The winner was already active.
    Unchanged {
        /// Winning section
        section: String,
        /// Winning ratio
        ratio: f64,
    },
    /// The winner became active.
    Changed {
        /// The change
        change: ActiveChange,
        /// Winning ratio
        ratio: f64,
    },
}

impl Resolution {
    /// Returns the change, if any.
    #[must_use]
    pub const fn change(&self) -> Option<&ActiveChange> {
        match self {
            Self::Changed { change, .. } => Some(change),
            _ => None,
        }
    }
}

/// The active-section tracker.
#[derive(Debug, Clone)]
pub struct ScrollSpy {
    observer: VisibilityObserver,
    navigation: NavigationState,
    default_section: String,
}

impl ScrollSpy {
    /// Binds to the rendered sections in `dom`, starts observing them and
    /// activates the section named by `fragment`.
    ///
    /// Returns the tracker and the initial activation.
    pub fn attach<D: Dom>(
        dom: &mut D,
        options: SpyOptions,
        fragment: &str,
    ) -> (Self, Option<ActiveChange>) {
        let binding = SectionBinding::bind(dom);
        let mut observer = VisibilityObserver::new(options.thresholds);
        for (_, node) in binding.sections() {
            observer.observe(node);
        }

        let mut navigation = NavigationState::new(binding);
        let initial = navigation.initialize(dom, fragment, &options.default_section);
        info!(
            sections = observer.len(),
            active = navigation.active().unwrap_or_default(),
            "scroll spy attached"
        );

        (
            Self {
                observer,
                navigation,
                default_section: options.default_section,
            },
            initial,
        )
    }

    /// Rebinds to the sections currently in `dom` after its markup was
    /// replaced.
    ///
    /// Old section nodes are dropped from the observer and every bound
    /// section is observed from scratch, so the next geometry evaluation
    /// reports all of them. The active section is kept if it is still
    /// bound; otherwise the default section takes over.
    pub fn rebind<D: Dom>(&mut self, dom: &mut D) -> Option<ActiveChange> {
        let binding = SectionBinding::bind(dom);
        let mut observer = VisibilityObserver::new(self.observer.thresholds().clone());
        for (_, node) in binding.sections() {
            observer.observe(node);
        }
        self.observer = observer;

        let keep = self
            .navigation
            .active()
            .filter(|id| binding.contains(id))
            .map(ToString::to_string);
        self.navigation.rebind(binding);
        let id = keep.unwrap_or_else(|| self.default_section.clone());
        let change = self.navigation.set_active(dom, &id);
        debug!(
            sections = self.observer.len(),
            active = %id,
            "scroll spy rebound"
        );
        change
    }

    /// The active section id.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.navigation.active()
    }

    /// Navigation state.
    #[must_use]
    pub const fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    /// The visibility observer.
    #[must_use]
    pub const fn observer(&self) -> &VisibilityObserver {
        &self.observer
    }

    /// Observed section ids, in navigation order.
    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.navigation
            .binding()
            .sections()
            .filter(|(_, node)| self.observer.is_observing(*node))
            .map(|(id, _)| id)
    }

    /// Resolves a visibility batch.
    ///
    /// Entries for targets that are not observed are ignored. A batch with
    /// no intersecting entry leaves the active section as it was.
    pub fn handle_batch<D: Dom>(
        &mut self,
        dom: &mut D,
        entries: &[VisibilityEntry],
    ) -> Resolution {
        let observed: Vec<VisibilityEntry> = entries
            .iter()
            .filter(|e| self.observer.is_observing(e.target))
            .copied()
            .collect();

        let Some(winner) = select_most_visible(&observed) else {
            debug!(entries = entries.len(), "no intersecting section in batch");
            return Resolution::NoneVisible;
        };
        let ratio = winner.effective_ratio();
        let Some(section) = self
            .navigation
            .binding()
            .section_id_of(winner.target)
            .map(ToString::to_string)
        else {
            return Resolution::NoneVisible;
        };

        match self.navigation.set_active(dom, &section) {
            Some(change) => {
                debug!(
                    from = change.previous.as_deref().unwrap_or_default(),
                    to = %change.current,
                    ratio,
                    "active section changed"
                );
                Resolution::Changed { change, ratio }
            }
            None => Resolution::Unchanged { section, ratio },
        }
    }

    /// Evaluates the observer against new geometry and resolves any
    /// resulting batch. Returns `None` when no threshold was crossed.
    pub fn on_viewport_change<D, L>(
        &mut self,
        dom: &mut D,
        viewport: &Viewport,
        layout: &L,
    ) -> Option<Resolution>
    where
        D: Dom,
        L: LayoutSource + ?Sized,
    {
        let records = self.observer.take_records(viewport, layout);
        if records.is_empty() {
            return None;
        }
        Some(self.handle_batch(dom, &records))
    }

    /// Stops observing every section. The active section is kept.
    pub fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}
