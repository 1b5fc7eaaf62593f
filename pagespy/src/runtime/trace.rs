//! Browsing traces
//!
//! A trace is a YAML file describing one browsing session: the fragment the
//! page was opened with, the viewport, where each section sits on the page,
//! and an ordered list of things the user did. Section references are
//! resolved against the rendered document before replay.
//!
//! ```yaml
//! fragment: "#modules"
//! viewport: { scroll_top: 0, height: 800 }
//! layout:
//!   overview: { top: 0, height: 900 }
//!   modules: { top: 900, height: 2400 }
//! events:
//!   - type: scroll
//!     scroll_top: 1200
//!   - type: menu_click
//!   - type: nav_click
//!     section: roadmap
//! ```

use std::path::Path;

use indexmap::IndexMap;
use pagespy_core::dom::{Dom, NodeId, Selector};
use pagespy_core::page::PageEvent;
use pagespy_core::spy::{Layout, SectionBox, Viewport, VisibilityEntry, section_id_from_href};
use serde::{Deserialize, Serialize};

use crate::error::TraceError;

// ============================================================================
// Trace Model
// ============================================================================

/// A recorded browsing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// URL fragment at load time
    #[serde(default)]
    pub fragment: String,

    /// Initial viewport
    #[serde(default)]
    pub viewport: Viewport,

    /// Footer year override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    /// Initial section boxes keyed by element id
    #[serde(default)]
    pub layout: IndexMap<String, SectionBox>,

    /// What happened, in order
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

/// One step of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// The page scrolled.
    Scroll {
        /// New scroll offset
        scroll_top: f64,
    },
    /// The viewport height changed.
    Resize {
        /// New viewport height
        height: f64,
    },
    /// Sections moved; replaces the whole layout.
    Layout {
        /// Section boxes keyed by element id
        sections: IndexMap<String, SectionBox>,
    },
    /// A visibility batch, delivered as-is.
    Visibility {
        /// Batch entries
        entries: Vec<TraceEntry>,
    },
    /// The menu button was clicked.
    MenuClick,
    /// The backdrop was clicked.
    BackdropClick,
    /// The navigation link for `section` was clicked.
    NavClick {
        /// Section the link points at
        section: String,
    },
    /// A key was pressed.
    KeyDown {
        /// Key name
        key: String,
    },
    /// The URL fragment changed.
    HashChange {
        /// New fragment
        fragment: String,
    },
}

/// One entry of a recorded visibility batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Element id of the section
    pub section: String,
    /// Whether the section intersects the viewport
    #[serde(default = "default_intersecting")]
    pub intersecting: bool,
    /// Visible fraction
    #[serde(default)]
    pub ratio: f64,
}

const fn default_intersecting() -> bool {
    true
}

// ============================================================================
// Loading
// ============================================================================

impl Trace {
    /// Reads a trace file.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::MissingFile`] if the file cannot be read and
    /// [`TraceError::ParseError`] if it is not a valid trace.
    pub fn load(path: &Path) -> Result<Self, TraceError> {
        let raw = std::fs::read_to_string(path).map_err(|_| TraceError::MissingFile {
            path: path.to_path_buf(),
        })?;
        Self::parse(&raw, path)
    }

    /// Parses trace YAML read from `path`.
    ///
    /// An empty document is an empty trace.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::ParseError`] on malformed YAML or unknown event
    /// types.
    pub fn parse(raw: &str, path: &Path) -> Result<Self, TraceError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|e| TraceError::ParseError {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })
    }

    /// Resolves the trace against a rendered document.
    ///
    /// A non-empty initial layout becomes a leading relayout event so the
    /// first evaluation happens inside the replay.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::UnknownSection`] for the first reference to an
    /// element id the document does not contain.
    pub fn resolve<D: Dom>(&self, dom: &D) -> Result<Vec<PageEvent>, TraceError> {
        let mut events = Vec::with_capacity(self.events.len() + 1);
        if !self.layout.is_empty() {
            events.push(PageEvent::Relayout(resolve_layout(
                dom,
                &self.layout,
                "layout",
            )?));
        }
        for (index, event) in self.events.iter().enumerate() {
            let location = format!("events[{index}]");
            events.push(resolve_event(dom, event, &location)?);
        }
        Ok(events)
    }
}

// ============================================================================
// Resolution
// ============================================================================

fn resolve_event<D: Dom>(
    dom: &D,
    event: &TraceEvent,
    location: &str,
) -> Result<PageEvent, TraceError> {
    Ok(match event {
        TraceEvent::Scroll { scroll_top } => PageEvent::Scroll {
            scroll_top: *scroll_top,
        },
        TraceEvent::Resize { height } => PageEvent::Resize { height: *height },
        TraceEvent::Layout { sections } => {
            PageEvent::Relayout(resolve_layout(dom, sections, location)?)
        }
        TraceEvent::Visibility { entries } => {
            let batch = entries
                .iter()
                .map(|entry| {
                    lookup(dom, &entry.section, location).map(|node| {
                        VisibilityEntry::new(node, entry.intersecting, entry.ratio)
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            PageEvent::Visibility(batch)
        }
        TraceEvent::MenuClick => PageEvent::MenuClick,
        TraceEvent::BackdropClick => PageEvent::BackdropClick,
        TraceEvent::NavClick { section } => {
            let control =
                nav_control(dom, section).ok_or_else(|| TraceError::UnknownSection {
                    location: location.to_string(),
                    section: section.clone(),
                })?;
            PageEvent::Click(control)
        }
        TraceEvent::KeyDown { key } => PageEvent::KeyDown { key: key.clone() },
        TraceEvent::HashChange { fragment } => PageEvent::HashChange {
            fragment: fragment.clone(),
        },
    })
}

fn resolve_layout<D: Dom>(
    dom: &D,
    sections: &IndexMap<String, SectionBox>,
    location: &str,
) -> Result<Layout, TraceError> {
    let mut layout = Layout::new();
    for (id, section) in sections {
        layout.insert(lookup(dom, id, location)?, *section);
    }
    Ok(layout)
}

fn lookup<D: Dom>(dom: &D, id: &str, location: &str) -> Result<NodeId, TraceError> {
    dom.element_by_id(id)
        .ok_or_else(|| TraceError::UnknownSection {
            location: location.to_string(),
            section: id.to_string(),
        })
}

/// First `[data-nav]` element whose `href` points at `section`.
fn nav_control<D: Dom>(dom: &D, section: &str) -> Option<NodeId> {
    dom.query_all(&Selector::any().attribute("data-nav"))
        .into_iter()
        .find(|&node| {
            dom.attribute(node, "href")
                .as_deref()
                .and_then(section_id_from_href)
                == Some(section)
        })
}
