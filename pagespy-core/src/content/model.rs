//! Content model types.
//!
//! These types are deserialized from YAML content files or built from the
//! compiled-in defaults in [`super::builtin`]. They carry data only.

use serde::{Deserialize, Serialize};

/// Section identifier the tracker falls back to when the URL fragment does
/// not name a known section.
pub const DEFAULT_SECTION: &str = "overview";

/// Default visibility thresholds: low, medium and half visibility.
pub const DEFAULT_THRESHOLDS: [f64; 3] = [0.25, 0.35, 0.5];

// ============================================================================
// Site Content
// ============================================================================

/// Everything the page renders and tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteContent {
    /// Page title and tracker defaults
    #[serde(default)]
    pub site: SiteMeta,

    /// Top-level navigation entries, in display order
    #[serde(default = "default_nav")]
    pub nav: Vec<NavEntry>,

    /// Product modules, in display order
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,

    /// Release roadmap phases, in display order
    #[serde(default)]
    pub roadmap: Vec<RoadmapPhase>,

    /// Visibility tracking settings
    #[serde(default)]
    pub tracker: TrackerSettings,
}

impl SiteContent {
    /// Looks up a module by its identifier.
    #[must_use]
    pub fn module(&self, id: &str) -> Option<&ModuleRecord> {
        self.modules.iter().find(|m| m.id == id)
    }
}

/// Page-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteMeta {
    /// Document title
    pub title: String,

    /// One-line description shown under the title
    #[serde(default)]
    pub tagline: String,

    /// Section activated when the URL fragment is empty or unknown
    #[serde(default = "default_section")]
    pub default_section: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Modules & Roadmap".to_string(),
            tagline: String::new(),
            default_section: default_section(),
        }
    }
}

/// A top-level navigation entry and the page section it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    /// Section identifier (URL fragment without `#`)
    pub id: String,

    /// Link text
    pub label: String,
}

impl NavEntry {
    /// Creates a navigation entry.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

// ============================================================================
// Records
// ============================================================================

/// One product module. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Unique, URL-fragment-safe identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// One-paragraph description
    #[serde(default)]
    pub summary: String,

    /// Short topic tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Backing database tables
    #[serde(default)]
    pub tables: Vec<String>,
}

impl ModuleRecord {
    /// DOM identifier of the block rendered for this module.
    #[must_use]
    pub fn dom_id(&self) -> String {
        format!("module-{}", self.id)
    }
}

/// One roadmap phase. Addressed only by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    /// Phase title (e.g., "Phase 1 (Core)")
    pub phase: String,

    /// Short badge text
    #[serde(default)]
    pub badge: String,

    /// Deliverables in this phase
    #[serde(default)]
    pub items: Vec<String>,
}

// ============================================================================
// Tracker Settings
// ============================================================================

/// Visibility tracking settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSettings {
    /// Visibility-ratio crossings that trigger re-evaluation
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<f64>,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            thresholds: default_thresholds(),
        }
    }
}

fn default_section() -> String {
    DEFAULT_SECTION.to_string()
}

fn default_thresholds() -> Vec<f64> {
    DEFAULT_THRESHOLDS.to_vec()
}

/// Navigation entries used when a content file does not declare any.
#[must_use]
pub fn default_nav() -> Vec<NavEntry> {
    vec![
        NavEntry::new("overview", "Overview"),
        NavEntry::new("modules", "Modules"),
        NavEntry::new("roadmap", "Roadmap"),
    ]
}
