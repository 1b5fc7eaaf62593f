//! Section binding and active-section state.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::dom::{Dom, NodeId, Selector};

/// Class marking the control of the active section.
pub const ACTIVE_CLASS: &str = "is-active";

/// Selector for navigation controls the tracker binds to.
#[must_use]
pub fn nav_link_selector() -> Selector {
    Selector::tag("a").class("nav__link").attribute("data-nav")
}

/// Extracts the section id from an in-page `href`.
///
/// Returns `None` unless `href` is `#` followed by a non-empty id.
#[must_use]
pub fn section_id_from_href(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

// ============================================================================
// Binding
// ============================================================================

/// Mapping from section id to its navigation control and section element.
///
/// Built once, after rendering. Only ids with both a control and a live
/// section element are kept. When two controls point at the same section the
/// later one wins.
#[derive(Debug, Clone, Default)]
pub struct SectionBinding {
    controls: IndexMap<String, NodeId>,
    sections: IndexMap<String, NodeId>,
    all_controls: Vec<NodeId>,
}

impl SectionBinding {
    /// Scans `dom` for navigation controls and resolves their sections.
    #[must_use]
    pub fn bind<D: Dom>(dom: &D) -> Self {
        let all_controls = dom.query_all(&nav_link_selector());

        let mut controls = IndexMap::new();
        for &link in &all_controls {
            let href = dom.attribute(link, "href").unwrap_or_default();
            if let Some(id) = section_id_from_href(&href) {
                controls.insert(id.to_string(), link);
            }
        }

        let mut sections = IndexMap::new();
        controls.retain(|id, _| match dom.element_by_id(id) {
            Some(node) => {
                sections.insert(id.clone(), node);
                true
            }
            None => {
                debug!(section = %id, "navigation target missing; dropping");
                false
            }
        });

        Self {
            controls,
            sections,
            all_controls,
        }
    }

    /// Bound section ids, in navigation order.
    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Bound `(id, section element)` pairs, in navigation order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.sections.iter().map(|(id, &node)| (id.as_str(), node))
    }

    /// Control mapped to `id`.
    #[must_use]
    pub fn control(&self, id: &str) -> Option<NodeId> {
        self.controls.get(id).copied()
    }

    /// Section element for `id`.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<NodeId> {
        self.sections.get(id).copied()
    }

    /// Reverse lookup from section element to id.
    #[must_use]
    pub fn section_id_of(&self, node: NodeId) -> Option<&str> {
        self.sections
            .iter()
            .find(|(_, n)| **n == node)
            .map(|(id, _)| id.as_str())
    }

    /// Every navigation control found, bound or not.
    #[must_use]
    pub fn all_controls(&self) -> &[NodeId] {
        &self.all_controls
    }

    /// Returns `true` if `id` is bound.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.sections.contains_key(id)
    }

    /// Number of bound sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` if no section is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Resolves the section to activate at startup.
///
/// A leading `#` is stripped. Empty or unbound fragments fall back to
/// `default_section`.
#[must_use]
pub fn initial_section<'a>(
    fragment: &'a str,
    binding: &SectionBinding,
    default_section: &'a str,
) -> &'a str {
    let id = fragment.strip_prefix('#').unwrap_or(fragment);
    if !id.is_empty() && binding.contains(id) {
        id
    } else {
        if !id.is_empty() {
            debug!(fragment = %id, fallback = %default_section, "unknown fragment");
        }
        default_section
    }
}

// ============================================================================
// State
// ============================================================================

/// A change of the active section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveChange {
    /// Previously active section, `None` before the first resolution
    pub previous: Option<String>,
    /// Newly active section
    pub current: String,
}

/// Owner of the active section and the only writer of [`ACTIVE_CLASS`].
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    binding: SectionBinding,
    active: Option<String>,
}

impl NavigationState {
    /// Creates state with no active section.
    #[must_use]
    pub const fn new(binding: SectionBinding) -> Self {
        Self {
            binding,
            active: None,
        }
    }

    /// The section binding.
    #[must_use]
    pub const fn binding(&self) -> &SectionBinding {
        &self.binding
    }

    /// The active section id.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Replaces the binding. The active id is kept as is; callers re-mark
    /// controls with [`Self::set_active`].
    pub fn rebind(&mut self, binding: SectionBinding) {
        self.binding = binding;
    }

    /// Activates the section named by `fragment`, or `default_section`.
    pub fn initialize<D: Dom>(
        &mut self,
        dom: &mut D,
        fragment: &str,
        default_section: &str,
    ) -> Option<ActiveChange> {
        let id = initial_section(fragment, &self.binding, default_section).to_string();
        self.set_active(dom, &id)
    }

    /// Makes `id` the active section and re-marks the controls.
    ///
    /// Every control is cleared before the one mapped to `id` is marked, so
    /// at most one control carries [`ACTIVE_CLASS`]. An id with no control
    /// leaves everything cleared. Returns the change, or `None` when `id`
    /// was already active.
    pub fn set_active<D: Dom>(&mut self, dom: &mut D, id: &str) -> Option<ActiveChange> {
        for &control in &self.binding.all_controls {
            dom.remove_class(control, ACTIVE_CLASS);
        }
        if let Some(control) = self.binding.control(id) {
            dom.add_class(control, ACTIVE_CLASS);
        }

        if self.active.as_deref() == Some(id) {
            return None;
        }
        let previous = self.active.replace(id.to_string());
        Some(ActiveChange {
            previous,
            current: id.to_string(),
        })
    }

    /// Controls currently carrying [`ACTIVE_CLASS`].
    #[must_use]
    pub fn marked_controls<D: Dom>(&self, dom: &D) -> Vec<NodeId> {
        self.binding
            .all_controls
            .iter()
            .copied()
            .filter(|&c| dom.has_class(c, ACTIVE_CLASS))
            .collect()
    }
}
