//! Viewport geometry.
//!
//! Vertical-only model: the page scrolls, sections are stacked boxes, and
//! visibility is the fraction of a box's height inside the viewport.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dom::NodeId;

/// The visible window onto the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Distance scrolled from the top of the page, in CSS pixels
    #[serde(default)]
    pub scroll_top: f64,
    /// Viewport height, in CSS pixels
    pub height: f64,
}

impl Viewport {
    /// Creates a viewport.
    #[must_use]
    pub const fn new(scroll_top: f64, height: f64) -> Self {
        Self { scroll_top, height }
    }

    /// Bottom edge in page coordinates.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.scroll_top + self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 800.0)
    }
}

/// A section's vertical extent in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionBox {
    /// Top edge, in CSS pixels from the top of the page
    pub top: f64,
    /// Height, in CSS pixels
    pub height: f64,
}

impl SectionBox {
    /// Creates a section box.
    #[must_use]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Bottom edge in page coordinates.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Visible height of `section` inside `viewport`, never negative.
#[must_use]
pub fn visible_height(viewport: &Viewport, section: &SectionBox) -> f64 {
    (viewport.bottom().min(section.bottom()) - viewport.scroll_top.max(section.top)).max(0.0)
}

/// Intersection state of a section against the viewport.
///
/// Returns `(is_intersecting, ratio)`. Edge-adjacent boxes intersect with a
/// ratio of zero. A zero-height box inside the viewport counts as fully
/// visible.
#[must_use]
pub fn intersection(viewport: &Viewport, section: &SectionBox) -> (bool, f64) {
    let intersecting =
        section.top <= viewport.bottom() && section.bottom() >= viewport.scroll_top;
    if !intersecting {
        return (false, 0.0);
    }
    if section.height <= 0.0 {
        return (true, 1.0);
    }
    let ratio = (visible_height(viewport, section) / section.height).clamp(0.0, 1.0);
    (true, ratio)
}

/// Supplies section boxes to the observer.
pub trait LayoutSource {
    /// Returns the box for `node`, or `None` if it has no layout.
    fn section_box(&self, node: NodeId) -> Option<SectionBox>;
}

/// A fixed layout keyed by node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    boxes: HashMap<NodeId, SectionBox>,
}

impl Layout {
    /// Creates an empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the box for `node`.
    pub fn insert(&mut self, node: NodeId, section: SectionBox) {
        self.boxes.insert(node, section);
    }

    /// Number of laid-out nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Returns `true` if nothing has been laid out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl LayoutSource for Layout {
    fn section_box(&self, node: NodeId) -> Option<SectionBox> {
        self.boxes.get(&node).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_visible() {
        let vp = Viewport::new(0.0, 800.0);
        assert_eq!(intersection(&vp, &SectionBox::new(100.0, 200.0)), (true, 1.0));
    }

    #[test]
    fn test_partially_visible() {
        let vp = Viewport::new(0.0, 800.0);
        let (hit, ratio) = intersection(&vp, &SectionBox::new(600.0, 400.0));
        assert!(hit);
        assert!((ratio - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scrolled_past() {
        let vp = Viewport::new(1000.0, 800.0);
        assert_eq!(intersection(&vp, &SectionBox::new(0.0, 900.0)), (false, 0.0));
    }

    #[test]
    fn test_edge_adjacent_intersects_with_zero_ratio() {
        let vp = Viewport::new(0.0, 800.0);
        assert_eq!(intersection(&vp, &SectionBox::new(800.0, 100.0)), (true, 0.0));
    }

    #[test]
    fn test_section_taller_than_viewport() {
        let vp = Viewport::new(500.0, 500.0);
        let (hit, ratio) = intersection(&vp, &SectionBox::new(0.0, 2000.0));
        assert!(hit);
        assert!((ratio - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_height_inside_viewport() {
        let vp = Viewport::new(0.0, 800.0);
        assert_eq!(intersection(&vp, &SectionBox::new(10.0, 0.0)), (true, 1.0));
    }

    #[test]
    fn test_layout_lookup() {
        let mut layout = Layout::new();
        assert!(layout.is_empty());
        layout.insert(NodeId(3), SectionBox::new(0.0, 10.0));
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.section_box(NodeId(3)), Some(SectionBox::new(0.0, 10.0)));
        assert_eq!(layout.section_box(NodeId(4)), None);
    }
}
