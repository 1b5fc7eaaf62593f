//! Visibility observation and winner selection.
//!
//! [`VisibilityObserver`] turns viewport geometry into visibility entries the
//! way a browser intersection observer does: an entry for every target on
//! its first evaluation, then only when a target's intersecting flag or
//! threshold band changes. [`select_most_visible`] resolves a batch to one
//! winner.

use tracing::trace;

use super::geometry::{LayoutSource, Viewport, intersection};
use crate::content::DEFAULT_THRESHOLDS;
use crate::dom::NodeId;
use crate::error::ThresholdError;

/// Minimum number of distinct threshold points.
pub const MIN_THRESHOLDS: usize = 3;

// ============================================================================
// Thresholds
// ============================================================================

/// Sorted, distinct visibility-ratio crossing points in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds(Vec<f64>);

impl Thresholds {
    /// Validates and normalizes threshold points.
    ///
    /// # Errors
    ///
    /// Returns [`ThresholdError::OutOfRange`] for a point outside `[0, 1]`
    /// (or not finite), and [`ThresholdError::TooFew`] when fewer than
    /// [`MIN_THRESHOLDS`] distinct points remain.
    pub fn new(mut points: Vec<f64>) -> Result<Self, ThresholdError> {
        if let Some(&bad) = points
            .iter()
            .find(|p| !p.is_finite() || !(0.0..=1.0).contains(*p))
        {
            return Err(ThresholdError::OutOfRange(bad));
        }
        points.sort_by(f64::total_cmp);
        points.dedup();
        if points.len() < MIN_THRESHOLDS {
            return Err(ThresholdError::TooFew {
                required: MIN_THRESHOLDS,
                actual: points.len(),
            });
        }
        Ok(Self(points))
    }

    /// The normalized points.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of thresholds `ratio` has reached.
    #[must_use]
    pub fn band(&self, ratio: f64) -> usize {
        self.0.iter().take_while(|&&t| ratio >= t).count()
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLDS.to_vec())
    }
}

// ============================================================================
// Entries
// ============================================================================

/// One visibility observation of one section element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEntry {
    /// Observed section element
    pub target: NodeId,
    /// Whether the element intersects the viewport
    pub is_intersecting: bool,
    /// Fraction of the element inside the viewport
    pub ratio: f64,
}

impl VisibilityEntry {
    /// Creates an entry.
    #[must_use]
    pub const fn new(target: NodeId, is_intersecting: bool, ratio: f64) -> Self {
        Self {
            target,
            is_intersecting,
            ratio,
        }
    }

    /// Ratio clamped to `[0, 1]`, with non-finite values read as `0`.
    #[must_use]
    pub fn effective_ratio(&self) -> f64 {
        if self.ratio.is_finite() {
            self.ratio.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Selects the intersecting entry with the strictly greatest ratio.
///
/// Entries that do not intersect are ignored. On a tie the first maximum
/// encountered wins. Returns `None` if nothing intersects.
#[must_use]
pub fn select_most_visible(entries: &[VisibilityEntry]) -> Option<&VisibilityEntry> {
    let mut best: Option<&VisibilityEntry> = None;
    for entry in entries.iter().filter(|e| e.is_intersecting) {
        match best {
            Some(current) if entry.effective_ratio() <= current.effective_ratio() => {}
            _ => best = Some(entry),
        }
    }
    best
}

// ============================================================================
// Observer
// ============================================================================

#[derive(Debug, Clone)]
struct ObservedTarget {
    node: NodeId,
    /// `(is_intersecting, band)` at the last emitted entry
    last: Option<(bool, usize)>,
}

/// Tracks a fixed set of section elements against the viewport.
#[derive(Debug, Clone, Default)]
pub struct VisibilityObserver {
    thresholds: Thresholds,
    targets: Vec<ObservedTarget>,
}

impl VisibilityObserver {
    /// Creates an observer with no targets.
    #[must_use]
    pub const fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            targets: Vec::new(),
        }
    }

    /// The configured thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Starts observing `node`. Observing a node twice has no effect.
    pub fn observe(&mut self, node: NodeId) {
        if !self.is_observing(node) {
            self.targets.push(ObservedTarget { node, last: None });
        }
    }

    /// Stops observing `node`.
    pub fn unobserve(&mut self, node: NodeId) {
        self.targets.retain(|t| t.node != node);
    }

    /// Stops observing everything.
    pub fn disconnect(&mut self) {
        self.targets.clear();
    }

    /// Returns `true` if `node` is observed.
    #[must_use]
    pub fn is_observing(&self, node: NodeId) -> bool {
        self.targets.iter().any(|t| t.node == node)
    }

    /// Observed nodes in observation order.
    #[must_use]
    pub fn observed(&self) -> Vec<NodeId> {
        self.targets.iter().map(|t| t.node).collect()
    }

    /// Number of observed nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns `true` if nothing is observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Evaluates every target against `viewport` and returns the entries
    /// whose intersecting flag or threshold band changed.
    ///
    /// Targets with no layout are skipped.
    pub fn take_records<L: LayoutSource + ?Sized>(
        &mut self,
        viewport: &Viewport,
        layout: &L,
    ) -> Vec<VisibilityEntry> {
        let mut records = Vec::new();
        for target in &mut self.targets {
            let Some(section) = layout.section_box(target.node) else {
                continue;
            };
            let (hit, ratio) = intersection(viewport, &section);
            let band = if hit { self.thresholds.band(ratio) } else { 0 };
            if target.last == Some((hit, band)) {
                continue;
            }
            trace!(node = %target.node, hit, ratio, band, "visibility crossing");
            target.last = Some((hit, band));
            records.push(VisibilityEntry::new(target.node, hit, ratio));
        }
        records
    }
}
