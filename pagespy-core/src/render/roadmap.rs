//! Roadmap timeline markup.

use std::collections::HashSet;

use super::escape::{escape_html, slugify};
use crate::content::RoadmapPhase;

/// Identifier of the roadmap timeline mount point.
pub const TIMELINE_ID: &str = "timeline";

/// DOM ids for each phase block, in order.
///
/// Ids are `roadmap-{slug}`. A repeated slug gets the first free `-{n}`
/// suffix (starting at 2), so ids are unique across the timeline.
#[must_use]
pub fn phase_ids(phases: &[RoadmapPhase]) -> Vec<String> {
    let mut used = HashSet::with_capacity(phases.len());
    phases
        .iter()
        .enumerate()
        .map(|(index, phase)| {
            let base = format!("roadmap-{}", slugify(&phase.phase, index));
            let mut id = base.clone();
            let mut n = 2;
            while used.contains(&id) {
                id = format!("{base}-{n}");
                n += 1;
            }
            used.insert(id.clone());
            id
        })
        .collect()
}

/// Render one roadmap phase block with the given DOM id.
#[must_use]
pub fn render_phase(phase: &RoadmapPhase, dom_id: &str) -> String {
    let items: String = phase
        .items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();

    let mut lines = Vec::with_capacity(8);
    lines.push(format!(
        "<div class=\"phase\" id=\"{}\">",
        escape_html(dom_id)
    ));
    lines.push("  <div class=\"phase__top\">".to_string());
    lines.push(format!(
        "    <h3 class=\"phase__title\">{}</h3>",
        escape_html(&phase.phase)
    ));
    lines.push(format!(
        "    <span class=\"pill\">{}</span>",
        escape_html(&phase.badge)
    ));
    lines.push("  </div>".to_string());
    lines.push(format!("  <ul class=\"phase__items\">{items}</ul>"));
    lines.push("</div>".to_string());
    lines.join("\n")
}

/// Render every roadmap phase, in order.
#[must_use]
pub fn render_timeline(phases: &[RoadmapPhase]) -> String {
    phases
        .iter()
        .zip(phase_ids(phases))
        .map(|(phase, id)| render_phase(phase, &id))
        .collect::<Vec<_>>()
        .join("\n")
}
