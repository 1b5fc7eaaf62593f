//! Content rendering
//!
//! Pure functions turn [`SiteContent`] into markup; [`Renderer`] injects that
//! markup into the two mount points located once at construction.
//!
//! # Architecture
//!
//! - [`escape`]: escaping of every interpolated string, block slugs
//! - [`modules`]: module grid cards
//! - [`roadmap`]: roadmap timeline phases
//! - [`page`]: page shell with navigation, sections and mount points

pub mod escape;
pub mod modules;
pub mod page;
pub mod roadmap;

use tracing::debug;

use crate::content::SiteContent;
use crate::dom::{Dom, NodeId};

pub use escape::escape_html;
pub use modules::{MODULE_GRID_ID, render_module, render_module_grid};
pub use page::render_shell;
pub use roadmap::{TIMELINE_ID, phase_ids, render_phase, render_timeline};

/// The two content containers, looked up once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MountPoints {
    /// `#moduleGrid`, if present
    pub module_grid: Option<NodeId>,
    /// `#timeline`, if present
    pub timeline: Option<NodeId>,
}

impl MountPoints {
    /// Locates both mount points in `dom`.
    #[must_use]
    pub fn locate<D: Dom>(dom: &D) -> Self {
        Self {
            module_grid: dom.element_by_id(MODULE_GRID_ID),
            timeline: dom.element_by_id(TIMELINE_ID),
        }
    }
}

/// What a render pass wrote. `None` means the mount point was absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    /// Module cards written
    pub modules: Option<usize>,
    /// Roadmap phases written
    pub phases: Option<usize>,
}

/// Injects rendered content into its mount points.
///
/// Rendering replaces the previous content of each mount, so calling
/// [`Renderer::render`] again with the same content leaves the document
/// with the same blocks and no duplicate identifiers.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    mounts: MountPoints,
}

impl Renderer {
    /// Creates a renderer bound to already-located mount points.
    #[must_use]
    pub const fn new(mounts: MountPoints) -> Self {
        Self { mounts }
    }

    /// Locates mount points in `dom` and binds to them.
    #[must_use]
    pub fn attach<D: Dom>(dom: &D) -> Self {
        Self::new(MountPoints::locate(dom))
    }

    /// Returns the bound mount points.
    #[must_use]
    pub const fn mounts(&self) -> MountPoints {
        self.mounts
    }

    /// Renders modules and roadmap into their mounts.
    pub fn render<D: Dom>(&self, dom: &mut D, content: &SiteContent) -> RenderSummary {
        let modules = self.mounts.module_grid.map(|grid| {
            dom.set_inner_html(grid, &render_module_grid(&content.modules));
            content.modules.len()
        });
        if modules.is_none() {
            debug!(mount = MODULE_GRID_ID, "mount point absent; skipping modules");
        }

        let phases = self.mounts.timeline.map(|timeline| {
            dom.set_inner_html(timeline, &render_timeline(&content.roadmap));
            content.roadmap.len()
        });
        if phases.is_none() {
            debug!(mount = TIMELINE_ID, "mount point absent; skipping roadmap");
        }

        RenderSummary { modules, phases }
    }
}
