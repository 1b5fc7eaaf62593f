//! Page composition.
//!
//! [`Page::init`] runs the startup sequence once: render content, stamp the
//! footer year, wire the sidebar, then attach the scroll spy to the rendered
//! sections. Afterwards [`Page::dispatch`] handles one [`PageEvent`] at a
//! time, to completion.

use tracing::{debug, info};

use crate::content::SiteContent;
use crate::dom::{Dom, NodeId};
use crate::render::page::{MAIN_ID, YEAR_ID};
use crate::render::{RenderSummary, Renderer};
use crate::sidebar::{ESCAPE_KEY, SidebarController};
use crate::spy::{
    ActiveChange, Layout, Resolution, ScrollSpy, SpyOptions, Viewport, VisibilityEntry,
};

// ============================================================================
// Events
// ============================================================================

/// Something that happened on the page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// A visibility batch delivered directly, bypassing geometry.
    Visibility(Vec<VisibilityEntry>),
    /// The page scrolled to `scroll_top`.
    Scroll {
        /// New scroll offset
        scroll_top: f64,
    },
    /// The viewport height changed.
    Resize {
        /// New viewport height
        height: f64,
    },
    /// Section boxes were laid out (again).
    Relayout(Layout),
    /// The menu button was clicked.
    MenuClick,
    /// The backdrop was clicked.
    BackdropClick,
    /// An element was clicked.
    Click(NodeId),
    /// A key was pressed.
    KeyDown {
        /// Key name, e.g. `Escape`
        key: String,
    },
    /// The URL fragment changed.
    HashChange {
        /// New fragment, with or without the leading `#`
        fragment: String,
    },
}

/// Observable effect of handling an event.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEffect {
    /// A visibility batch was resolved.
    Resolved(Resolution),
    /// The sidebar opened.
    SidebarOpened,
    /// The sidebar closed.
    SidebarClosed,
    /// Keyboard focus moved to the element with this id.
    FocusMoved {
        /// Id of the focused element
        target: String,
    },
}

impl PageEffect {
    /// Returns the active-section change carried by this effect, if any.
    #[must_use]
    pub const fn active_change(&self) -> Option<&ActiveChange> {
        match self {
            Self::Resolved(resolution) => resolution.change(),
            _ => None,
        }
    }
}

// ============================================================================
// Initialization
// ============================================================================

/// Startup inputs.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// URL fragment at load time
    pub fragment: String,
    /// Year written into the footer
    pub year: i32,
    /// Initial viewport
    pub viewport: Viewport,
}

/// What startup did.
#[derive(Debug, Clone, PartialEq)]
pub struct PageInit {
    /// Render pass result
    pub render: RenderSummary,
    /// Whether the footer year slot was found
    pub year_stamped: bool,
    /// Whether the sidebar controller is active
    pub sidebar: bool,
    /// Sections under observation
    pub sections: Vec<String>,
    /// Initial activation
    pub initial: Option<ActiveChange>,
}

/// Writes `year` into the footer slot. Returns `false` if the slot is absent.
pub fn stamp_year<D: Dom>(dom: &mut D, year: i32) -> bool {
    match dom.element_by_id(YEAR_ID) {
        Some(slot) => {
            dom.set_text_content(slot, &year.to_string());
            true
        }
        None => false,
    }
}

// ============================================================================
// Page
// ============================================================================

/// The running page.
#[derive(Debug, Clone)]
pub struct Page {
    renderer: Renderer,
    sidebar: Option<SidebarController>,
    spy: ScrollSpy,
    main: Option<NodeId>,
    viewport: Viewport,
    layout: Layout,
}

impl Page {
    /// Runs the startup sequence against `dom`.
    pub fn init<D: Dom>(
        dom: &mut D,
        content: &SiteContent,
        spy_options: SpyOptions,
        options: PageOptions,
    ) -> (Self, PageInit) {
        let renderer = Renderer::attach(dom);
        let render = renderer.render(dom, content);
        let year_stamped = stamp_year(dom, options.year);
        let sidebar = SidebarController::attach(dom);
        let main = dom.element_by_id(MAIN_ID);
        let (spy, initial) = ScrollSpy::attach(dom, spy_options, &options.fragment);

        let init = PageInit {
            render,
            year_stamped,
            sidebar: sidebar.is_some(),
            sections: spy.section_ids().map(ToString::to_string).collect(),
            initial,
        };
        info!(
            modules = render.modules.unwrap_or_default(),
            phases = render.phases.unwrap_or_default(),
            sections = init.sections.len(),
            "page initialized"
        );

        (
            Self {
                renderer,
                sidebar,
                spy,
                main,
                viewport: options.viewport,
                layout: Layout::new(),
            },
            init,
        )
    }

    /// The scroll spy.
    #[must_use]
    pub const fn spy(&self) -> &ScrollSpy {
        &self.spy
    }

    /// The sidebar controller, if the page has one.
    #[must_use]
    pub const fn sidebar(&self) -> Option<&SidebarController> {
        self.sidebar.as_ref()
    }

    /// The current viewport.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The active section id.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.spy.active()
    }

    /// Re-renders content into the mounts located at startup and rebinds the
    /// scroll spy to the new section elements.
    ///
    /// Replaced sections have no geometry until the next
    /// [`PageEvent::Relayout`].
    pub fn rerender<D: Dom>(
        &mut self,
        dom: &mut D,
        content: &SiteContent,
    ) -> (RenderSummary, Option<ActiveChange>) {
        let render = self.renderer.render(dom, content);
        let change = self.spy.rebind(dom);
        (render, change)
    }

    /// Handles one event to completion.
    pub fn dispatch<D: Dom>(&mut self, dom: &mut D, event: PageEvent) -> Vec<PageEffect> {
        debug!(?event, "dispatch");
        match event {
            PageEvent::Visibility(entries) => {
                vec![PageEffect::Resolved(self.spy.handle_batch(dom, &entries))]
            }
            PageEvent::Scroll { scroll_top } => {
                self.viewport.scroll_top = scroll_top;
                self.reobserve(dom)
            }
            PageEvent::Resize { height } => {
                self.viewport.height = height;
                self.reobserve(dom)
            }
            PageEvent::Relayout(layout) => {
                self.layout = layout;
                self.reobserve(dom)
            }
            PageEvent::MenuClick => self.sidebar_toggle(dom),
            PageEvent::BackdropClick => self.sidebar_close(dom),
            PageEvent::Click(target) => {
                if dom.attribute(target, "data-nav").is_some() {
                    self.sidebar_close(dom)
                } else {
                    Vec::new()
                }
            }
            PageEvent::KeyDown { key } => {
                if key == ESCAPE_KEY {
                    self.sidebar_close(dom)
                } else {
                    Vec::new()
                }
            }
            PageEvent::HashChange { fragment } => {
                debug!(%fragment, "fragment changed");
                match self.main {
                    Some(main) => {
                        dom.focus(main);
                        vec![PageEffect::FocusMoved {
                            target: MAIN_ID.to_string(),
                        }]
                    }
                    None => Vec::new(),
                }
            }
        }
    }

    fn reobserve<D: Dom>(&mut self, dom: &mut D) -> Vec<PageEffect> {
        self.spy
            .on_viewport_change(dom, &self.viewport, &self.layout)
            .map(PageEffect::Resolved)
            .into_iter()
            .collect()
    }

    fn sidebar_toggle<D: Dom>(&self, dom: &mut D) -> Vec<PageEffect> {
        let Some(sidebar) = self.sidebar else {
            return Vec::new();
        };
        if sidebar.toggle(dom) {
            vec![PageEffect::SidebarOpened]
        } else {
            vec![PageEffect::SidebarClosed]
        }
    }

    /// Closing an already closed sidebar reports nothing.
    fn sidebar_close<D: Dom>(&self, dom: &mut D) -> Vec<PageEffect> {
        match self.sidebar {
            Some(sidebar) if sidebar.is_open(dom) => {
                sidebar.close(dom);
                vec![PageEffect::SidebarClosed]
            }
            Some(sidebar) => {
                sidebar.close(dom);
                Vec::new()
            }
            None => Vec::new(),
        }
    }
}
