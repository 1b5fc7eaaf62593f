//! Mobile navigation panel.

use tracing::debug;

use crate::dom::{Dom, NodeId};
use crate::render::page::{BACKDROP_ID, MENU_BUTTON_ID, SIDEBAR_ID};

/// Class marking the open sidebar and its backdrop.
pub const OPEN_CLASS: &str = "is-open";

/// Key that closes the sidebar.
pub const ESCAPE_KEY: &str = "Escape";

/// Opens and closes the navigation panel.
///
/// Exists only when the menu button, sidebar and backdrop are all present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarController {
    button: NodeId,
    sidebar: NodeId,
    backdrop: NodeId,
}

impl SidebarController {
    /// Locates the three sidebar elements.
    ///
    /// Returns `None` if any is missing.
    #[must_use]
    pub fn attach<D: Dom>(dom: &D) -> Option<Self> {
        let found = (
            dom.element_by_id(MENU_BUTTON_ID),
            dom.element_by_id(SIDEBAR_ID),
            dom.element_by_id(BACKDROP_ID),
        );
        if let (Some(button), Some(sidebar), Some(backdrop)) = found {
            Some(Self {
                button,
                sidebar,
                backdrop,
            })
        } else {
            debug!("sidebar elements missing; sidebar disabled");
            None
        }
    }

    /// The menu button.
    #[must_use]
    pub const fn button(&self) -> NodeId {
        self.button
    }

    /// The backdrop.
    #[must_use]
    pub const fn backdrop(&self) -> NodeId {
        self.backdrop
    }

    /// Returns `true` if the sidebar carries [`OPEN_CLASS`].
    #[must_use]
    pub fn is_open<D: Dom>(&self, dom: &D) -> bool {
        dom.has_class(self.sidebar, OPEN_CLASS)
    }

    /// Opens the sidebar.
    pub fn open<D: Dom>(&self, dom: &mut D) {
        dom.add_class(self.sidebar, OPEN_CLASS);
        dom.add_class(self.backdrop, OPEN_CLASS);
        dom.set_attribute(self.button, "aria-expanded", "true");
        dom.set_attribute(self.backdrop, "aria-hidden", "false");
    }

    /// Closes the sidebar.
    pub fn close<D: Dom>(&self, dom: &mut D) {
        dom.remove_class(self.sidebar, OPEN_CLASS);
        dom.remove_class(self.backdrop, OPEN_CLASS);
        dom.set_attribute(self.button, "aria-expanded", "false");
        dom.set_attribute(self.backdrop, "aria-hidden", "true");
    }

    /// Flips the sidebar state. Returns `true` if it is now open.
    pub fn toggle<D: Dom>(&self, dom: &mut D) -> bool {
        if self.is_open(dom) {
            self.close(dom);
            false
        } else {
            self.open(dom);
            true
        }
    }
}
