//! Document access.
//!
//! Components never reach for an ambient global document. They locate the
//! elements they need once, at construction time, through a [`Dom`]
//! implementation and keep the resulting [`NodeId`] handles. Every later
//! operation receives the document explicitly.
//!
//! [`Document`] is the in-memory implementation used by the CLI and by tests.

pub mod document;
pub mod parser;

pub use document::Document;

/// Handle to an element inside a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simple compound selector: optional tag, class and attribute presence.
///
/// `Selector::tag("a").class("nav__link").attribute("data-nav")` matches what
/// a browser would match for `a.nav__link[data-nav]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    class: Option<String>,
    attribute: Option<String>,
}

impl Selector {
    /// Matches every element.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Matches elements with the given tag name.
    #[must_use]
    pub fn tag(name: &str) -> Self {
        Self {
            tag: Some(name.to_ascii_lowercase()),
            ..Self::default()
        }
    }

    /// Additionally requires the given class.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    /// Additionally requires the given attribute to be present.
    #[must_use]
    pub fn attribute(mut self, name: &str) -> Self {
        self.attribute = Some(name.to_ascii_lowercase());
        self
    }

    /// Returns the required tag name, if any.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Returns the required class, if any.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Returns the required attribute, if any.
    #[must_use]
    pub fn attribute_name(&self) -> Option<&str> {
        self.attribute.as_deref()
    }
}

/// The document capability every page component is written against.
///
/// Lookups return `None`/empty instead of failing; callers treat missing
/// elements as a silent no-op.
pub trait Dom {
    /// Returns the first attached element whose `id` attribute equals `id`.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Returns every attached element matching `selector`, in document order.
    fn query_all(&self, selector: &Selector) -> Vec<NodeId>;

    /// Reads an attribute.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Writes an attribute.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Returns `true` if the element's class list contains `class`.
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Adds `class` to the element's class list (no duplicates).
    fn add_class(&mut self, node: NodeId, class: &str);

    /// Removes `class` from the element's class list.
    fn remove_class(&mut self, node: NodeId, class: &str);

    /// Replaces the element's children with nodes parsed from `html`.
    fn set_inner_html(&mut self, node: NodeId, html: &str);

    /// Replaces the element's children with a single text node.
    fn set_text_content(&mut self, node: NodeId, text: &str);

    /// Moves keyboard focus to the element.
    fn focus(&mut self, node: NodeId);
}
