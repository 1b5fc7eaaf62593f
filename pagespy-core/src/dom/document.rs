//! In-memory document.
//!
//! An arena of element and text nodes rooted at a synthetic `#document`
//! element. Replacing an element's children detaches the old subtree: the
//! detached nodes stay in the arena but are unreachable from the root, so
//! lookups and serialization never see them again.

use indexmap::IndexMap;

use super::parser::{ParsedNode, is_raw_text_element, is_void_element, parse_fragment};
use super::{Dom, NodeId, Selector};
use crate::render::escape::escape_html;

const ROOT_TAG: &str = "#document";

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A mutable, single-threaded document tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    focused: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            data: NodeData::Element {
                tag: ROOT_TAG.to_string(),
                attributes: IndexMap::new(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            focused: None,
        }
    }

    /// Parses a full page (or fragment) into a new document.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let mut doc = Self::new();
        let root = doc.root;
        doc.append_parsed(root, parse_fragment(html));
        doc
    }

    /// Returns the synthetic root node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the element currently holding focus.
    #[must_use]
    pub const fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Returns the element's tag name, or `None` for text nodes.
    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.node(node)?.data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    /// Returns the node's parent.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    /// Returns the node's children, text nodes included.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Returns the node's element children.
    #[must_use]
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|&child| self.tag_name(child).is_some())
            .collect()
    }

    /// Returns the element's classes in attribute order.
    #[must_use]
    pub fn class_list(&self, node: NodeId) -> Vec<&str> {
        self.attribute_ref(node, "class")
            .map(|classes| classes.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Returns `true` if the node is reachable from the root.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Returns the number of elements reachable from the root.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.descendants(self.root).len()
    }

    /// Concatenated text of the node and all its descendants.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    /// Serializes the node's children.
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        let raw = self.tag_name(node).is_some_and(is_raw_text_element);
        for &child in self.children(node) {
            self.serialize(child, raw, &mut out);
        }
        out
    }

    /// Serializes the node itself.
    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        let raw = self
            .parent(node)
            .and_then(|p| self.tag_name(p))
            .is_some_and(is_raw_text_element);
        self.serialize(node, raw, &mut out);
        out
    }

    /// Serializes the whole document with a doctype.
    #[must_use]
    pub fn to_html(&self) -> String {
        format!("<!DOCTYPE html>\n{}", self.inner_html(self.root))
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(
            NodeData::Element {
                tag: tag.to_ascii_lowercase(),
                attributes: IndexMap::new(),
            },
            None,
        )
    }

    /// Appends `child` to `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none() || self.node(child).is_none() || parent == child {
            return;
        }
        if let Some(old) = self.parent(child) {
            self.nodes[old.0].children.retain(|&c| c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node.0)
    }

    fn push_node(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    fn append_parsed(&mut self, parent: NodeId, parsed: Vec<ParsedNode>) {
        for node in parsed {
            match node {
                ParsedNode::Text(text) => {
                    self.push_node(NodeData::Text(text), Some(parent));
                }
                ParsedNode::Element {
                    tag,
                    attributes,
                    children,
                } => {
                    let id = self.push_node(
                        NodeData::Element {
                            tag,
                            attributes: attributes.into_iter().collect(),
                        },
                        Some(parent),
                    );
                    self.append_parsed(id, children);
                }
            }
        }
    }

    fn detach_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        if self.focused.is_some_and(|f| !self.is_attached(f)) {
            self.focused = None;
        }
    }

    /// Elements below `from` in document order, `from` excluded.
    fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(from).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.tag_name(id).is_some() {
                out.push(id);
                stack.extend(self.children(id).iter().rev().copied());
            }
        }
        out
    }

    fn attribute_ref(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.node(node)?.data {
            NodeData::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeData::Text(_) => None,
        }
    }

    fn attributes_mut(&mut self, node: NodeId) -> Option<&mut IndexMap<String, String>> {
        match &mut self.nodes.get_mut(node.0)?.data {
            NodeData::Element { attributes, .. } => Some(attributes),
            NodeData::Text(_) => None,
        }
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        let Some(tag) = self.tag_name(node) else {
            return false;
        };
        selector.tag_name().is_none_or(|t| t == tag)
            && selector
                .class_name()
                .is_none_or(|c| self.class_list(node).contains(&c))
            && selector
                .attribute_name()
                .is_none_or(|a| self.attribute_ref(node, a).is_some())
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.node(node) else {
            return;
        };
        match &n.data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element { .. } => {
                for &child in &n.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    fn serialize(&self, node: NodeId, raw_text: bool, out: &mut String) {
        let Some(n) = self.node(node) else {
            return;
        };
        match &n.data {
            NodeData::Text(text) if raw_text => out.push_str(text),
            NodeData::Text(text) => out.push_str(&escape_html(text)),
            NodeData::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&escape_html(value));
                        out.push('"');
                    }
                }
                out.push('>');
                if is_void_element(tag) {
                    return;
                }
                let raw = is_raw_text_element(tag);
                for &child in &n.children {
                    self.serialize(child, raw, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

impl Dom for Document {
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&node| self.attribute_ref(node, "id") == Some(id))
    }

    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&node| self.matches(node, selector))
            .collect()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.attribute_ref(node, name).map(ToString::to_string)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(attributes) = self.attributes_mut(node) {
            attributes.insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.class_list(node).contains(&class)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if self.tag_name(node).is_none() || self.has_class(node, class) {
            return;
        }
        let mut classes: Vec<String> = self
            .class_list(node)
            .into_iter()
            .map(ToString::to_string)
            .collect();
        classes.push(class.to_string());
        self.set_attribute(node, "class", &classes.join(" "));
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            return;
        }
        let remaining: Vec<String> = self
            .class_list(node)
            .into_iter()
            .filter(|&c| c != class)
            .map(ToString::to_string)
            .collect();
        self.set_attribute(node, "class", &remaining.join(" "));
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) {
        if self.tag_name(node).is_none() {
            return;
        }
        self.detach_children(node);
        self.append_parsed(node, parse_fragment(html));
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        if self.tag_name(node).is_none() {
            return;
        }
        self.detach_children(node);
        if !text.is_empty() {
            self.push_node(NodeData::Text(text.to_string()), Some(node));
        }
    }

    fn focus(&mut self, node: NodeId) {
        if self.tag_name(node).is_some() && self.is_attached(node) {
            self.focused = Some(node);
        }
    }
}
