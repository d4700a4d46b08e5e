//! Arena content tree
//!
//! [`Document`] is a small, self-contained [`HostTree`]: nodes live in a
//! vector and are addressed by [`NodeId`]. Rendering facts are derived from
//! markup on every query (inline `style` declarations, the `hidden`
//! attribute and per-element defaults); nothing is cached.
pub mod html;
mod style;

use crate::tree::{walk, Display, HostTree, NodeKind, Visibility};

/// Handle of a node in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Encapsulation mode of a shadow root. Closed roots are invisible to
/// traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowRootMode {
    Open,
    Closed,
}

#[derive(Debug, Clone)]
enum NodeData {
    Document,
    ShadowRoot {
        host: NodeId,
        mode: ShadowRootMode,
    },
    Element {
        name: String,
        attributes: Vec<(String, String)>,
        shadow_root: Option<NodeId>,
    },
    Text(String),
    Comment(String),
    Doctype(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
    /// Position among the parent's children
    index: usize,
    child_count: usize,
}

/// An in-memory document
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    /// Page-level language, used when no `lang` attribute applies
    default_language: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only the document node
    pub fn new() -> Self {
        let mut document = Self {
            nodes: Vec::new(),
            default_language: None,
        };
        document.create_node(NodeData::Document);
        document
    }

    /// The document node
    pub const fn document(&self) -> NodeId {
        NodeId(0)
    }

    fn create_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            index: 0,
            child_count: 0,
        });
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// A detached element; the name is ASCII-lowercased
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.create_node(NodeData::Element {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
            shadow_root: None,
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.create_node(NodeData::Text(text.to_owned()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.create_node(NodeData::Comment(text.to_owned()))
    }

    pub fn create_doctype(&mut self, name: &str) -> NodeId {
        self.create_node(NodeData::Doctype(name.to_owned()))
    }

    /// Append a detached `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let previous = self.node(parent).last_child;
        match previous {
            Some(previous) => self.nodes[previous.0].next_sibling = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
        let index = self.node(parent).child_count;
        self.nodes[parent.0].last_child = Some(child);
        self.nodes[parent.0].child_count += 1;
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].index = index;
    }

    pub fn append_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let element = self.create_element(name);
        self.append_child(parent, element);
        element
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node);
        node
    }

    /// Append `text` to the data of a text node
    pub fn push_text(&mut self, node: NodeId, text: &str) {
        if let NodeData::Text(data) = &mut self.nodes[node.0].data {
            data.push_str(text);
        }
    }

    /// Set (or replace) an attribute of an element; ignored for other nodes
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) {
        let NodeData::Element { attributes, .. } = &mut self.nodes[element.0].data else {
            return;
        };
        let name = name.to_ascii_lowercase();
        match attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => value.clone_into(v),
            None => attributes.push((name, value.to_owned())),
        }
    }

    /// Attach a shadow root to `host` and return it.
    /// A host keeps its first shadow root.
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowRootMode) -> NodeId {
        if let NodeData::Element {
            shadow_root: Some(existing),
            ..
        } = self.node(host).data
        {
            return existing;
        }

        let root = self.create_node(NodeData::ShadowRoot { host, mode });
        if let NodeData::Element { shadow_root, .. } = &mut self.nodes[host.0].data {
            *shadow_root = Some(root);
        }
        root
    }

    pub fn set_default_language(&mut self, language: &str) {
        self.default_language = Some(language.to_owned());
    }

    /// Data of a comment node
    pub fn comment_data(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Comment(data) => Some(data),
            _ => None,
        }
    }

    /// Name of a doctype node (`html` for `<!DOCTYPE html>`)
    pub fn doctype_name(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Doctype(name) => Some(name),
            _ => None,
        }
    }

    /// Children of `node`, in order
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(node).first_child, |child| {
            self.node(*child).next_sibling
        })
    }

    /// First element named `name` in shadow-including tree order
    pub fn find_element(&self, name: &str) -> Option<NodeId> {
        std::iter::successors(Some(self.document()), |node| walk::next_node(self, *node))
            .find(|node| self.element_name(*node) == Some(name))
    }

    /// Concatenated data of the descendant text nodes of `node`, light tree only
    pub fn text_content(&self, node: NodeId) -> String {
        let mut content = String::new();
        self.collect_text(node, &mut content);
        content
    }

    fn collect_text(&self, node: NodeId, content: &mut String) {
        if let NodeData::Text(data) = &self.node(node).data {
            content.push_str(data);
        }
        for child in self.children(node) {
            self.collect_text(child, content);
        }
    }

    /// Shadow-including inclusive ancestors of `node`, nearest first
    fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), |n| walk::shadow_including_parent(self, *n))
    }

    fn style_declaration(&self, node: NodeId, property: &str) -> Option<&str> {
        self.attribute(node, "style")
            .and_then(|style| style::declaration(style, property))
    }
}

impl HostTree for Document {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.document()
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        match self.node(node).data {
            NodeData::Document => NodeKind::Document,
            NodeData::ShadowRoot { .. } => NodeKind::ShadowRoot,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
            NodeData::Doctype(_) => NodeKind::Doctype,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).first_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).next_sibling
    }

    fn child_count(&self, node: NodeId) -> usize {
        self.node(node).child_count
    }

    fn child_index(&self, node: NodeId) -> usize {
        self.node(node).index
    }

    fn shadow_root(&self, node: NodeId) -> Option<NodeId> {
        let NodeData::Element {
            shadow_root: Some(root),
            ..
        } = self.node(node).data
        else {
            return None;
        };
        match self.node(root).data {
            NodeData::ShadowRoot {
                mode: ShadowRootMode::Open,
                ..
            } => Some(root),
            _ => None,
        }
    }

    fn shadow_host(&self, node: NodeId) -> Option<NodeId> {
        match self.node(node).data {
            NodeData::ShadowRoot { host, .. } => Some(host),
            _ => None,
        }
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Text(data) => Some(data),
            _ => None,
        }
    }

    fn element_name(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    fn display(&self, node: NodeId) -> Display {
        let Some(name) = self.element_name(node) else {
            return Display::Inline;
        };
        if let Some(value) = self.style_declaration(node, "display") {
            return Display::from_css(value);
        }
        if self.attribute(node, "hidden").is_some() {
            return Display::None;
        }
        style::default_display(name)
    }

    fn visibility(&self, node: NodeId) -> Visibility {
        self.ancestors(node)
            .find_map(|n| {
                self.style_declaration(n, "visibility")
                    .and_then(Visibility::from_css)
            })
            .unwrap_or_default()
    }

    fn is_rendered(&self, node: NodeId) -> bool {
        let mut last = node;
        for n in self.ancestors(node) {
            if self.kind(n) == NodeKind::Element && self.display(n) == Display::None {
                return false;
            }
            last = n;
        }
        // detached subtrees are not rendered
        last == self.document()
    }

    fn language(&self, node: NodeId) -> &str {
        self.ancestors(node)
            .find_map(|n| self.attribute(n, "lang"))
            .or(self.default_language.as_deref())
            .unwrap_or_default()
    }
}
