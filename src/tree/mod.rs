//! Content tree capability surface
//!
//! The resolver never owns a content tree. It consumes the facts a host
//! (a DOM implementation, a layout engine, the arena [`crate::dom::Document`])
//! already knows about its nodes through the [`HostTree`] trait: structure,
//! shadow roots, computed display/visibility and language.
//!
//! All offsets handed across this trait count Unicode scalar values
//! (`char`s), both for text offsets and for the length of a text node.
//!
//! The tree must not mutate while a resolution call borrows it.
pub mod classify;
pub mod walk;

use std::fmt::Debug;

use crate::types::ResolveError;

/// Node categories the resolver distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The root of the content tree
    Document,
    /// The root of a shadow tree attached to a host element
    ShadowRoot,
    /// An element
    Element,
    /// A text-bearing leaf
    Text,
    /// Comments, processing instructions and the like
    Comment,
    /// A doctype node - skipped by every traversal
    Doctype,
}

/// Computed value of the CSS `display` property, reduced to what the
/// resolver needs to tell block-level boxes from the rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    None,
    Contents,
    #[default]
    Inline,
    InlineBlock,
    Block,
    FlowRoot,
    Table,
    TableRowGroup,
    TableRow,
    TableCell,
    TableCaption,
    ListItem,
    Flex,
    Grid,
    /// Any other inline-level value (`inline-flex`, `ruby`, ...)
    Other,
}

impl Display {
    /// Parse a computed `display` value; unknown values map to [`Display::Other`]
    #[must_use]
    pub fn from_css(value: &str) -> Self {
        let value = value.trim().to_ascii_lowercase();
        let keywords: Vec<&str> = value.split_whitespace().collect();

        match keywords.as_slice() {
            [] => Display::Inline,
            [single] => Self::from_keyword(single),
            // two-value syntax: outer display first
            [outer, rest @ ..] => {
                if rest.contains(&"list-item") || *outer == "list-item" {
                    Display::ListItem
                } else if *outer == "inline" {
                    Display::Inline
                } else {
                    match rest.first().map(|inner| Self::from_keyword(inner)) {
                        Some(
                            inner @ (Display::FlowRoot
                            | Display::Table
                            | Display::Flex
                            | Display::Grid),
                        ) => inner,
                        _ => Display::Block,
                    }
                }
            }
        }
    }

    fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "none" => Display::None,
            "contents" => Display::Contents,
            "inline" => Display::Inline,
            "inline-block" => Display::InlineBlock,
            "block" | "flow" => Display::Block,
            "flow-root" => Display::FlowRoot,
            "table" => Display::Table,
            "table-row-group" | "table-header-group" | "table-footer-group" => {
                Display::TableRowGroup
            }
            "table-row" => Display::TableRow,
            "table-cell" => Display::TableCell,
            "table-caption" => Display::TableCaption,
            "list-item" => Display::ListItem,
            "flex" => Display::Flex,
            "grid" => Display::Grid,
            _ => Display::Other,
        }
    }

    /// Whether the outer display groups content into a separate block
    #[must_use]
    pub const fn is_block_level(self) -> bool {
        matches!(
            self,
            Display::Block
                | Display::Table
                | Display::FlowRoot
                | Display::Grid
                | Display::Flex
                | Display::ListItem
        )
    }
}

/// Computed value of the CSS `visibility` property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

impl Visibility {
    /// Parse a `visibility` value; returns `None` for `inherit` and unknown values
    #[must_use]
    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "visible" => Some(Visibility::Visible),
            "hidden" => Some(Visibility::Hidden),
            "collapse" => Some(Visibility::Collapse),
            _ => None,
        }
    }
}

/// Read-only view over a host content tree
///
/// `Node` is a cheap handle (an index, a pointer wrapper) compared by
/// identity.
pub trait HostTree {
    /// Node handle
    type Node: Copy + Eq + Debug;

    /// The document node every search starts from
    fn root(&self) -> Self::Node;

    fn kind(&self, node: Self::Node) -> NodeKind;

    /// Tree parent; `None` for the document and for shadow roots
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;

    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// The shadow root attached to `node`, if it is open.
    /// Closed shadow roots must be reported as `None`.
    fn shadow_root(&self, node: Self::Node) -> Option<Self::Node>;

    /// The host element of a shadow root; `None` for any other node
    fn shadow_host(&self, node: Self::Node) -> Option<Self::Node>;

    /// Character data of a text node; `None` for non-text nodes
    fn text(&self, node: Self::Node) -> Option<&str>;

    /// ASCII-lowercase local name of an element
    fn element_name(&self, node: Self::Node) -> Option<&str>;

    /// Whether `node` is an element in the HTML namespace
    fn is_html_element(&self, node: Self::Node) -> bool {
        self.kind(node) == NodeKind::Element
    }

    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    /// Computed display of an element
    fn display(&self, node: Self::Node) -> Display;

    /// Computed (inherited) visibility of a node
    fn visibility(&self, node: Self::Node) -> Visibility;

    /// Whether the node is being rendered (no ancestor hides it)
    fn is_rendered(&self, node: Self::Node) -> bool;

    /// Language of the node: the nearest explicit language tag, else the
    /// page-level default, else the empty string
    fn language(&self, node: Self::Node) -> &str;

    /// Node length as used by boundary points: number of chars for text
    /// nodes, number of children otherwise
    fn length(&self, node: Self::Node) -> usize {
        match self.text(node) {
            Some(text) => text.chars().count(),
            None => self.child_count(node),
        }
    }

    fn child_count(&self, node: Self::Node) -> usize {
        let mut count = 0;
        let mut child = self.first_child(node);
        while let Some(c) = child {
            count += 1;
            child = self.next_sibling(c);
        }
        count
    }

    /// Index of `node` among its parent's children (0 for parentless nodes).
    ///
    /// Boundary point comparison calls this at every ancestor level; hosts
    /// that store the index should override the sibling scan.
    fn child_index(&self, node: Self::Node) -> usize {
        let Some(parent) = self.parent(node) else {
            return 0;
        };

        let mut index = 0;
        let mut child = self.first_child(parent);
        while let Some(c) = child {
            if c == node {
                break;
            }
            index += 1;
            child = self.next_sibling(c);
        }
        index
    }

    /// Extract `count` chars of a text node starting at `offset`.
    /// The count is clamped to the end of the data.
    ///
    /// # Errors
    ///
    /// `ResolveError::IndexSize` if `offset` is beyond the node's length.
    fn substring_data(
        &self,
        node: Self::Node,
        offset: usize,
        count: usize,
    ) -> Result<String, ResolveError> {
        let data = self.text(node).unwrap_or_default();
        let length = data.chars().count();
        if offset > length {
            return Err(ResolveError::IndexSize { offset, length });
        }
        Ok(data.chars().skip(offset).take(count).collect())
    }
}
