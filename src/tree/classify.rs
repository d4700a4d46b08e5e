//! Node predicates composed by the search
//!
//! Every predicate is recomputed on each call: the host tree may change
//! between resolutions.
use super::{walk::shadow_including_parent, Display, HostTree, NodeKind, Visibility};

/// Elements whose serialization has no end tag; they never carry searchable text
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Replaced, scripting and styling elements excluded from search
const INVISIBLE_ELEMENTS: &[&str] = &[
    "iframe", "image", "meter", "object", "progress", "style", "script", "video", "audio",
];

/// A text node whose parent element computes to `visibility: visible` and
/// which is being rendered
pub fn is_visible_text_node<T: HostTree>(tree: &T, node: T::Node) -> bool {
    if tree.kind(node) != NodeKind::Text {
        return false;
    }

    let visibility = shadow_including_parent(tree, node)
        .filter(|parent| tree.kind(*parent) == NodeKind::Element)
        .map_or_else(|| tree.visibility(node), |parent| tree.visibility(parent));

    visibility == Visibility::Visible && tree.is_rendered(node)
}

/// An element whose outer display is block-level
pub fn is_block_level<T: HostTree>(tree: &T, node: T::Node) -> bool {
    tree.kind(node) == NodeKind::Element && tree.display(node).is_block_level()
}

/// An HTML element excluded from search by its rendering or semantic category
pub fn is_search_invisible<T: HostTree>(tree: &T, node: T::Node) -> bool {
    if tree.kind(node) != NodeKind::Element || !tree.is_html_element(node) {
        return false;
    }
    if tree.display(node) == Display::None {
        return true;
    }

    let name = tree.element_name(node).unwrap_or_default();
    VOID_ELEMENTS.contains(&name)
        || INVISIBLE_ELEMENTS.contains(&name)
        || (name == "select" && tree.attribute(node, "multiple").is_none())
}

/// `node` or one of its shadow-including ancestors is search invisible
pub fn is_non_searchable_subtree<T: HostTree>(tree: &T, node: T::Node) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if is_search_invisible(tree, n) {
            return true;
        }
        current = shadow_including_parent(tree, n);
    }
    false
}

/// Nearest non-text shadow-including inclusive ancestor with block-level
/// display; the tree root when there is none
pub fn nearest_block_ancestor<T: HostTree>(tree: &T, node: T::Node) -> T::Node {
    let mut current = Some(node);
    while let Some(n) = current {
        if tree.kind(n) != NodeKind::Text && is_block_level(tree, n) {
            return n;
        }
        current = shadow_including_parent(tree, n);
    }
    tree.root()
}
