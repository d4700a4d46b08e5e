//! Shadow-including tree traversal
//!
//! Preorder in which a shadow host is followed by its (open) shadow tree and
//! only then by its ordinary children.
use std::cmp::Ordering;

use super::{HostTree, NodeKind};
use crate::types::BoundaryPoint;

/// Parent of `node`, or the host when `node` is a shadow root
pub fn shadow_including_parent<T: HostTree>(tree: &T, node: T::Node) -> Option<T::Node> {
    tree.parent(node).or_else(|| tree.shadow_host(node))
}

/// Next node in shadow-including tree order
pub fn next_node<T: HostTree>(tree: &T, node: T::Node) -> Option<T::Node> {
    if let Some(shadow_root) = tree.shadow_root(node) {
        return Some(shadow_root);
    }
    if let Some(child) = tree.first_child(node) {
        return Some(child);
    }
    next_node_not_descendant(tree, node)
}

/// Next node in shadow-including tree order that is not a doctype
pub fn next_node_skipping_doctype<T: HostTree>(tree: &T, node: T::Node) -> Option<T::Node> {
    let mut next = next_node(tree, node);
    while let Some(n) = next {
        if tree.kind(n) != NodeKind::Doctype {
            break;
        }
        next = next_node(tree, n);
    }
    next
}

/// Next node in shadow-including tree order that is not a shadow-including
/// descendant of `node`
pub fn next_node_not_descendant<T: HostTree>(tree: &T, node: T::Node) -> Option<T::Node> {
    let mut current = node;
    loop {
        if let Some(sibling) = tree.next_sibling(current) {
            return Some(sibling);
        }
        if let Some(parent) = tree.parent(current) {
            current = parent;
            continue;
        }
        // leaving a shadow tree: the host's light children come next
        let host = tree.shadow_host(current)?;
        if let Some(child) = tree.first_child(host) {
            return Some(child);
        }
        current = host;
    }
}

/// Whether `node` is a shadow-including descendant of `ancestor`
/// (`node != ancestor`)
pub fn is_shadow_including_descendant<T: HostTree>(
    tree: &T,
    node: T::Node,
    ancestor: T::Node,
) -> bool {
    let mut current = shadow_including_parent(tree, node);
    while let Some(n) = current {
        if n == ancestor {
            return true;
        }
        current = shadow_including_parent(tree, n);
    }
    false
}

pub fn is_shadow_including_inclusive_ancestor<T: HostTree>(
    tree: &T,
    ancestor: T::Node,
    node: T::Node,
) -> bool {
    node == ancestor || is_shadow_including_descendant(tree, node, ancestor)
}

/// Sort key of a node: one entry per ancestor level.
/// Child `i` is encoded as `2i + 1`, the shadow root of a host as `-1`, so
/// that a boundary offset `k` (encoded `2k`) sorts between children.
fn node_key<T: HostTree>(tree: &T, node: T::Node) -> Vec<i64> {
    let mut key = Vec::new();
    let mut current = node;
    loop {
        if let Some(parent) = tree.parent(current) {
            key.push(2 * tree.child_index(current) as i64 + 1);
            current = parent;
        } else if let Some(host) = tree.shadow_host(current) {
            key.push(-1);
            current = host;
        } else {
            break;
        }
    }
    key.reverse();
    key
}

/// Sort key of a boundary point; keys compare like the points they encode.
/// Building one costs a walk to the root, so scans hoist a fixed bound's key.
pub(crate) fn boundary_key<T: HostTree>(tree: &T, point: &BoundaryPoint<T::Node>) -> Vec<i64> {
    let mut key = node_key(tree, point.node);
    key.push(2 * point.offset as i64);
    key
}

/// Position of boundary point `a` relative to `b` in shadow-including tree order
pub fn compare_boundary_points<T: HostTree>(
    tree: &T,
    a: &BoundaryPoint<T::Node>,
    b: &BoundaryPoint<T::Node>,
) -> Ordering {
    if a.node == b.node {
        return a.offset.cmp(&b.offset);
    }
    boundary_key(tree, a).cmp(&boundary_key(tree, b))
}

/// Number of nodes in shadow-including tree order plus the total text
/// length; bounds every forward-moving scan over the tree
pub fn document_extent<T: HostTree>(tree: &T) -> usize {
    let mut extent = 0;
    let mut node = Some(tree.root());
    while let Some(n) = node {
        extent += 1 + tree.text(n).map_or(0, |text| text.chars().count());
        node = next_node(tree, n);
    }
    extent
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dom::{Document, NodeId, ShadowRootMode};

    /// <div id=host>[shadow: <span>s</span>]<p>light</p></div><p>after</p>
    fn shadow_fixture() -> (Document, Vec<NodeId>) {
        let mut doc = Document::new();
        let root = doc.document();
        let host = doc.append_element(root, "div");
        let shadow = doc.attach_shadow(host, ShadowRootMode::Open);
        let span = doc.append_element(shadow, "span");
        let s = doc.append_text(span, "s");
        let p = doc.append_element(host, "p");
        let light = doc.append_text(p, "light");
        let after = doc.append_element(root, "p");
        let after_text = doc.append_text(after, "after");
        (
            doc,
            vec![root, host, shadow, span, s, p, light, after, after_text],
        )
    }

    #[test]
    fn test_shadow_including_preorder() {
        let (doc, nodes) = shadow_fixture();

        let mut order = Vec::new();
        let mut node = Some(doc.document());
        while let Some(n) = node {
            order.push(n);
            node = next_node(&doc, n);
        }
        assert_eq!(order, nodes);
    }

    #[test]
    fn test_next_node_not_descendant_leaves_shadow_tree() {
        let (doc, nodes) = shadow_fixture();
        let (host, shadow, span, p, after) = (nodes[1], nodes[2], nodes[3], nodes[5], nodes[7]);

        assert_eq!(next_node_not_descendant(&doc, span), Some(p));
        assert_eq!(next_node_not_descendant(&doc, shadow), Some(p));
        assert_eq!(next_node_not_descendant(&doc, host), Some(after));
        assert_eq!(next_node_not_descendant(&doc, after), None);
    }

    #[test]
    fn test_closed_shadow_root_is_not_traversed() {
        let mut doc = Document::new();
        let root = doc.document();
        let host = doc.append_element(root, "div");
        let shadow = doc.attach_shadow(host, ShadowRootMode::Closed);
        doc.append_text(shadow, "secret");
        let text = doc.append_text(host, "light");

        assert_eq!(next_node(&doc, host), Some(text));
    }

    #[test]
    fn test_descendant_across_shadow_boundary() {
        let (doc, nodes) = shadow_fixture();
        let (root, host, s, after_text) = (nodes[0], nodes[1], nodes[4], nodes[8]);

        assert!(is_shadow_including_descendant(&doc, s, host));
        assert!(is_shadow_including_descendant(&doc, s, root));
        assert!(!is_shadow_including_descendant(&doc, after_text, host));
        assert!(!is_shadow_including_descendant(&doc, host, host));
        assert!(is_shadow_including_inclusive_ancestor(&doc, host, host));
    }

    #[test]
    fn test_boundary_point_order() {
        let (doc, nodes) = shadow_fixture();
        let (host, s, light, after_text) = (nodes[1], nodes[4], nodes[6], nodes[8]);

        let bp = |node, offset| BoundaryPoint::new(node, offset);

        assert_eq!(
            compare_boundary_points(&doc, &bp(s, 1), &bp(light, 0)),
            Ordering::Less
        );
        assert_eq!(
            compare_boundary_points(&doc, &bp(light, 5), &bp(after_text, 0)),
            Ordering::Less
        );
        assert_eq!(
            compare_boundary_points(&doc, &bp(host, 1), &bp(light, 2)),
            Ordering::Greater
        );
        assert_eq!(
            compare_boundary_points(&doc, &bp(host, 0), &bp(light, 2)),
            Ordering::Less
        );
        assert_eq!(
            compare_boundary_points(&doc, &bp(light, 3), &bp(light, 3)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_document_extent_counts_nodes_and_text() {
        let (doc, nodes) = shadow_fixture();
        assert_eq!(document_extent(&doc), nodes.len() + "s".len() + "light".len() + "after".len());
    }
}
