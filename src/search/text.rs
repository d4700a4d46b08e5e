use std::cmp::Ordering;

use crate::{
    tree::{
        classify::{is_non_searchable_subtree, is_visible_text_node},
        walk::{compare_boundary_points, next_node},
        HostTree,
    },
    types::{BoundaryPoint, Range},
};

/// The text covered by `range`: the data of every visible, searchable text
/// node between its boundary points, concatenated without separators
pub fn range_text<T: HostTree>(tree: &T, range: &Range<T::Node>) -> String {
    let mut text = String::new();
    let mut node = Some(range.start.node);

    while let Some(current) = node {
        if compare_boundary_points(tree, &BoundaryPoint::new(current, 0), &range.end)
            == Ordering::Greater
        {
            break;
        }

        if is_visible_text_node(tree, current) && !is_non_searchable_subtree(tree, current) {
            let data = tree.text(current).unwrap_or_default();
            let from = if current == range.start.node {
                range.start.offset
            } else {
                0
            };
            let to = if current == range.end.node {
                range.end.offset
            } else {
                usize::MAX
            };
            text.extend(
                data.chars()
                    .skip(from)
                    .take(to.saturating_sub(from)),
            );
        }
        node = next_node(tree, current);
    }

    text
}
