//! Boundary points and ranges over a [`HostTree`]
use std::cmp::Ordering;

use crate::tree::{walk::compare_boundary_points, HostTree};

/// A position in the content tree: a node plus an offset into it
/// (chars for text nodes, children otherwise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryPoint<N> {
    pub node: N,
    pub offset: usize,
}

impl<N> BoundaryPoint<N> {
    pub const fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// An ordered pair of boundary points
///
/// Matched ranges are returned by value and never touched again; the
/// resolver's scan cursors are ranges whose start moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range<N> {
    pub start: BoundaryPoint<N>,
    pub end: BoundaryPoint<N>,
}

impl<N: Copy + Eq> Range<N> {
    pub const fn new(start: BoundaryPoint<N>, end: BoundaryPoint<N>) -> Self {
        Self { start, end }
    }

    /// A range spanning all of `node`'s contents
    pub fn select_node_contents<T: HostTree<Node = N>>(tree: &T, node: N) -> Self {
        Self::new(
            BoundaryPoint::new(node, 0),
            BoundaryPoint::new(node, tree.length(node)),
        )
    }

    /// Whether the start is at or after the end
    pub fn is_collapsed<T: HostTree<Node = N>>(&self, tree: &T) -> bool {
        compare_boundary_points(tree, &self.start, &self.end) != Ordering::Less
    }

    /// Move the start; a start past the end collapses the range onto it
    pub fn set_start<T: HostTree<Node = N>>(&mut self, tree: &T, start: BoundaryPoint<N>) {
        self.start = start;
        if compare_boundary_points(tree, &self.start, &self.end) == Ordering::Greater {
            self.end = start;
        }
    }

    /// Collapse the range onto its end
    pub fn collapse_to_end(&mut self) {
        self.start = self.end;
    }
}
