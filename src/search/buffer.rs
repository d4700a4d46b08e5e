//! Search buffer of a block segment
//!
//! The text of a run of visible text nodes sharing a block ancestor is
//! concatenated into one buffer. Every buffer index maps back to a
//! (node, offset) boundary point.
use crate::{
    tree::HostTree,
    types::BoundaryPoint,
    utils::{fold_case, QueryUnit},
};

/// Concatenated text of a text node run with its index mapping
#[derive(Debug, Clone)]
pub(crate) struct TextBuffer<N> {
    /// Text nodes in order with their lengths
    nodes: Vec<(N, usize)>,
    /// Buffer content, as in the nodes
    content: Vec<char>,
    /// Case-folded content, index-aligned with `content`
    folded: Vec<char>,
}

impl<N: Copy + Eq> TextBuffer<N> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            content: Vec::new(),
            folded: Vec::new(),
        }
    }

    /// Append the data of a text node
    pub(crate) fn push<T: HostTree<Node = N>>(&mut self, tree: &T, node: N) {
        let text = tree.text(node).unwrap_or_default();
        let before = self.content.len();
        self.content.extend(text.chars());
        self.folded.extend(text.chars().map(fold_case));
        self.nodes.push((node, self.content.len() - before));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.content.len()
    }

    pub(crate) fn content(&self) -> &[char] {
        &self.content
    }

    pub(crate) fn first_node(&self) -> Option<N> {
        self.nodes.first().map(|(node, _)| *node)
    }

    pub(crate) fn last_node(&self) -> Option<N> {
        self.nodes.last().map(|(node, _)| *node)
    }

    /// Boundary point of a buffer index.
    ///
    /// An index is attributed to the first node whose cumulative length
    /// exceeds it. With `is_end`, an index that lands exactly on the end of a
    /// node stays at the end of that node instead of moving to the start of
    /// the next one.
    pub(crate) fn boundary_point_at(&self, index: usize, is_end: bool) -> Option<BoundaryPoint<N>> {
        let mut counted = 0;
        for &(node, length) in &self.nodes {
            let mut node_end = counted + length;
            if is_end {
                node_end += 1;
            }
            if node_end > index {
                return Some(BoundaryPoint::new(node, index - counted));
            }
            counted += length;
        }
        None
    }

    /// Find `query` in the buffer at or after `from`, comparing case-folded
    /// chars. A whitespace unit of the query matches any non-empty run of
    /// whitespace in the buffer.
    ///
    /// Returns the start and (exclusive) end index of the first occurrence.
    pub(crate) fn find(&self, query: &[QueryUnit], from: usize) -> Option<(usize, usize)> {
        if query.is_empty() {
            return None;
        }
        (from..self.folded.len())
            .find_map(|start| self.match_at(query, start).map(|end| (start, end)))
    }

    fn match_at(&self, query: &[QueryUnit], start: usize) -> Option<usize> {
        let mut position = start;
        for unit in query {
            match unit {
                QueryUnit::Char(c) => {
                    if self.folded.get(position) != Some(c) {
                        return None;
                    }
                    position += 1;
                }
                QueryUnit::Whitespace => {
                    let run = self.folded[position.min(self.folded.len())..]
                        .iter()
                        .take_while(|c| c.is_whitespace())
                        .count();
                    if run == 0 {
                        return None;
                    }
                    position += run;
                }
            }
        }
        Some(position)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        dom::{Document, NodeId},
        utils::fold_query,
    };

    fn buffer_of(parts: &[&str]) -> (TextBuffer<NodeId>, Vec<NodeId>) {
        let mut doc = Document::new();
        let p = doc.append_element(doc.document(), "p");
        let nodes: Vec<NodeId> = parts.iter().map(|part| doc.append_text(p, part)).collect();

        let mut buffer = TextBuffer::new();
        for node in &nodes {
            buffer.push(&doc, *node);
        }
        (buffer, nodes)
    }

    #[test]
    fn test_concatenation() {
        let (buffer, nodes) = buffer_of(&["Hel", "lo world"]);
        assert_eq!(buffer.len(), 11);
        assert_eq!(buffer.content().iter().collect::<String>(), "Hello world");
        assert_eq!(buffer.first_node(), Some(nodes[0]));
        assert_eq!(buffer.last_node(), Some(nodes[1]));
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_boundary_point_mapping() {
        let (buffer, nodes) = buffer_of(&["Hel", "lo world"]);

        assert_eq!(buffer.boundary_point_at(0, false), Some(BoundaryPoint::new(nodes[0], 0)));
        // start of "lo" belongs to the second node
        assert_eq!(buffer.boundary_point_at(3, false), Some(BoundaryPoint::new(nodes[1], 0)));
        // but an exclusive end at 3 stays at the end of the first node
        assert_eq!(buffer.boundary_point_at(3, true), Some(BoundaryPoint::new(nodes[0], 3)));
        assert_eq!(buffer.boundary_point_at(11, true), Some(BoundaryPoint::new(nodes[1], 8)));
        assert_eq!(buffer.boundary_point_at(11, false), None);
        assert_eq!(buffer.boundary_point_at(12, true), None);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let (buffer, _) = buffer_of(&["say hello now"]);
        assert_eq!(buffer.find(&fold_query("Hello"), 0), Some((4, 9)));
        assert_eq!(buffer.find(&fold_query("HELLO"), 5), None);
    }

    #[test]
    fn test_find_across_nodes() {
        let (buffer, _) = buffer_of(&["Hel", "lo world"]);
        assert_eq!(buffer.find(&fold_query("hello"), 0), Some((0, 5)));
    }

    #[test]
    fn test_find_collapses_whitespace() {
        let (buffer, _) = buffer_of(&["some\n      ", "  spaced text"]);
        assert_eq!(buffer.find(&fold_query("some spaced"), 0), Some((0, 19)));
        assert_eq!(buffer.find(&fold_query("somespaced"), 0), None);
    }

    #[test]
    fn test_find_empty_query() {
        let (buffer, _) = buffer_of(&["abc"]);
        assert_eq!(buffer.find(&[], 0), None);
    }
}
