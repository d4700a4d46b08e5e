//! Word-bounded, case-insensitive search of a string inside a range
use std::cmp::Ordering;

use log::trace;

use super::{buffer::TextBuffer, boundary::WordBoundary, TextResolver};
use crate::{
    tree::{
        classify::{
            is_block_level, is_non_searchable_subtree, is_search_invisible, is_visible_text_node,
            nearest_block_ancestor,
        },
        walk::{
            boundary_key, compare_boundary_points, is_shadow_including_descendant, next_node,
            next_node_not_descendant, next_node_skipping_doctype,
        },
        HostTree,
    },
    types::{BoundaryPoint, Range, ResolveError},
    utils::{fold_query, QueryUnit},
};

/// Outcome of searching for text that must start exactly at a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AnchoredMatch<N> {
    /// The text starts at the cursor
    At(Range<N>),
    /// The text occurs in the range, but not at the cursor
    Elsewhere,
    /// The text occurs nowhere in the range
    Nowhere,
}

impl<T: HostTree, W: WordBoundary> TextResolver<'_, T, W> {
    /// Find the first occurrence of `query` within `search_range`.
    ///
    /// The range is scanned one block segment at a time: the visible text
    /// nodes sharing a block ancestor are concatenated and searched
    /// case-insensitively. With `word_start_bounded` / `word_end_bounded`
    /// the occurrence must start / end on a word boundary; a candidate that
    /// fails the check is retried one char later within the same segment.
    ///
    /// # Errors
    ///
    /// `ResolveError` only on internal bookkeeping failures.
    pub fn find_string_in_range(
        &self,
        query: &str,
        search_range: &Range<T::Node>,
        word_start_bounded: bool,
        word_end_bounded: bool,
    ) -> Result<Option<Range<T::Node>>, ResolveError> {
        self.find_string(
            query,
            search_range,
            word_start_bounded,
            word_end_bounded,
            false,
        )
    }

    /// Find `query` starting exactly at the start of `range`, which must be
    /// a text position.
    ///
    /// `known` is the start of an occurrence found by an earlier call over a
    /// range with the same end. While the cursor has not passed it, the text
    /// is known to occur in the range, so only the segment holding the cursor
    /// is searched. Otherwise the whole range is scanned and `known` is
    /// updated.
    pub(super) fn find_anchored(
        &self,
        query: &str,
        range: &Range<T::Node>,
        word_end_bounded: bool,
        known: &mut Option<BoundaryPoint<T::Node>>,
    ) -> Result<AnchoredMatch<T::Node>, ResolveError> {
        let reachable = known.is_some_and(|occurrence| {
            compare_boundary_points(self.tree, &range.start, &occurrence) != Ordering::Greater
        });

        let found = self.find_string(query, range, false, word_end_bounded, reachable)?;
        match found {
            Some(found) if found.start == range.start => Ok(AnchoredMatch::At(found)),
            Some(found) => {
                *known = Some(found.start);
                Ok(AnchoredMatch::Elsewhere)
            }
            None if reachable => Ok(AnchoredMatch::Elsewhere),
            None => Ok(AnchoredMatch::Nowhere),
        }
    }

    /// Scan `search_range` segment by segment; with `first_segment_only` the
    /// scan stops after the first segment holding visible text
    fn find_string(
        &self,
        query: &str,
        search_range: &Range<T::Node>,
        word_start_bounded: bool,
        word_end_bounded: bool,
        first_segment_only: bool,
    ) -> Result<Option<Range<T::Node>>, ResolveError> {
        let tree = self.tree;
        let query = fold_query(query);
        if query.is_empty() {
            return Ok(None);
        }

        let end_key = boundary_key(tree, &search_range.end);
        let mut search_range = *search_range;
        while !search_range.is_collapsed(tree) {
            let cur_node = search_range.start.node;

            if is_non_searchable_subtree(tree, cur_node) {
                match next_node_not_descendant(tree, cur_node) {
                    Some(next) => search_range.start = BoundaryPoint::new(next, 0),
                    None => break,
                }
                continue;
            }

            if !is_visible_text_node(tree, cur_node) {
                match next_node_skipping_doctype(tree, cur_node) {
                    Some(next) => search_range.start = BoundaryPoint::new(next, 0),
                    None => break,
                }
                continue;
            }

            let (buffer, next) = self.collect_block_text(cur_node, &end_key);
            if let Some(found) = self.find_range_from_node_list(
                &query,
                &search_range,
                &buffer,
                word_start_bounded,
                word_end_bounded,
            )? {
                return Ok(Some(found));
            }

            match next {
                Some(next) if !first_segment_only => {
                    search_range.start = BoundaryPoint::new(next, 0);
                }
                _ => break,
            }
        }

        Ok(None)
    }

    /// Collect the visible text nodes of `start`'s block segment, stopping at
    /// a nested block, at the end of the block ancestor or past the range end
    /// whose key is `end_key`.
    ///
    /// Returns the buffer and the node the scan stopped at.
    fn collect_block_text(
        &self,
        start: T::Node,
        end_key: &[i64],
    ) -> (TextBuffer<T::Node>, Option<T::Node>) {
        let tree = self.tree;
        let block_ancestor = nearest_block_ancestor(tree, start);
        let mut buffer = TextBuffer::new();

        let mut cur_node = Some(start);
        while let Some(node) = cur_node {
            if !is_shadow_including_descendant(tree, node, block_ancestor)
                || boundary_key(tree, &BoundaryPoint::new(node, 0)).as_slice() > end_key
            {
                break;
            }
            if is_block_level(tree, node) {
                break;
            }
            if is_search_invisible(tree, node) {
                cur_node = next_node_not_descendant(tree, node);
                continue;
            }
            if is_visible_text_node(tree, node) {
                buffer.push(tree, node);
            }
            cur_node = next_node(tree, node);
        }

        (buffer, cur_node)
    }

    /// Search the concatenated text of one segment, honoring the start
    /// offset and the end inset of `search_range`
    fn find_range_from_node_list(
        &self,
        query: &[QueryUnit],
        search_range: &Range<T::Node>,
        buffer: &TextBuffer<T::Node>,
        word_start_bounded: bool,
        word_end_bounded: bool,
    ) -> Result<Option<Range<T::Node>>, ResolveError> {
        let tree = self.tree;
        if buffer.is_empty() {
            return Ok(None);
        }

        let mut search_start = 0;
        if buffer.first_node() == Some(search_range.start.node) {
            search_start = search_range.start.offset;
        }

        let (match_index, end_index, start, end) = loop {
            let Some((match_index, end_index)) = buffer.find(query, search_start) else {
                return Ok(None);
            };

            let start = buffer.boundary_point_at(match_index, false).ok_or(
                ResolveError::IndexSize {
                    offset: match_index,
                    length: buffer.len(),
                },
            )?;
            let end = buffer
                .boundary_point_at(end_index, true)
                .ok_or(ResolveError::IndexSize {
                    offset: end_index,
                    length: buffer.len(),
                })?;

            let text = buffer.content();
            let start_locale = tree.language(start.node);
            let end_locale = tree.language(end.node);
            let bounded = match (word_start_bounded, word_end_bounded) {
                (true, true) => self.oracle.is_word_bounded(
                    text,
                    match_index,
                    end_index - match_index,
                    start_locale,
                    end_locale,
                ),
                (true, false) => self.oracle.is_word_boundary(text, match_index, start_locale),
                (false, true) => self.oracle.is_word_boundary(text, end_index, end_locale),
                (false, false) => true,
            };

            if bounded {
                break (match_index, end_index, start, end);
            }

            trace!("candidate at {match_index}..{end_index} is not word bounded, retrying");
            search_start = match_index + 1;
        };

        let mut end_inset = 0;
        if buffer.last_node() == Some(search_range.end.node) {
            end_inset = tree
                .length(search_range.end.node)
                .saturating_sub(search_range.end.offset);
        }
        if end_index > buffer.len().saturating_sub(end_inset) {
            return Ok(None);
        }

        trace!("matched buffer range {match_index}..{end_index}");
        Ok(Some(Range::new(start, end)))
    }
}
