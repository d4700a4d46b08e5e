//! Text directive → range resolution
//!
//! A directive is resolved with an owned scan cursor (`search_range`) whose
//! start only ever moves forward. Every retry of the outer loop advances the
//! cursor by at least one position, so the loop is bounded by the size of
//! the document.
use log::{debug, error};

use super::{
    boundary::{AlphanumericBoundary, WordBoundary},
    find::AnchoredMatch,
};
use crate::{
    tree::{
        classify::{is_non_searchable_subtree, is_visible_text_node},
        walk::{document_extent, next_node},
        HostTree,
    },
    types::{
        BoundaryPoint, FragmentDirective, Range, ResolveError, ResolverOptions, TextDirective,
        TextDirectiveKind,
    },
};

/// The literal entity text skipped as whitespace, terminated and unterminated
const NBSP_ENTITY: &str = "&nbsp;";
const NBSP_ENTITY_UNTERMINATED: &str = "&nbsp";

/// Resolves text directives against one content tree
///
/// The resolver borrows the tree for its whole lifetime; the tree must not
/// change while the resolver is in use.
#[derive(Debug, Clone)]
pub struct TextResolver<'t, T: HostTree, W: WordBoundary = AlphanumericBoundary> {
    pub(super) tree: &'t T,
    pub(super) oracle: W,
    options: ResolverOptions,
}

impl<'t, T: HostTree> TextResolver<'t, T> {
    /// Resolver with the alphanumeric word-boundary oracle and default options
    pub fn new(tree: &'t T) -> Self {
        Self::with_oracle(tree, AlphanumericBoundary)
    }
}

impl<'t, T: HostTree, W: WordBoundary> TextResolver<'t, T, W> {
    pub fn with_oracle(tree: &'t T, oracle: W) -> Self {
        Self {
            tree,
            oracle,
            options: ResolverOptions::default(),
        }
    }

    #[must_use]
    pub fn options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn tree(&self) -> &'t T {
        self.tree
    }

    /// Resolve every text directive of a raw fragment directive string
    /// (`text=...&text=...`, without the `:~:` delimiter).
    ///
    /// Malformed and unmatched directives are skipped; the matches are
    /// returned in directive order.
    pub fn process_fragment_directive(&self, raw_directive: &str) -> Vec<Range<T::Node>> {
        self.process(&FragmentDirective::parse(raw_directive))
    }

    /// Resolve the text directives of an already parsed fragment directive
    pub fn process(&self, fragment_directive: &FragmentDirective) -> Vec<Range<T::Node>> {
        fragment_directive
            .text_directives()
            .iter()
            .filter_map(|directive| self.resolve_or_skip(directive))
            .collect()
    }

    /// Resolve one directive, logging and discarding resolver failures
    pub(crate) fn resolve_or_skip(&self, directive: &TextDirective) -> Option<Range<T::Node>> {
        match self.find_range_from_text_directive(directive) {
            Ok(found) => {
                if found.is_none() {
                    debug!("no match for {}", directive.raw_directive());
                }
                found
            }
            Err(e) => {
                error!("failed to resolve {}: {e}", directive.raw_directive());
                None
            }
        }
    }

    /// Find the range of the document matched by `directive`.
    ///
    /// Returns `Ok(None)` when no occurrence satisfies the directive.
    ///
    /// # Errors
    ///
    /// - `ResolveError::IterationLimit`, if the backtracking loop exceeds its bound
    /// - `ResolveError::UnboundedTraversal`, if the tree ends where a next node must exist
    /// - `ResolveError::IndexSize`, on an out-of-range text offset
    pub fn find_range_from_text_directive(
        &self,
        directive: &TextDirective,
    ) -> Result<Option<Range<T::Node>>, ResolveError> {
        let tree = self.tree;
        let mut search_range = Range::select_node_contents(tree, tree.root());
        let limit = self
            .options
            .max_iterations
            .unwrap_or_else(|| document_extent(tree) + 1);

        // `textStart` must end on a word boundary unless a suffix directly follows it
        let start_end_bounded = directive.end().is_some() || directive.suffix().is_none();

        // Occurrences already seen ahead of the cursor; a retry whose
        // candidate lies before one of them only looks at its own segment
        let mut known_start = None;
        let mut known_suffix = None;

        debug!(
            "resolving {}, searching {} first",
            directive.raw_directive(),
            directive.search_kind()
        );

        let mut iterations = 0;
        while !search_range.is_collapsed(tree) {
            iterations += 1;
            if iterations > limit {
                return Err(ResolveError::IterationLimit(limit));
            }

            let mut potential_match = if let Some(prefix) = directive.prefix() {
                debug!("searching {} {prefix:?}", TextDirectiveKind::Prefix);
                let Some(prefix_match) =
                    self.find_string_in_range(prefix, &search_range, true, false)?
                else {
                    return Ok(None);
                };

                self.advance_range_start_past_offset(&mut search_range, prefix_match.start)?;

                let mut match_range = Range::new(prefix_match.end, search_range.end);
                self.advance_range_start_to_non_whitespace(&mut match_range)?;
                if match_range.is_collapsed(tree) {
                    return Ok(None);
                }

                debug!("searching {} {:?}", TextDirectiveKind::Start, directive.start());
                match self.find_anchored(
                    directive.start(),
                    &match_range,
                    start_end_bounded,
                    &mut known_start,
                )? {
                    AnchoredMatch::At(start_match) => start_match,
                    AnchoredMatch::Elsewhere => {
                        debug!("prefix is not directly followed by start, retrying");
                        continue;
                    }
                    AnchoredMatch::Nowhere => return Ok(None),
                }
            } else {
                debug!("searching {} {:?}", TextDirectiveKind::Start, directive.start());
                let Some(start_match) = self.find_string_in_range(
                    directive.start(),
                    &search_range,
                    true,
                    start_end_bounded,
                )?
                else {
                    return Ok(None);
                };

                self.advance_range_start_past_offset(&mut search_range, start_match.start)?;
                start_match
            };

            if let Some(end) = directive.end() {
                debug!("searching {} {end:?}", TextDirectiveKind::End);
                let end_range = Range::new(potential_match.end, search_range.end);
                let Some(end_match) = self.find_string_in_range(
                    end,
                    &end_range,
                    true,
                    directive.suffix().is_none(),
                )?
                else {
                    return Ok(None);
                };
                potential_match.end = end_match.end;
            }

            let Some(suffix) = directive.suffix() else {
                return Ok(Some(potential_match));
            };

            debug!("searching {} {suffix:?}", TextDirectiveKind::Suffix);
            let mut suffix_range = Range::new(potential_match.end, search_range.end);
            self.advance_range_start_to_non_whitespace(&mut suffix_range)?;
            if suffix_range.is_collapsed(tree) {
                return Ok(None);
            }

            match self.find_anchored(suffix, &suffix_range, true, &mut known_suffix)? {
                AnchoredMatch::At(_) => return Ok(Some(potential_match)),
                AnchoredMatch::Elsewhere => {
                    debug!("suffix does not directly follow the match, retrying");
                }
                AnchoredMatch::Nowhere => return Ok(None),
            }
        }

        Ok(None)
    }

    /// Move the start of `range` one position past `point`: the next char of
    /// a text node, else the start of the next node in tree order.
    fn advance_range_start_past_offset(
        &self,
        range: &mut Range<T::Node>,
        point: BoundaryPoint<T::Node>,
    ) -> Result<(), ResolveError> {
        let tree = self.tree;
        let next = if point.offset < tree.length(point.node) {
            BoundaryPoint::new(point.node, point.offset + 1)
        } else {
            let node = next_node(tree, point.node).ok_or(ResolveError::UnboundedTraversal(
                "advancing past a match start",
            ))?;
            BoundaryPoint::new(node, 0)
        };
        range.set_start(tree, next);
        Ok(())
    }

    /// Move the start of `range` to the next non-whitespace position of
    /// visible, searchable text. The range collapses when there is none.
    pub(crate) fn advance_range_start_to_non_whitespace(
        &self,
        range: &mut Range<T::Node>,
    ) -> Result<(), ResolveError> {
        let tree = self.tree;
        while !range.is_collapsed(tree) {
            let BoundaryPoint { node, offset } = range.start;

            if is_non_searchable_subtree(tree, node)
                || !is_visible_text_node(tree, node)
                || offset == tree.length(node)
            {
                match next_node(tree, node) {
                    Some(next) => range.set_start(tree, BoundaryPoint::new(next, 0)),
                    None => range.collapse_to_end(),
                }
                continue;
            }

            let skip = if self.options.literal_nbsp_entities
                && tree.substring_data(node, offset, NBSP_ENTITY.len())? == NBSP_ENTITY
            {
                NBSP_ENTITY.len()
            } else if self.options.literal_nbsp_entities
                && tree.substring_data(node, offset, NBSP_ENTITY_UNTERMINATED.len())?
                    == NBSP_ENTITY_UNTERMINATED
            {
                NBSP_ENTITY_UNTERMINATED.len()
            } else {
                let is_whitespace = tree
                    .substring_data(node, offset, 1)?
                    .chars()
                    .next()
                    .is_some_and(char::is_whitespace);
                if !is_whitespace {
                    return Ok(());
                }
                1
            };

            range.set_start(tree, BoundaryPoint::new(node, offset + skip));
        }
        Ok(())
    }
}

/// Find the range matched by `directive` in `tree` with the default resolver
///
/// # Errors
///
/// See [`TextResolver::find_range_from_text_directive`].
pub fn find_range_from_text_directive<T: HostTree>(
    directive: &TextDirective,
    tree: &T,
) -> Result<Option<Range<T::Node>>, ResolveError> {
    TextResolver::new(tree).find_range_from_text_directive(directive)
}

/// Resolve a raw fragment directive string against `tree` with the default
/// resolver; see [`TextResolver::process_fragment_directive`].
pub fn process_fragment_directive<T: HostTree>(raw_directive: &str, tree: &T) -> Vec<Range<T::Node>> {
    TextResolver::new(tree).process_fragment_directive(raw_directive)
}
