/// Text Fragment Error codes
use thiserror::Error;

use crate::types::TextDirectiveKind;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
/// Grammar failures returned while decoding a single `text=` token
///
/// A failing token is skipped by the directive processor; it never aborts
/// the remaining directives.
pub enum TextFragmentError {
    /// Error indicating the fragment directive delimiter (`:~:`) is missing
    /// in the fragment string
    #[error("Fragment Directive delimiter missing")]
    FragmentDirectiveDelimiterMissing,

    /// Not a text directive error
    #[error("Not a Text Directive")]
    NotTextDirective,

    /// The directive does not split into 1 to 4 comma-separated items
    #[error("Invalid number of text directive items: {0}")]
    InvalidTokenCount(usize),

    /// One of the comma-separated items is empty
    #[error("Empty text directive item")]
    EmptyToken,

    /// Start directive is mandatory - returns this error if it is missing
    #[error("Start directive is missing error")]
    StartDirectiveMissingError,

    /// A prefix, start, end or suffix decoded to the empty string
    #[error("Text directive {0} is empty")]
    EmptyDirectiveItem(TextDirectiveKind),

    /// `TextDirective` is percent encoded - the error is returned if the decoding fails
    #[error("Percent decode error: {0}")]
    PercentDecodeError(String),
}

/// Contract violations inside the resolver
///
/// None of these happen on a well-formed tree; they signal bookkeeping bugs
/// in the engine or a host tree that changed during a resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A substring was requested past the end of a text node
    #[error("Offset {offset} is out of range for a node of length {length}")]
    IndexSize {
        /// Requested offset
        offset: usize,
        /// Length of the node
        length: usize,
    },

    /// The traversal ran off the tree where a next node was required
    #[error("No next node while {0}")]
    UnboundedTraversal(&'static str),

    /// The backtracking search did not converge within the allowed iterations
    #[error("Search did not terminate after {0} iterations")]
    IterationLimit(usize),
}

/// Errors loading [`crate::ResolverOptions`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid TOML for the options
    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
