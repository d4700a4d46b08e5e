//! `textfrag-resolve` resolves [text fragment] directives
//! (`#:~:text=[prefix-,]start[,end][,-suffix]`) into ranges of a rendered
//! content tree.
//!
//! The engine works against any tree implementing [`HostTree`]; the bundled
//! [`dom::Document`] arena (optionally built from HTML with
//! [`dom::html::parse_html`]) is one such tree.
//!
//! ```
//! use textfrag_resolve::{dom::html::parse_html, process_fragment_directive, range_text};
//!
//! let document = parse_html("<p>The quick brown fox</p>");
//! let ranges = process_fragment_directive("text=quick,fox", &document);
//! assert_eq!(ranges.len(), 1);
//! assert_eq!(range_text(&document, &ranges[0]), "quick brown fox");
//! ```
//!
//! [text fragment]: https://wicg.github.io/scroll-to-text-fragment/
pub mod dom;
mod search;
pub mod tree;
mod types;
mod utils;

pub use search::*;
pub use tree::{Display, HostTree, NodeKind, Visibility};
pub use types::*;
