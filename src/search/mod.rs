//! Text search over a content tree
mod boundary;
mod buffer;
mod find;
mod resolve;
mod text;

pub use boundary::*;
pub use resolve::{find_range_from_text_directive, process_fragment_directive, TextResolver};
pub use text::range_text;
