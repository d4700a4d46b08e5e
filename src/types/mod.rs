mod error;
mod fragdirective;
mod kind;
mod options;
mod range;
mod status;
mod textdirective;

pub use error::*;
pub use fragdirective::*;
pub use kind::*;
pub use options::*;
pub use range::*;
pub use status::*;
pub use textdirective::*;
