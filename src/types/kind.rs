use std::fmt::{Display, Formatter, Result};

/// The four items of a text directive, in search order
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Hash)]
pub enum TextDirectiveKind {
    /// Prefix
    Prefix,
    /// Start
    #[default]
    Start,
    /// End
    End,
    /// Suffix
    Suffix,
}

impl Display for TextDirectiveKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            TextDirectiveKind::Prefix => write!(f, "prefix"),
            TextDirectiveKind::Start => write!(f, "start"),
            TextDirectiveKind::End => write!(f, "end"),
            TextDirectiveKind::Suffix => write!(f, "suffix"),
        }
    }
}
