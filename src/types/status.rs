/// Defines the status of the fragment directive checks
use std::{
    collections::HashMap,
    fmt::{Display, Formatter, Result},
};

use crate::types::error::TextFragmentError;

#[derive(Debug, PartialEq, Eq)]
pub enum FragmentDirectiveStatus {
    /// Every text directive matched
    Ok,
}

impl Display for FragmentDirectiveStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            FragmentDirectiveStatus::Ok => write!(f, "Ok"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum FragmentDirectiveError {
    /// Some text directives matched - check individual text directive status
    /// for more details
    PartialOk(HashMap<String, TextDirectiveStatus>),
    /// None of the text directives matched
    NotFoundError,
    /// The fragment directive holds no text directive to check
    DirectiveProcessingError,
}

impl Display for FragmentDirectiveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            FragmentDirectiveError::PartialOk(m) => write!(f, "Partial Ok {m:?}"),
            FragmentDirectiveError::NotFoundError => write!(f, "No text directive matched"),
            FragmentDirectiveError::DirectiveProcessingError => {
                write!(f, "No text directive to process")
            }
        }
    }
}

impl std::error::Error for FragmentDirectiveError {}

/// Text Directive check status
#[derive(PartialEq, Clone, Eq, Debug)]
pub enum TextDirectiveStatus {
    /// The directive matched; holds the rendered text of the matched range
    Found(String),
    /// No range satisfies the directive
    NotFound,
    /// The directive token could not be parsed
    Invalid(TextFragmentError),
}

impl TextDirectiveStatus {
    pub const fn is_found(&self) -> bool {
        matches!(self, TextDirectiveStatus::Found(_))
    }
}

impl Display for TextDirectiveStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            TextDirectiveStatus::Found(text) => write!(f, "Found: {text:?}"),
            TextDirectiveStatus::NotFound => write!(f, "Not Found"),
            TextDirectiveStatus::Invalid(e) => write!(f, "Invalid: {e}"),
        }
    }
}
