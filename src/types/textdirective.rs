/// Text Directive struct and its grammar
use percent_encoding::percent_decode_str;

use crate::types::{error::TextFragmentError, kind::TextDirectiveKind};

/// Text Directive represents the range of text in the web-page for highlighting to the user
/// with the syntax
///     text=[prefix-,]start[,end][,-suffix]
/// *start* is required with the other three terms optional.
/// None of the items may be the empty string - an absent item is `None`.
/// *start* with *end* constitutes a text range
/// *prefix* and *suffix* are contextual terms and they are not part of the matched range
///
/// NOTE: directives are percent-encoded by the caller
/// Text Directive holds percent-decoded items
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextDirective {
    /// Prefix directive - a contextual term that must appear immediately before *start*
    /// (whitespace aside), written with a trailing hyphen (-)
    /// OPTIONAL
    prefix: Option<String>,
    /// Start directive - if only start is given, the first instance of *start* is the target
    /// MANDATORY
    start: String,
    /// End directive - the target range runs from *start* to the first instance
    /// of *end* after it
    /// OPTIONAL
    end: Option<String>,
    /// Suffix directive - a contextual term that must appear immediately after the
    /// target, written with a leading hyphen (-)
    /// OPTIONAL
    suffix: Option<String>,
    /// Text Directive fragment source (for reporting)
    raw_directive: String,
}

pub const TEXT_DIRECTIVE_DELIMITER: &str = "text=";

impl TextDirective {
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn start(&self) -> &str {
        self.start.as_str()
    }

    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// The item of the given kind, if present
    pub fn item(&self, kind: TextDirectiveKind) -> Option<&str> {
        match kind {
            TextDirectiveKind::Prefix => self.prefix(),
            TextDirectiveKind::Start => Some(self.start()),
            TextDirectiveKind::End => self.end(),
            TextDirectiveKind::Suffix => self.suffix(),
        }
    }

    pub fn raw_directive(&self) -> &str {
        self.raw_directive.as_str()
    }

    /// The first item the resolver searches for
    pub fn search_kind(&self) -> TextDirectiveKind {
        if self.prefix.is_some() {
            TextDirectiveKind::Prefix
        } else {
            TextDirectiveKind::Start
        }
    }
}

/// Text Directive construction and validation
impl TextDirective {
    /// Percent decode the input string
    /// Returns the decoded string or error
    /// # Errors
    /// - `TextFragmentError::PercentDecodeError`, if the decoded bytes are not UTF-8
    fn percent_decode(input: &str) -> Result<String, TextFragmentError> {
        let decode = percent_decode_str(input).decode_utf8();

        match decode {
            Ok(decode) => Ok(decode.to_string()),
            Err(e) => Err(TextFragmentError::PercentDecodeError(e.to_string())),
        }
    }

    fn decode_item(input: &str, kind: TextDirectiveKind) -> Result<String, TextFragmentError> {
        let decoded = TextDirective::percent_decode(input)?;
        if decoded.is_empty() {
            return Err(TextFragmentError::EmptyDirectiveItem(kind));
        }
        Ok(decoded)
    }

    /// Extract `TextDirective` from a single `text=` token
    ///
    /// The items are split on `,` before percent-decoding, so encoded
    /// commas and hyphens (`%2C`, `%2D`) are literal text.
    ///
    /// # Errors
    /// - `TextFragmentError::NotTextDirective`, if the token does not start with `text=`
    /// - `TextFragmentError::InvalidTokenCount`, for fewer than 1 or more than 4 items
    /// - `TextFragmentError::EmptyToken`, if any item is empty
    /// - `TextFragmentError::StartDirectiveMissingError`, if only prefix and/or suffix remain
    /// - `TextFragmentError::EmptyDirectiveItem`, if an item decodes to the empty string
    /// - `TextFragmentError::PercentDecodeError`, if the percent decode fails for an item
    pub fn from_fragment_as_str(fragment: &str) -> Result<TextDirective, TextFragmentError> {
        let Some(value) = fragment.strip_prefix(TEXT_DIRECTIVE_DELIMITER) else {
            return Err(TextFragmentError::NotTextDirective);
        };

        let mut tokens: Vec<&str> = value.split(',').collect();
        if tokens.is_empty() || tokens.len() > 4 {
            return Err(TextFragmentError::InvalidTokenCount(tokens.len()));
        }
        if tokens.iter().any(|token| token.is_empty()) {
            return Err(TextFragmentError::EmptyToken);
        }

        let mut prefix = None;
        if let Some(potential_prefix) = tokens.first().and_then(|t| t.strip_suffix('-')) {
            prefix = Some(TextDirective::decode_item(
                potential_prefix,
                TextDirectiveKind::Prefix,
            )?);
            tokens.remove(0);
        }

        let mut suffix = None;
        if let Some(potential_suffix) = tokens.last().and_then(|t| t.strip_prefix('-')) {
            suffix = Some(TextDirective::decode_item(
                potential_suffix,
                TextDirectiveKind::Suffix,
            )?);
            tokens.pop();
        }

        let (start, end) = match tokens.as_slice() {
            [] => return Err(TextFragmentError::StartDirectiveMissingError),
            [start] => (TextDirective::decode_item(start, TextDirectiveKind::Start)?, None),
            [start, end] => (
                TextDirective::decode_item(start, TextDirectiveKind::Start)?,
                Some(TextDirective::decode_item(end, TextDirectiveKind::End)?),
            ),
            _ => return Err(TextFragmentError::InvalidTokenCount(tokens.len())),
        };

        Ok(TextDirective {
            prefix,
            start,
            end,
            suffix,
            raw_directive: fragment.to_owned(),
        })
    }
}
