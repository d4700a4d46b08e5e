/// Fragment Directive: the `:~:` part of a URL fragment
use std::collections::HashMap;

use log::{debug, info, warn};

use crate::{
    search::{range_text, TextResolver, WordBoundary},
    tree::HostTree,
    types::{
        error::TextFragmentError,
        status::{FragmentDirectiveError, FragmentDirectiveStatus, TextDirectiveStatus},
        textdirective::{TextDirective, TEXT_DIRECTIVE_DELIMITER},
    },
};

/// Delimiter separating the ordinary fragment from the fragment directive
pub const FRAGMENT_DIRECTIVE_DELIMITER: &str = ":~:";

/// Directive separator
const DIRECTIVE_SEPARATOR: char = '&';

/// Text directives of a fragment directive, in input order
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct FragmentDirective {
    text_directives: Vec<TextDirective>,
    /// `text=` tokens that failed to parse, with their raw text
    rejected: Vec<(String, TextFragmentError)>,
}

impl FragmentDirective {
    /// Parse a raw fragment directive (the part after `:~:`).
    ///
    /// Tokens that are not text directives are ignored; malformed text
    /// directives are logged and kept aside in [`FragmentDirective::rejected`].
    pub fn parse(raw_directive: &str) -> Self {
        let mut fragment_directive = Self::default();

        for token in raw_directive.split(DIRECTIVE_SEPARATOR) {
            if !token.starts_with(TEXT_DIRECTIVE_DELIMITER) {
                debug!("ignoring directive {token:?}");
                continue;
            }
            match TextDirective::from_fragment_as_str(token) {
                Ok(text_directive) => fragment_directive.text_directives.push(text_directive),
                Err(e) => {
                    warn!("skipping text directive {token:?}: {e}");
                    fragment_directive.rejected.push((token.to_owned(), e));
                }
            }
        }

        fragment_directive
    }

    /// Extract the Fragment Directive from a URL fragment string
    /// (e.g. `section:~:text=foo&text=bar`).
    ///
    /// Returns `None` if the fragment has no fragment directive delimiter.
    pub fn from_fragment_as_str(fragment: &str) -> Option<FragmentDirective> {
        let Some(offset) = fragment.find(FRAGMENT_DIRECTIVE_DELIMITER) else {
            debug!("{}", TextFragmentError::FragmentDirectiveDelimiterMissing);
            return None;
        };
        Some(Self::parse(
            &fragment[offset + FRAGMENT_DIRECTIVE_DELIMITER.len()..],
        ))
    }

    pub fn text_directives(&self) -> &[TextDirective] {
        &self.text_directives
    }

    pub fn rejected(&self) -> &[(String, TextFragmentError)] {
        &self.rejected
    }

    /// Check the presence of every text directive in `tree`
    ///
    /// # Errors
    ///
    /// - `FragmentDirectiveError::DirectiveProcessingError`, if there is no text directive to check
    /// - `FragmentDirectiveError::NotFoundError`, if none of the text directives matched
    /// - `FragmentDirectiveError::PartialOk`, if only some matched - holds the status per directive
    pub fn check<T: HostTree>(
        &self,
        tree: &T,
    ) -> Result<FragmentDirectiveStatus, FragmentDirectiveError> {
        self.check_with(&TextResolver::new(tree))
    }

    /// Like [`FragmentDirective::check`], with a configured resolver
    ///
    /// # Errors
    ///
    /// See [`FragmentDirective::check`].
    pub fn check_with<T: HostTree, W: WordBoundary>(
        &self,
        resolver: &TextResolver<'_, T, W>,
    ) -> Result<FragmentDirectiveStatus, FragmentDirectiveError> {
        if self.text_directives.is_empty() && self.rejected.is_empty() {
            return Err(FragmentDirectiveError::DirectiveProcessingError);
        }

        let mut statuses = HashMap::new();
        for (raw, e) in &self.rejected {
            statuses.insert(raw.clone(), TextDirectiveStatus::Invalid(e.clone()));
        }
        for directive in &self.text_directives {
            let status = match resolver.resolve_or_skip(directive) {
                Some(range) => TextDirectiveStatus::Found(range_text(resolver.tree(), &range)),
                None => TextDirectiveStatus::NotFound,
            };
            info!("{}: {status}", directive.raw_directive());
            statuses.insert(directive.raw_directive().to_owned(), status);
        }

        let found_count = statuses.values().filter(|s| s.is_found()).count();
        if found_count == statuses.len() {
            Ok(FragmentDirectiveStatus::Ok)
        } else if found_count == 0 {
            Err(FragmentDirectiveError::NotFoundError)
        } else {
            Err(FragmentDirectiveError::PartialOk(statuses))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dom::html::parse_html;

    const TEST_FRAGMENT: &str = ":~:text=prefix-,start,end,-suffix&text=start,-suffix%2Dwith%2Ddashes&unknown_directive&text=prefix%2Donly-";

    const HTML_INPUT: &str = "
    <html>
    <body>
        <p>This is a paragraph with some inline <code>https://example.com</code> and a normal <a style=\"display:none;\" href=\"https://example.org\">secret</a></p>
        <ul>
        <li>one</li>
        <li>two</li>
        <li>three</li>
        </ul>
        <p>and some more text here</p>
    </body>
    </html>
    ";

    #[test]
    fn test_fragment_directive_from_fragment() {
        let fd = FragmentDirective::from_fragment_as_str(TEST_FRAGMENT).unwrap();
        let res = fd.text_directives();
        assert_eq!(res.len(), 2);

        assert_eq!(res[0].prefix(), Some("prefix"));
        assert_eq!(res[0].start(), "start");
        assert_eq!(res[0].end(), Some("end"));
        assert_eq!(res[0].suffix(), Some("suffix"));

        assert_eq!(res[1].prefix(), None);
        assert_eq!(res[1].start(), "start");
        assert_eq!(res[1].suffix(), Some("suffix-with-dashes"));

        // `text=prefix%2Donly-` is a lone prefix
        assert_eq!(
            fd.rejected(),
            &[(
                "text=prefix%2Donly-".to_string(),
                TextFragmentError::StartDirectiveMissingError
            )]
        );
    }

    #[test]
    fn test_missing_delimiter() {
        assert_eq!(FragmentDirective::from_fragment_as_str("text=start"), None);
        assert!(FragmentDirective::from_fragment_as_str("section:~:")
            .unwrap()
            .text_directives()
            .is_empty());
    }

    #[test]
    fn test_multiple_directives() {
        let fd =
            FragmentDirective::from_fragment_as_str(":~:text=par-,agraph&text=and-,some,text")
                .unwrap();
        assert_eq!(fd.text_directives().len(), 2);

        let doc = parse_html(HTML_INPUT);
        assert_eq!(fd.check(&doc), Ok(FragmentDirectiveStatus::Ok));
    }

    #[test]
    fn test_partial_success() {
        let fd = FragmentDirective::parse("text=a-,paragraph,inline&text=and-,some,txt");
        let doc = parse_html(HTML_INPUT);

        let Err(FragmentDirectiveError::PartialOk(statuses)) = fd.check(&doc) else {
            panic!("expected a partial match");
        };
        assert_eq!(statuses.len(), 2);
        assert_eq!(
            statuses["text=a-,paragraph,inline"],
            TextDirectiveStatus::Found("paragraph with some inline".to_string())
        );
        assert_eq!(statuses["text=and-,some,txt"], TextDirectiveStatus::NotFound);
    }

    #[test]
    fn test_hidden_text_not_found() {
        let fd = FragmentDirective::parse("text=secret");
        let doc = parse_html(HTML_INPUT);
        assert_eq!(fd.check(&doc), Err(FragmentDirectiveError::NotFoundError));
    }

    #[test]
    fn test_invalid_directive_status() {
        let fd = FragmentDirective::parse("text=two&text=a,b,c,d,e");
        let doc = parse_html(HTML_INPUT);

        let Err(FragmentDirectiveError::PartialOk(statuses)) = fd.check(&doc) else {
            panic!("expected a partial match");
        };
        assert_eq!(statuses["text=two"], TextDirectiveStatus::Found("two".to_string()));
        assert_eq!(
            statuses["text=a,b,c,d,e"],
            TextDirectiveStatus::Invalid(TextFragmentError::InvalidTokenCount(5))
        );
    }

    #[test]
    fn test_nothing_to_check() {
        let fd = FragmentDirective::parse("unknown_directive");
        let doc = parse_html(HTML_INPUT);
        assert_eq!(
            fd.check(&doc),
            Err(FragmentDirectiveError::DirectiveProcessingError)
        );
    }
}
