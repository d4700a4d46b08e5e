//! Build a [`Document`] from HTML with the html5ever tokenizer
//!
//! This is not a conforming HTML tree builder: it keeps a stack of open
//! elements and applies the handful of implied end tags that matter for
//! text layout (paragraphs, list items, table cells). That is enough to
//! resolve text directives against real pages.
use std::cell::RefCell;

use html5ever::tokenizer::{
    states::RawKind, BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts,
};
use log::trace;

use super::{Document, NodeId};
use crate::tree::HostTree;

/// Elements without content; they never stay on the open element stack
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose start tag closes an open `p`
const CLOSES_PARAGRAPH: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "details",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "ul",
];

/// Start tags that close an open element of the same group, up to the
/// element delimiting the group's scope
const IMPLIED_END_GROUPS: &[(&[&str], &[&str])] = &[
    (&["li"], &["ul", "ol", "menu"]),
    (&["dt", "dd"], &["dl"]),
    (&["td", "th"], &["tr", "table"]),
    (&["tr"], &["table", "thead", "tbody", "tfoot"]),
    (&["option"], &["select", "datalist"]),
];

/// Tokenizer sink building a [`Document`]
struct DocumentBuilder {
    document: RefCell<Document>,
    /// Open elements, innermost last
    open_elements: RefCell<Vec<NodeId>>,
    /// Text node the current character run is appended to
    pending_text: RefCell<Option<NodeId>>,
}

impl DocumentBuilder {
    fn new() -> Self {
        Self {
            document: RefCell::new(Document::new()),
            open_elements: RefCell::new(Vec::new()),
            pending_text: RefCell::new(None),
        }
    }

    fn current_parent(&self) -> NodeId {
        self.open_elements
            .borrow()
            .last()
            .copied()
            .unwrap_or_else(|| self.document.borrow().document())
    }

    fn open_names(&self) -> Vec<String> {
        let document = self.document.borrow();
        self.open_elements
            .borrow()
            .iter()
            .map(|id| document.element_name(*id).unwrap_or_default().to_owned())
            .collect()
    }

    /// Pop the open elements down to (and including) the innermost `name`
    /// found before any of `boundaries`
    fn close_element(&self, names: &[&str], boundaries: &[&str]) -> bool {
        let open = self.open_names();
        let position = open
            .iter()
            .rposition(|n| names.contains(&n.as_str()) || boundaries.contains(&n.as_str()));

        match position {
            Some(index) if names.contains(&open[index].as_str()) => {
                self.open_elements.borrow_mut().truncate(index);
                true
            }
            _ => false,
        }
    }

    fn append_text(&self, text: &str) {
        let mut pending = self.pending_text.borrow_mut();
        let mut document = self.document.borrow_mut();
        let current = *pending;
        match current {
            Some(node) => document.push_text(node, text),
            None => {
                let parent = self
                    .open_elements
                    .borrow()
                    .last()
                    .copied()
                    .unwrap_or_else(|| document.document());
                *pending = Some(document.append_text(parent, text));
            }
        }
    }

    fn start_tag(&self, name: &str, attributes: Vec<(String, String)>, self_closing: bool) {
        if CLOSES_PARAGRAPH.contains(&name) {
            self.close_element(&["p"], &["button", "table"]);
        }
        for (group, scope) in IMPLIED_END_GROUPS {
            if group.contains(&name) {
                self.close_element(group, scope);
            }
        }

        let parent = self.current_parent();
        let element = {
            let mut document = self.document.borrow_mut();
            let element = document.append_element(parent, name);
            for (attribute, value) in &attributes {
                document.set_attribute(element, attribute, value);
            }
            element
        };

        if !VOID_ELEMENTS.contains(&name) && !self_closing {
            self.open_elements.borrow_mut().push(element);
        }
    }

    fn end_tag(&self, name: &str) {
        if !self.close_element(&[name], &[]) {
            trace!("ignoring unmatched end tag </{name}>");
        }
    }

    fn take_document(&self) -> Document {
        self.document.take()
    }
}

impl TokenSink for DocumentBuilder {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<Self::Handle> {
        if !matches!(token, Token::CharacterTokens(_) | Token::NullCharacterToken) {
            *self.pending_text.borrow_mut() = None;
        }

        match token {
            Token::CharacterTokens(text) => self.append_text(&text),
            Token::NullCharacterToken => self.append_text("\u{fffd}"),
            Token::TagToken(tag) => {
                let name = tag.name.to_string();
                match tag.kind {
                    TagKind::StartTag => {
                        let attributes = tag
                            .attrs
                            .iter()
                            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                            .collect();
                        self.start_tag(&name, attributes, tag.self_closing);

                        match name.as_str() {
                            "script" => return TokenSinkResult::RawData(RawKind::ScriptData),
                            "style" | "iframe" | "noembed" | "noframes" | "xmp" => {
                                return TokenSinkResult::RawData(RawKind::Rawtext)
                            }
                            "textarea" | "title" => {
                                return TokenSinkResult::RawData(RawKind::Rcdata)
                            }
                            _ => {}
                        }
                    }
                    TagKind::EndTag => self.end_tag(&name),
                }
            }
            Token::CommentToken(text) => {
                let parent = self.current_parent();
                let mut document = self.document.borrow_mut();
                let comment = document.create_comment(&text);
                document.append_child(parent, comment);
            }
            Token::DoctypeToken(doctype) => {
                let mut document = self.document.borrow_mut();
                let name = doctype.name.as_deref().unwrap_or_default();
                let node = document.create_doctype(name);
                let root = document.document();
                document.append_child(root, node);
            }
            Token::ParseError(e) => trace!("html parse error: {e}"),
            Token::EOFToken => {}
        }

        TokenSinkResult::Continue
    }
}

/// Parse an HTML string into a [`Document`]
///
/// The `lang` attribute of the root `html` element, if any, becomes the
/// document's default language.
pub fn parse_html(input: &str) -> Document {
    let tokenizer = Tokenizer::new(DocumentBuilder::new(), TokenizerOpts::default());

    let queue = BufferQueue::default();
    queue.push_back(input.into());
    let _ = tokenizer.feed(&queue);
    tokenizer.end();

    let mut document = tokenizer.sink.take_document();
    if let Some(language) = document
        .find_element("html")
        .and_then(|html| document.attribute(html, "lang"))
        .map(str::to_owned)
    {
        document.set_default_language(&language);
    }
    document
}
