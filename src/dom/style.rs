//! Inline style declarations and per-element default display
use crate::tree::Display;

/// Elements laid out as blocks by default
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "center",
    "details",
    "dialog",
    "dd",
    "div",
    "dl",
    "dt",
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
    "hgroup",
    "hr",
    "html",
    "legend",
    "main",
    "menu",
    "nav",
    "ol",
    "p",
    "pre",
    "search",
    "section",
    "summary",
    "ul",
];

/// Elements that are never rendered
const NONE_ELEMENTS: &[&str] = &[
    "area", "base", "datalist", "head", "link", "meta", "noembed", "noframes", "param", "rp",
    "script", "source", "style", "template", "title", "track",
];

/// Display of an element without author styles
pub(crate) fn default_display(name: &str) -> Display {
    match name {
        "li" => Display::ListItem,
        "table" => Display::Table,
        "thead" | "tbody" | "tfoot" => Display::TableRowGroup,
        "tr" => Display::TableRow,
        "td" | "th" => Display::TableCell,
        "caption" => Display::TableCaption,
        "col" | "colgroup" => Display::Other,
        _ if BLOCK_ELEMENTS.contains(&name) => Display::Block,
        _ if NONE_ELEMENTS.contains(&name) => Display::None,
        _ => Display::Inline,
    }
}

/// Value of `property` in an inline `style` attribute.
/// The last declaration wins; `!important` is dropped.
pub(crate) fn declaration<'a>(style: &'a str, property: &str) -> Option<&'a str> {
    style
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case(property))
        .map(|(_, value)| {
            let value = value.trim();
            value.strip_suffix("!important").map_or(value, str::trim_end)
        })
        .last()
}
