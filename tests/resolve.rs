use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use rstest::rstest;
use textfrag_resolve::{
    dom::{html::parse_html, Document, NodeId, ShadowRootMode},
    find_range_from_text_directive, process_fragment_directive, range_text, BoundaryPoint,
    FragmentDirective, HostTree, Range, ResolverOptions, TextDirective, TextFragmentError,
    TextResolver, WordBoundary,
};

const ARTICLE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Lorem ipsum</title>
  <style>p { color: ipsum; }</style>
</head>
<body>
  <h1>Lorem ipsum</h1>
  <p>Lorem ipsum dolor sit amet, consectetur adipiscing elit.</p>
  <p>Sed do eiusmod tempor, ipsum dolor incididunt ut labore.</p>
  <p hidden>Secret ipsum text</p>
  <ul>
    <li>first item</li>
    <li>second <em>emphasised</em> item</li>
  </ul>
  <script>var ipsum = "dolor";</script>
</body>
</html>"#;

fn texts(document: &Document, ranges: &[Range<NodeId>]) -> Vec<String> {
    ranges
        .iter()
        .map(|range| range_text(document, range))
        .collect()
}

#[test]
fn test_parse_all_items() {
    let directive = TextDirective::from_fragment_as_str("text=foo-,bar,baz,-qux").unwrap();
    assert_eq!(directive.prefix(), Some("foo"));
    assert_eq!(directive.start(), "bar");
    assert_eq!(directive.end(), Some("baz"));
    assert_eq!(directive.suffix(), Some("qux"));

    let directive = TextDirective::from_fragment_as_str("text=hello").unwrap();
    assert_eq!(directive.start(), "hello");
    assert_eq!(directive.prefix(), None);
    assert_eq!(directive.end(), None);
    assert_eq!(directive.suffix(), None);
}

#[rstest]
#[case("text=")]
#[case("text=a,b,c,d,e")]
fn test_malformed_directive_is_rejected(#[case] raw: &str) {
    assert!(TextDirective::from_fragment_as_str(raw).is_err());

    let fragment_directive = FragmentDirective::parse(raw);
    assert!(fragment_directive.text_directives().is_empty());
    assert_eq!(fragment_directive.rejected().len(), 1);
}

#[test]
fn test_case_insensitive() {
    let document = parse_html("<p>say hello now</p>");
    let ranges = process_fragment_directive("text=Hello", &document);
    assert_eq!(texts(&document, &ranges), vec!["hello"]);

    let range = ranges[0];
    assert_eq!(range.end.offset - range.start.offset, 5);
}

#[test]
fn test_word_boundaries() {
    let document = parse_html("<p>concatenate</p>");
    assert!(process_fragment_directive("text=cat", &document).is_empty());

    let document = parse_html("<p>the cat sat</p>");
    let ranges = process_fragment_directive("text=cat", &document);
    assert_eq!(texts(&document, &ranges), vec!["cat"]);
    assert_eq!(ranges[0].start.offset, 4);
}

#[test]
fn test_cross_node_match() {
    let mut document = Document::new();
    let p = document.append_element(document.document(), "p");
    let first = document.append_text(p, "Hel");
    let second = document.append_text(p, "lo world");

    let directive = TextDirective::from_fragment_as_str("text=Hello").unwrap();
    let range = find_range_from_text_directive(&directive, &document)
        .unwrap()
        .unwrap();
    assert_eq!(range.start, BoundaryPoint::new(first, 0));
    assert_eq!(range.end, BoundaryPoint::new(second, 2));
}

#[test]
fn test_prefix_disambiguation() {
    let document = parse_html(ARTICLE);
    let tempor = TextDirective::from_fragment_as_str("text=tempor%2C-,ipsum").unwrap();
    let range = find_range_from_text_directive(&tempor, &document)
        .unwrap()
        .unwrap();

    let text = document.text(range.start.node).unwrap();
    assert!(text.starts_with("Sed do eiusmod"));
    assert_eq!(range.start.offset, 23);
    assert_eq!(range_text(&document, &range), "ipsum");
}

#[test]
fn test_suffix_disambiguation() {
    let document = parse_html(ARTICLE);
    let ranges = process_fragment_directive("text=ipsum,-dolor%20incididunt", &document);
    assert_eq!(ranges.len(), 1);

    let text = document.text(ranges[0].start.node).unwrap();
    assert!(text.starts_with("Sed do eiusmod"));
}

#[test]
fn test_first_visible_occurrence_wins() {
    // title, style and script text is never searched
    let document = parse_html(ARTICLE);
    let ranges = process_fragment_directive("text=ipsum", &document);
    assert_eq!(ranges.len(), 1);
    assert_eq!(
        document.element_name(document.parent(ranges[0].start.node).unwrap()),
        Some("h1")
    );
}

#[test]
fn test_hidden_text_is_not_matched() {
    let document = parse_html(ARTICLE);
    assert!(process_fragment_directive("text=Secret", &document).is_empty());
    assert!(process_fragment_directive("text=var", &document).is_empty());
}

#[test]
fn test_range_across_blocks() {
    let document =
        parse_html("<ul><li>first item</li><li>second <em>emphasised</em> item</li></ul>");
    let ranges = process_fragment_directive("text=first,emphasised", &document);
    assert_eq!(texts(&document, &ranges), vec!["first itemsecond emphasised"]);
}

#[test]
fn test_no_match_is_empty() {
    let document = parse_html(ARTICLE);
    let directive = TextDirective::from_fragment_as_str("text=nonexistent").unwrap();
    assert_eq!(find_range_from_text_directive(&directive, &document), Ok(None));
    assert!(process_fragment_directive("text=nonexistent", &document).is_empty());
}

#[test]
fn test_directive_independence_and_order() {
    let document = parse_html(ARTICLE);
    let ranges = process_fragment_directive(
        "text=labore&text=a,b,c,d,e&unknown=1&text=&text=missing&text=amet",
        &document,
    );
    assert_eq!(texts(&document, &ranges), vec!["labore", "amet"]);
}

#[test]
fn test_fragment_with_delimiter() {
    let document = parse_html(ARTICLE);
    let fragment_directive =
        FragmentDirective::from_fragment_as_str("section:~:text=Lorem-,ipsum&text=x,y,z")
            .unwrap();
    assert_eq!(
        fragment_directive.rejected()[0].1,
        TextFragmentError::InvalidTokenCount(3)
    );

    let ranges = TextResolver::new(&document).process(&fragment_directive);
    assert_eq!(texts(&document, &ranges), vec!["ipsum"]);
}

#[test]
fn test_shadow_dom_content_is_found() {
    let mut document = Document::new();
    let root = document.document();
    let host = document.append_element(root, "div");
    let shadow = document.attach_shadow(host, ShadowRootMode::Open);
    let inner = document.append_element(shadow, "p");
    let text = document.append_text(inner, "shadow content");
    let light = document.append_element(host, "p");
    document.append_text(light, "light content");

    let ranges = process_fragment_directive("text=shadow&text=content,-shadow", &document);
    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].start, BoundaryPoint::new(text, 0));

    // the shadow tree precedes the host's light children
    let ranges = process_fragment_directive("text=content", &document);
    assert_eq!(ranges[0].start, BoundaryPoint::new(text, 7));

    let closed_host = document.append_element(root, "div");
    let closed = document.attach_shadow(closed_host, ShadowRootMode::Closed);
    let closed_p = document.append_element(closed, "p");
    document.append_text(closed_p, "encapsulated");
    assert!(process_fragment_directive("text=encapsulated", &document).is_empty());
}

#[test]
fn test_literal_nbsp_entity() {
    let document = parse_html("<p>price&amp;nbsp;100</p>");
    let ranges = process_fragment_directive("text=price-,100", &document);
    assert_eq!(texts(&document, &ranges), vec!["100"]);

    let directive = TextDirective::from_fragment_as_str("text=price-,100").unwrap();
    let options = ResolverOptions::from_toml_str("literal_nbsp_entities = false").unwrap();
    let resolver = TextResolver::new(&document).options(options);
    assert_eq!(resolver.find_range_from_text_directive(&directive), Ok(None));
}

#[test]
fn test_custom_word_boundary() {
    /// Boundaries everywhere: plain substring search
    struct Anywhere;

    impl WordBoundary for Anywhere {
        fn is_word_boundary(&self, _text: &[char], _position: usize, _locale: &str) -> bool {
            true
        }
    }

    let document = parse_html("<p>concatenate</p>");
    let resolver = TextResolver::with_oracle(&document, Anywhere);
    assert_eq!(
        texts(&document, &resolver.process_fragment_directive("text=cat")),
        vec!["cat"]
    );
}

#[test]
fn test_locale_reaches_the_oracle() {
    /// Only accepts matches in Thai text
    struct ThaiOnly;

    impl WordBoundary for ThaiOnly {
        fn is_word_boundary(&self, _text: &[char], _position: usize, locale: &str) -> bool {
            locale == "th"
        }
    }

    let document = parse_html(r#"<p>word</p><p lang="th">word</p>"#);
    let ranges =
        TextResolver::with_oracle(&document, ThaiOnly).process_fragment_directive("text=word");
    assert_eq!(ranges.len(), 1);
    assert_eq!(document.language(ranges[0].start.node), "th");
}

#[rstest]
#[case("text=para-,needle", "needle")]
#[case("text=para,-needle", "para")]
fn test_backtracking_over_many_paragraphs(#[case] raw: &str, #[case] expected: &str) {
    // every paragraph offers a candidate; only the last one is confirmed
    let mut html: String = (0..3000).map(|i| format!("<p>para {i}</p>")).collect();
    html.push_str("<p>para needle here</p>");
    let document = parse_html(&html);

    let started = Instant::now();
    let ranges = process_fragment_directive(raw, &document);
    assert!(
        started.elapsed() < Duration::from_secs(10),
        "resolving {raw} took {:?}",
        started.elapsed()
    );

    assert_eq!(texts(&document, &ranges), vec![expected]);
    let text = document.text(ranges[0].start.node).unwrap();
    assert_eq!(text, "para needle here");
}
