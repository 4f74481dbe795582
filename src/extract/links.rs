// src/extract/links.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Every <a> with an href is reported once per occurrence. Duplicates on the
// same page are NOT removed here: the frontier does that, so it can also
// report them as [Ignored].
// =============================================================================

use scraper::{Html, Selector};

use super::{Extractor, Item};
use crate::urls::resolve;

// The link extraction strategy
//
// The selector is parsed once and reused for every page.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    anchors: Selector,
}

impl LinkExtractor {
    pub fn new() -> Self {
        // "a[href]" is a constant, known-valid selector, so unwrap can't fail
        Self {
            anchors: Selector::parse("a[href]").unwrap(),
        }
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for LinkExtractor {
    // Example:
    //   body   = "<a href='/docs'>Docs</a><a href='#top'>Top</a>"
    //   origin = "https://example.com"
    //   result = [Url("https://example.com/docs"), Skipped("#top")]
    fn extract(&self, origin: &str, body: &str) -> Vec<Item> {
        let document = Html::parse_document(body);

        document
            .select(&self.anchors)
            .filter_map(|element| element.value().attr("href"))
            .map(|href| Item::Link(resolve(origin, href)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::urls::Resolved;

    fn links(body: &str, origin: &str) -> Vec<Resolved> {
        LinkExtractor::new()
            .extract(origin, body)
            .into_iter()
            .map(|item| match item {
                Item::Link(resolved) => resolved,
                other => panic!("unexpected item {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<a href="https://www.rust-lang.org/">Rust</a>"#;
        assert_eq!(
            links(html, "https://example.com"),
            vec![Resolved::Url("https://www.rust-lang.org".to_string())]
        );
    }

    #[test]
    fn test_resolve_relative_link() {
        let html = r#"<a href="/docs">Docs</a>"#;
        assert_eq!(
            links(html, "https://example.com"),
            vec![Resolved::Url("https://example.com/docs".to_string())]
        );
    }

    #[test]
    fn test_anchor_without_href_skipped() {
        let html = r#"<a name="top">Top</a><a href="/a">A</a>"#;
        assert_eq!(links(html, "example.com").len(), 1);
    }

    #[test]
    fn test_duplicates_kept() {
        let html = r#"<a href="/a">A</a><p><a href="/a">again</a></p>"#;
        assert_eq!(
            links(html, "example.com"),
            vec![
                Resolved::Url("example.com/a".to_string()),
                Resolved::Url("example.com/a".to_string()),
            ]
        );
    }

    #[test]
    fn test_multiple_links() {
        let html = r##"
            <a href="https://rust-lang.org">Rust</a>
            <a href="/docs">Docs</a>
            <a href="#frag">Section</a>
        "##;
        assert_eq!(
            links(html, "example.com"),
            vec![
                Resolved::Url("https://rust-lang.org".to_string()),
                Resolved::Url("example.com/docs".to_string()),
                Resolved::Skipped("#frag".to_string()),
            ]
        );
    }
}
