// src/extract/mod.rs
// =============================================================================
// Turns a fetched page into items the crawler can classify.
//
// Two strategies share one trait:
// - links: every <a href> on the page, resolved against the page URL
// - words: dictionary words from the visible text, with case-variant counts
//
// Submodules:
// - links: LinkExtractor
// - words: WordExtractor
// - dictionary: the word list used by WordExtractor
// =============================================================================

mod dictionary;
mod links;
mod words;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::ExtractionMode;
use crate::error::Result;
use crate::urls::Resolved;

pub use dictionary::Dictionary;
pub use links::LinkExtractor;
pub use words::WordExtractor;

/// word -> number of occurrences on one page
///
/// A BTreeMap so the JSON output has a stable key order.
pub type WordMap = BTreeMap<String, u64>;

// One thing found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A resolved (or skipped) href
    Link(Resolved),
    /// All dictionary words found on the page
    Words(WordMap),
}

// A pluggable extraction strategy
//
// Input: the URL the page came from and its HTML body.
// Output: the items found, in document order.
pub trait Extractor: Send + Sync {
    fn extract(&self, origin: &str, body: &str) -> Vec<Item>;
}

/// Builds the extractor for the configured mode.
///
/// Word mode loads its dictionary here, so a missing word list is reported
/// before any page is fetched.
pub fn build_extractor(mode: &ExtractionMode) -> Result<Arc<dyn Extractor>> {
    match mode {
        ExtractionMode::Links => Ok(Arc::new(LinkExtractor::new())),
        ExtractionMode::Words {
            language,
            dictionary,
        } => {
            let dictionary = Dictionary::resolve(language, dictionary.as_deref())?;
            Ok(Arc::new(WordExtractor::new(Arc::new(dictionary))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_build_link_extractor() {
        let extractor = build_extractor(&ExtractionMode::Links).unwrap();
        let items = extractor.extract("https://example.com", r#"<a href="/a">A</a>"#);
        assert_eq!(items, vec![Item::Link(Resolved::Url("https://example.com/a".to_string()))]);
    }

    #[test]
    fn test_build_word_extractor_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "crawler").unwrap();

        let mode = ExtractionMode::Words {
            language: "xx".to_string(),
            dictionary: Some(file.path().to_path_buf()),
        };
        let extractor = build_extractor(&mode).unwrap();
        let items = extractor.extract("https://example.com", "<p>crawler</p>");

        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_build_word_extractor_unknown_language() {
        let mode = ExtractionMode::Words {
            language: "zz_NOPE".to_string(),
            dictionary: None,
        };
        assert!(build_extractor(&mode).is_err());
    }
}
