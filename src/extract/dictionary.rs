// src/extract/dictionary.rs
// =============================================================================
// The word list used by word extraction.
//
// Accepted file formats:
// - plain lists, one word per line (e.g. /usr/share/dict/words)
// - hunspell/myspell .dic files: the first line is a word count and entries
//   look like "word/FLAGS"; the count is skipped and the flags are dropped
//
// Lookups are case-insensitive: every entry is stored lowercased.
// =============================================================================

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CrawlError, Result};

const SEARCH_DIRS: [&str; 3] = [
    "/usr/share/hunspell",
    "/usr/share/myspell",
    "/usr/share/myspell/dicts",
];
const SYSTEM_WORDS: &str = "/usr/share/dict/words";

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Parses the contents of a word list or .dic file
    pub fn parse(contents: &str) -> Self {
        let mut lines = contents.lines().peekable();

        // Hunspell files start with the number of entries
        if let Some(first) = lines.peek() {
            let first = first.trim();
            if !first.is_empty() && first.chars().all(|c| c.is_ascii_digit()) {
                lines.next();
            }
        }

        Self::from_words(
            lines
                .filter(|line| !line.trim_start().starts_with('#'))
                .map(|line| line.split('/').next().unwrap_or("")),
        )
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CrawlError::Dictionary(format!("cannot read {}: {}", path.display(), e))
        })?;
        let dictionary = Self::parse(&contents);
        debug!(path = %path.display(), words = dictionary.len(), "dictionary loaded");
        Ok(dictionary)
    }

    /// Loads the dictionary for `language`.
    ///
    /// An explicit path always wins. Otherwise we look for `{language}.dic`
    /// in the usual hunspell/myspell directories, and fall back to the
    /// system word list for English.
    pub fn resolve(language: &str, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let mut candidates: Vec<PathBuf> = SEARCH_DIRS
            .iter()
            .map(|dir| Path::new(dir).join(format!("{}.dic", language)))
            .collect();
        if language.to_ascii_lowercase().starts_with("en") {
            candidates.push(PathBuf::from(SYSTEM_WORDS));
        }

        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => Self::load(path),
            None => Err(CrawlError::Dictionary(format!(
                "no dictionary found for language '{}' (use --dictionary to point at a word list)",
                language
            ))),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}
