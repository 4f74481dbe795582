// src/config.rs
// =============================================================================
// The crawl configuration: everything the engine needs, as named and typed
// fields.
//
// The CLI (cli.rs) builds this struct; the engine only reads it. Seeds and
// exclusions arrive here already validated and canonical.
// =============================================================================

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::crawl::ScopeMode;
use crate::error::{CrawlError, Result};
use crate::urls::{canonicalize, validate};

/// Smallest worker pool we ever run
pub const MIN_WORKERS: usize = 2;
/// Largest worker pool we ever run
pub const MAX_WORKERS: usize = 61;
/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

// What we pull out of each page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// Hyperlinks; accepted URLs go to the output one per line
    #[default]
    Links,
    /// Dictionary words; the output is a JSON map of url -> word -> count
    Words {
        /// Language code used to locate a dictionary (e.g. "en_US")
        language: String,
        /// Explicit dictionary file, overriding the language lookup
        dictionary: Option<PathBuf>,
    },
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Seed URLs: validated, canonical, without duplicates
    pub seeds: Vec<String>,
    /// Which discovered links we recurse into (default: none)
    pub scope: ScopeMode,
    /// Links or words (default: links)
    pub mode: ExtractionMode,
    /// URLs marked as already seen before the crawl starts
    pub exclusions: Vec<String>,
    /// Output file; None means stdout
    pub output: Option<PathBuf>,
    /// Keep and extend an existing output file (default: true)
    pub update: bool,
    /// Proxy for every request
    pub proxy: Option<String>,
    /// Requested worker count; see `effective_workers`
    pub workers: Option<usize>,
    /// Print every classification as it happens
    pub verbose: bool,
    /// Fetch every seed once before crawling and reject unreachable ones
    pub browse: bool,
    /// Per-request timeout (default: 5 seconds)
    pub timeout: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seeds: Vec::new(),
            scope: ScopeMode::None,
            mode: ExtractionMode::Links,
            exclusions: Vec::new(),
            output: None,
            update: true,
            proxy: None,
            workers: None,
            verbose: false,
            browse: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CrawlConfig {
    /// Number of concurrent crawl tasks.
    ///
    /// Defaults to one per seed, and is always kept within
    /// MIN_WORKERS..=MAX_WORKERS.
    pub fn effective_workers(&self) -> usize {
        self.workers
            .unwrap_or(self.seeds.len())
            .clamp(MIN_WORKERS, MAX_WORKERS)
    }
}

/// Validates and canonicalizes seed URLs.
///
/// Any invalid seed is a fatal error: the crawl must not start with a typo
/// in its input. Duplicates are dropped, keeping the first occurrence.
pub fn normalize_seeds(raw: &[String]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut seeds = Vec::new();

    for url in raw {
        if !validate(url) {
            return Err(CrawlError::InvalidSeed(url.clone()));
        }
        let canonical = canonicalize(url);
        if seen.insert(canonical.clone()) {
            seeds.push(canonical);
        }
    }

    Ok(seeds)
}

/// Reads a newline-delimited exclusion file.
///
/// A file that cannot be read is fatal. A line that is not a valid URL is
/// only warned about and skipped.
pub fn load_exclusions(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path).map_err(|source| CrawlError::Exclusion {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seen = HashSet::new();
    let mut exclusions = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !validate(line) {
            warn!(line, "url is not valid, skipping exclusion");
            continue;
        }
        let canonical = canonicalize(line);
        if seen.insert(canonical.clone()) {
            exclusions.push(canonical);
        }
    }

    Ok(exclusions)
}
