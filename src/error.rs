// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// Two kinds of failure exist:
// - Configuration errors (bad seed, missing exclusion file, no dictionary,
//   unusable output file). These abort the run before any network activity.
// - Per-URL errors (network, timeout, non-HTML content, sink writes). These
//   are logged and contained within the task that hit them.
//
// We use `thiserror` here so each variant gets a Display message and `?`
// conversions for free. The binary edge (main.rs) still uses anyhow.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// A seed URL supplied on the command line failed syntax validation
    #[error("Invalid url: {0}")]
    InvalidSeed(String),

    /// A seed URL failed the live browse check (non-200 or non-HTML)
    #[error("Url is not browsable: {0}")]
    Unbrowsable(String),

    /// The exclusion file could not be read
    #[error("Cannot open file: {}: {source}", path.display())]
    Exclusion {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No usable dictionary for word extraction
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// The output file could not be prepared (removed, created or opened)
    #[error("Cannot prepare output file: {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be built (usually a malformed proxy URL)
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Connection-level failure, after the single User-Agent retry
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    /// The fetch exceeded its timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The page answered, but not with an extractable HTML body
    #[error("Unsupported content for {url}: {detail}")]
    UnsupportedContent { url: String, detail: String },

    /// Writing to the output sink failed
    #[error("Output write failed: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the word map failed
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CrawlError {
    /// Returns true for errors that must stop the run before it starts
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CrawlError::InvalidSeed(_)
                | CrawlError::Unbrowsable(_)
                | CrawlError::Exclusion { .. }
                | CrawlError::Dictionary(_)
                | CrawlError::Output { .. }
                | CrawlError::Client(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;
