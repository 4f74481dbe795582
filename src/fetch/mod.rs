// src/fetch/mod.rs
// =============================================================================
// This module downloads pages.
//
// Submodules:
// - http: the real fetcher, built on reqwest
// - live: the opt-in "browse" check run against seeds before crawling
//
// The crawler only talks to the `PageFetcher` trait, so tests can swap in a
// fake fetcher that serves canned pages without touching the network.
// =============================================================================

mod http;
mod live;

use async_trait::async_trait;

use crate::error::CrawlError;

pub use http::HttpFetcher;
pub use live::browse_seeds;

// The outcome of fetching one URL
//
// Only `Ok` carries a body. Every other variant means "this URL was seen but
// its page cannot be expanded".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// 200 OK with an HTML body
    Ok(String),
    /// 200 OK, but the content type is not text/html
    NonHtml(String),
    /// Any status other than 200 (redirects are not followed)
    HttpError(u16),
    /// Connection failed, even after the User-Agent retry
    NetworkError(String),
    /// The request exceeded its timeout
    Timeout,
}

impl FetchResult {
    /// Converts a failed fetch into the matching error, for logging.
    /// Returns None for `Ok`.
    pub fn into_error(self, url: &str) -> Option<CrawlError> {
        let url = url.to_string();
        match self {
            FetchResult::Ok(_) => None,
            FetchResult::NonHtml(content_type) => Some(CrawlError::UnsupportedContent {
                url,
                detail: format!("content type {}", content_type),
            }),
            FetchResult::HttpError(code) => Some(CrawlError::UnsupportedContent {
                url,
                detail: format!("HTTP {}", code),
            }),
            FetchResult::NetworkError(message) => Some(CrawlError::Network { url, message }),
            FetchResult::Timeout => Some(CrawlError::Timeout(url)),
        }
    }
}

// Anything that can turn a URL into a FetchResult
//
// `Send + Sync` because one fetcher is shared by every crawl task.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_has_no_error() {
        assert!(FetchResult::Ok("<html></html>".to_string())
            .into_error("https://example.com")
            .is_none());
    }

    #[test]
    fn test_failures_map_to_errors() {
        let err = FetchResult::Timeout.into_error("https://example.com");
        assert!(matches!(err, Some(CrawlError::Timeout(_))));

        let err = FetchResult::HttpError(404).into_error("https://example.com");
        assert!(matches!(err, Some(CrawlError::UnsupportedContent { .. })));

        let err = FetchResult::NetworkError("refused".to_string()).into_error("https://example.com");
        assert!(matches!(err, Some(CrawlError::Network { .. })));
    }
}
