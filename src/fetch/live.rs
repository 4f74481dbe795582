// src/fetch/live.rs
// =============================================================================
// The "browse" check: is this seed actually a reachable HTML page?
//
// Plain validation (urls::validate) only looks at the string. With --browse
// we also fetch every seed once before the crawl starts and require a
// 200 OK with an HTML content type. This runs for seeds only, never for
// links discovered during the crawl.
// =============================================================================

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::debug;

use super::{FetchResult, PageFetcher};
use crate::urls::validate;

// How many seeds are checked at the same time
const BROWSE_CONCURRENCY: usize = 16;

// Syntax check plus a live fetch
async fn validate_live(fetcher: &dyn PageFetcher, url: &str) -> bool {
    if !validate(url) {
        return false;
    }

    match fetcher.fetch(url).await {
        FetchResult::Ok(_) => true,
        other => {
            debug!(url, result = ?other, "seed failed browse check");
            false
        }
    }
}

/// Checks all seeds concurrently and returns the ones that failed.
///
/// .buffer_unordered() means results come back in completion order, so the
/// returned list is sorted to keep error messages stable.
pub async fn browse_seeds(fetcher: Arc<dyn PageFetcher>, seeds: &[String]) -> Vec<String> {
    let checks = seeds.iter().cloned().map(|seed| {
        let fetcher = Arc::clone(&fetcher);
        async move {
            let ok = validate_live(fetcher.as_ref(), &seed).await;
            (seed, ok)
        }
    });

    let mut failed: Vec<String> = stream::iter(checks)
        .buffer_unordered(BROWSE_CONCURRENCY)
        .filter_map(|(seed, ok)| async move { (!ok).then_some(seed) })
        .collect()
        .await;

    failed.sort();
    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct OneGoodPage;

    #[async_trait]
    impl PageFetcher for OneGoodPage {
        async fn fetch(&self, url: &str) -> FetchResult {
            if url == "good.example.com" {
                FetchResult::Ok("<html></html>".to_string())
            } else {
                FetchResult::NonHtml("image/png".to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_browse_seeds_reports_failures() {
        let seeds = vec![
            "good.example.com".to_string(),
            "image.example.com".to_string(),
            "localhost".to_string(),
        ];

        let failed = browse_seeds(Arc::new(OneGoodPage), &seeds).await;

        assert_eq!(failed, vec!["image.example.com".to_string(), "localhost".to_string()]);
    }

    #[tokio::test]
    async fn test_browse_seeds_all_good() {
        let seeds = vec!["good.example.com".to_string()];
        assert!(browse_seeds(Arc::new(OneGoodPage), &seeds).await.is_empty());
    }
}
