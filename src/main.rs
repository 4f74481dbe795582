// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Validate them into a CrawlConfig (fatal errors stop here)
// 3. Optionally check that every seed is browsable
// 4. Run the crawl; results stream to the output while it runs
// 5. Exit with proper code (0 = done, 1 = bad configuration, 2 = error)
// =============================================================================

mod cli;        // src/cli.rs - command-line parsing
mod config;     // src/config.rs - the validated crawl configuration
mod crawl;      // src/crawl/ - frontier, scope, sink and the worker pool
mod error;      // src/error.rs - CrawlError
mod extract;    // src/extract/ - link and word extraction
mod fetch;      // src/fetch/ - HTTP fetching
mod logging;    // src/logging.rs - tracing setup
mod urls;       // src/urls/ - URL validation, canonical form, resolution

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use cli::Cli;
use config::{CrawlConfig, ExtractionMode};
use crawl::{CrawlSummary, Orchestrator};
use error::CrawlError;
use fetch::{browse_seeds, HttpFetcher, PageFetcher};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Anything that is not a configuration problem ends up here
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = crawl finished (or nothing to crawl)
//   Ok(1) = configuration error, nothing was fetched
//   Err = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if cli.urls.is_empty() {
        println!("No URL specified");
        return Ok(0);
    }

    match crawl(cli).await {
        Ok(summary) => {
            if let Some(summary) = summary {
                print_summary(&summary);
            }
            Ok(0)
        }
        Err(e) if e.is_fatal() => {
            eprintln!("Error: {}", e);
            Ok(1)
        }
        Err(e) => Err(e).context("crawl failed"),
    }
}

// Builds everything from the arguments and runs the crawl.
// Returns the summary when it should be printed (--verbose).
async fn crawl(cli: Cli) -> Result<Option<CrawlSummary>, CrawlError> {
    let config = cli.into_config()?;

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(
        config.proxy.as_deref(),
        config.timeout,
    )?);

    crawl_with(config, fetcher).await
}

// Order matters: every check that needs no network (the dictionary) runs
// before the browse check, and the output is only opened after it
async fn crawl_with(
    config: CrawlConfig,
    fetcher: Arc<dyn PageFetcher>,
) -> Result<Option<CrawlSummary>, CrawlError> {
    let extractor = extract::build_extractor(&config.mode)?;

    if config.browse {
        let failed = browse_seeds(Arc::clone(&fetcher), &config.seeds).await;
        if let Some(first) = failed.first() {
            for url in &failed {
                eprintln!("Url is not browsable: {}", url);
            }
            return Err(CrawlError::Unbrowsable(first.clone()));
        }
    }

    let verbose = config.verbose;
    let options = verbose.then(|| describe_options(&config));

    let orchestrator = Orchestrator::new(config, fetcher, extractor)?;
    let context = orchestrator.context();

    if let Some(options) = options {
        print_options(&options, &context.frontier.describe_output());
    }

    let summary = orchestrator.run().await;

    if verbose {
        let pages_with_words = context.frontier.word_maps().len();
        if pages_with_words > 0 {
            eprintln!("📝 Word maps for {} page(s)", pages_with_words);
        }
    }

    Ok(verbose.then_some(summary))
}

// The options as printed by --verbose, one "name: value" pair per line
fn describe_options(config: &CrawlConfig) -> Vec<(&'static str, String)> {
    let mode = match &config.mode {
        ExtractionMode::Links => "links".to_string(),
        ExtractionMode::Words {
            language,
            dictionary: Some(path),
        } => format!("words ({}, {})", language, path.display()),
        ExtractionMode::Words { language, .. } => format!("words ({})", language),
    };

    vec![
        ("Seeds", config.seeds.join(", ")),
        ("Scope", format!("{:?}", config.scope)),
        ("Mode", mode),
        ("Workers", config.effective_workers().to_string()),
        ("Exclusions", config.exclusions.len().to_string()),
        ("Update", config.update.to_string()),
        (
            "Proxy",
            config.proxy.clone().unwrap_or_else(|| "none".to_string()),
        ),
        ("Timeout", format!("{}s", config.timeout.as_secs())),
    ]
}

fn print_options(options: &[(&str, String)], output: &str) {
    eprintln!("🔍 Options:");
    for (name, value) in options {
        eprintln!("   {:<11} {}", format!("{}:", name), value);
    }
    eprintln!("   {:<11} {}", "Output:", output);
    eprintln!();
}

fn print_summary(summary: &CrawlSummary) {
    eprintln!();
    eprintln!("📊 Summary:");
    eprintln!("   📄 Pages: {} ({} failed)", summary.tasks, summary.failed);
    if summary.panicked > 0 {
        eprintln!("   💥 Panicked tasks: {}", summary.panicked);
    }
    eprintln!("   ✅ Accepted: {}", summary.accepted);
    eprintln!("   🔁 Ignored: {}", summary.ignored);
    eprintln!("   ❌ Invalid: {}", summary.invalid);
    eprintln!("   🌐 Other scope: {}", summary.other_scope);

    if !summary.accepted_by_domain.is_empty() {
        eprintln!("   By domain:");
        for (domain, count) in &summary.accepted_by_domain {
            eprintln!("      {:<40} {}", domain, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::fetch::FetchResult;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    // Serves the same page for every URL and counts requests
    #[derive(Default)]
    struct CountingFetcher {
        requests: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for CountingFetcher {
        async fn fetch(&self, _url: &str) -> FetchResult {
            self.requests.fetch_add(1, Ordering::SeqCst);
            FetchResult::Ok("<p>hello</p>".to_string())
        }
    }

    fn browse_config(mode: ExtractionMode) -> CrawlConfig {
        CrawlConfig {
            seeds: vec!["example.com".to_string()],
            mode,
            browse: true,
            ..CrawlConfig::default()
        }
    }

    #[tokio::test]
    async fn test_missing_dictionary_fails_before_any_request() {
        let fetcher = Arc::new(CountingFetcher::default());
        let config = browse_config(ExtractionMode::Words {
            language: "en".to_string(),
            dictionary: Some("/no/such/words.dic".into()),
        });

        let err = crawl_with(config, Arc::clone(&fetcher) as Arc<dyn PageFetcher>)
            .await
            .unwrap_err();

        assert!(matches!(err, CrawlError::Dictionary(_)));
        assert!(err.is_fatal());
        assert_eq!(fetcher.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_browse_then_crawl() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(CountingFetcher::default());
        let mut config = browse_config(ExtractionMode::Links);
        config.output = Some(dir.path().join("urls.txt"));

        let summary = crawl_with(config, Arc::clone(&fetcher) as Arc<dyn PageFetcher>)
            .await
            .unwrap();

        // not verbose, so no summary to print
        assert!(summary.is_none());
        // one browse check plus one crawl fetch
        assert_eq!(fetcher.requests.load(Ordering::SeqCst), 2);
    }
}
