// src/crawl/orchestrator.rs
// =============================================================================
// Drives the crawl: a bounded pool of tasks, one task per URL.
//
// How it works:
// 1. Every seed is recorded in the frontier and queued
// 2. Up to `workers` tasks run at once (tokio JoinSet)
// 3. A task fetches its page, extracts items and classifies each one
//    against the shared frontier
// 4. Accepted, in-scope links are sent back over a channel as new work
// 5. The crawl ends when no task is running and nothing is queued
//
// Per task:
//
//   Fetching -> Extracting -> Filtering -> Recursing -> Done
//       |
//       +-> Failed   (fetch error; the URL stays recorded, nothing more)
//
// All tasks share one CrawlContext through an Arc. There is no other shared
// state, and the frontier is the only lock.
// =============================================================================

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::frontier::{Entry, Frontier};
use super::report::{CrawlSummary, Reporter, TaskReport, TaskState};
use super::scope::ScopeMode;
use super::sink::OutputSink;
use crate::config::{CrawlConfig, ExtractionMode};
use crate::error::Result;
use crate::extract::{Extractor, Item, LinkExtractor};
use crate::fetch::{FetchResult, PageFetcher};
use crate::urls::{canonicalize, validate, Resolved};

// Everything a crawl task needs, shared by all of them
pub struct CrawlContext {
    pub frontier: Frontier,
    pub scope: ScopeMode,
    pub reporter: Reporter,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<dyn Extractor>,
    // Word mode still needs links to know where to go next
    traversal: Option<LinkExtractor>,
}

impl CrawlContext {
    // Classifies one link found on `origin`
    //
    // Returns the canonical URL when it should be crawled next.
    fn filter_link(&self, origin: &str, resolved: Resolved) -> Option<String> {
        let (key, proposed) = match resolved {
            Resolved::Skipped(raw) => (raw, Entry::Ignored),
            Resolved::Url(link) if !validate(&link) => (link, Entry::Invalid),
            Resolved::Url(link) => {
                let key = canonicalize(&link);
                if self.scope.forks() && !self.scope.allows(origin, &key) {
                    (key, Entry::OtherScope)
                } else {
                    (key, Entry::Accepted)
                }
            }
        };

        let admission = self.frontier.admit(&key, proposed);
        self.reporter.classified(&key, admission.reported());

        (admission.accepted() && self.scope.forks()).then_some(key)
    }
}

pub struct Orchestrator {
    context: Arc<CrawlContext>,
    seeds: Vec<String>,
    workers: usize,
}

impl Orchestrator {
    /// Prepares a crawl: opens the output and preloads the frontier.
    ///
    /// Fails only on configuration problems (the output file cannot be
    /// prepared). Nothing is fetched until `run`.
    pub fn new(
        config: CrawlConfig,
        fetcher: Arc<dyn PageFetcher>,
        extractor: Arc<dyn Extractor>,
    ) -> Result<Self> {
        let words_mode = matches!(config.mode, ExtractionMode::Words { .. });
        let output = config.output.as_deref();

        let frontier = if words_mode {
            let (sink, previous) = OutputSink::open_words(output, config.update)?;
            let frontier = Frontier::new(sink);
            let known = frontier.preload(previous.keys().cloned());
            debug!(known, "preloaded urls from previous word map");
            frontier.preload_words(previous);
            frontier
        } else {
            let (sink, previous) = OutputSink::open_lines(output, config.update)?;
            let frontier = Frontier::new(sink);
            let known = frontier.preload(previous);
            debug!(known, "preloaded urls from previous output");
            frontier
        };

        let excluded = frontier.preload(config.exclusions.iter().cloned());
        debug!(excluded, "preloaded exclusions");

        let traversal = (words_mode && config.scope.forks()).then(LinkExtractor::new);

        Ok(Self {
            workers: config.effective_workers(),
            seeds: config.seeds,
            context: Arc::new(CrawlContext {
                frontier,
                scope: config.scope,
                reporter: Reporter::new(config.verbose),
                fetcher,
                extractor,
                traversal,
            }),
        })
    }

    /// Handle on the shared state; stays valid after `run`
    pub fn context(&self) -> Arc<CrawlContext> {
        Arc::clone(&self.context)
    }

    /// Runs the crawl to completion and returns its totals.
    ///
    /// Per-URL failures never stop the run; they only show up in the summary.
    pub async fn run(self) -> CrawlSummary {
        let context = self.context;
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let mut pending: VecDeque<String> = VecDeque::new();

        // Seeds are always crawled; a seed already known from an earlier
        // run or the exclusion list is just not written out again
        for seed in self.seeds {
            let entry = if context.frontier.try_accept(&seed) {
                Entry::Accepted
            } else {
                Entry::Ignored
            };
            context.reporter.classified(&seed, entry);
            pending.push_back(seed);
        }

        info!(seeds = pending.len(), workers = self.workers, "crawl started");

        let mut tasks = JoinSet::new();
        let mut summary = CrawlSummary::default();

        loop {
            while let Ok(url) = rx.try_recv() {
                pending.push_back(url);
            }

            while tasks.len() < self.workers {
                let Some(url) = pending.pop_front() else {
                    break;
                };
                tasks.spawn(crawl_page(Arc::clone(&context), url, tx.clone()));
            }

            // Every task sends its children before it finishes, and the
            // channel was drained above, so nothing is left to do
            if tasks.is_empty() {
                break;
            }

            tokio::select! {
                Some(url) = rx.recv() => pending.push_back(url),
                Some(joined) = tasks.join_next() => match joined {
                    Ok(report) => {
                        debug!(url = %report.url, state = ?report.state, children = report.children, "task finished");
                        summary.record(&report);
                    }
                    Err(e) => {
                        warn!(error = %e, "crawl task panicked");
                        summary.panicked += 1;
                    }
                },
                else => break,
            }
        }

        context.frontier.finish();
        summary.count_entries(&context.frontier.snapshot());
        info!(tasks = summary.tasks, accepted = summary.accepted, "crawl finished");
        summary
    }
}

// One task: fetch, extract, filter, submit children
async fn crawl_page(
    context: Arc<CrawlContext>,
    url: String,
    submit: UnboundedSender<String>,
) -> TaskReport {
    let mut report = TaskReport::new(url);

    let body = match context.fetcher.fetch(&report.url).await {
        FetchResult::Ok(body) => body,
        failure => {
            if let Some(err) = failure.into_error(&report.url) {
                warn!(error = %err, "page not expanded");
            }
            report.enter(TaskState::Failed);
            return report;
        }
    };

    report.enter(TaskState::Extracting);
    let mut items = context.extractor.extract(&report.url, &body);
    if let Some(traversal) = &context.traversal {
        items.extend(traversal.extract(&report.url, &body));
    }

    report.enter(TaskState::Filtering);
    let mut children = Vec::new();
    for item in items {
        match item {
            Item::Words(words) => context.frontier.merge_words(&report.url, words),
            Item::Link(resolved) => {
                if let Some(child) = context.filter_link(&report.url, resolved) {
                    children.push(child);
                }
            }
        }
    }

    if !children.is_empty() {
        report.enter(TaskState::Recursing);
        for child in children {
            // The receiver lives as long as the orchestrator loop
            if submit.send(child).is_ok() {
                report.children += 1;
            }
        }
    }

    report.enter(TaskState::Done);
    report
}
