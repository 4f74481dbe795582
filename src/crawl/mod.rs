// src/crawl/mod.rs
// =============================================================================
// This module handles the crawl itself.
//
// Features:
// - Concurrent crawling with a bounded number of tasks
// - One shared frontier, so every URL is processed at most once
// - Scope policies: none, same domain, same domain tree, everything
// - Results stream to the output as they are found
//
// Submodules:
// - frontier: the visited set (and the output, behind the same lock)
// - scope: which links we follow
// - sink: where results are written
// - report: verbose progress lines and the final summary
// - orchestrator: the worker pool that ties it all together
// =============================================================================

mod frontier;
mod orchestrator;
mod report;
mod scope;
mod sink;

pub use orchestrator::Orchestrator;
pub use report::CrawlSummary;
pub use scope::ScopeMode;
