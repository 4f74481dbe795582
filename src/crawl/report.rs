// src/crawl/report.rs
// =============================================================================
// Progress output and the end-of-run summary.
//
// With --verbose every classification is printed as it happens:
//
//   https://example.com/a [Accepted]
//   #top [Ignored]
//   https://other.com [OtherScope]
//
// These lines go to stderr so they never mix with URLs written to stdout.
// =============================================================================

use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

use super::frontier::Entry;
use crate::urls::domain;

#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    verbose: bool,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn classified(&self, key: &str, entry: Entry) {
        debug!(url = key, %entry, "classified");
        if self.verbose {
            eprintln!("{} [{}]", key, entry);
        }
    }
}

// Final state of one crawl task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Fetching,
    Extracting,
    Filtering,
    Recursing,
    Done,
    /// The fetch failed; the URL was recorded but not expanded
    Failed,
}

// What one task did
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub url: String,
    pub state: TaskState,
    /// Links submitted for crawling
    pub children: usize,
}

impl TaskReport {
    pub fn new(url: String) -> Self {
        Self {
            url,
            state: TaskState::Fetching,
            children: 0,
        }
    }

    pub fn enter(&mut self, state: TaskState) {
        trace!(url = %self.url, from = ?self.state, to = ?state, "task state");
        self.state = state;
    }
}

// Totals for the whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Pages fetched (or attempted)
    pub tasks: usize,
    /// Tasks whose fetch failed
    pub failed: usize,
    /// Tasks that panicked
    pub panicked: usize,
    pub accepted: usize,
    pub ignored: usize,
    pub invalid: usize,
    pub other_scope: usize,
    /// Accepted URLs per registrable domain
    pub accepted_by_domain: BTreeMap<String, usize>,
}

impl CrawlSummary {
    pub fn record(&mut self, report: &TaskReport) {
        self.tasks += 1;
        if report.state == TaskState::Failed {
            self.failed += 1;
        }
    }

    /// Fills in the entry totals from the frontier's final state
    pub fn count_entries(&mut self, entries: &HashMap<String, Entry>) {
        for (key, entry) in entries {
            match entry {
                Entry::Accepted => {
                    self.accepted += 1;
                    *self.accepted_by_domain.entry(domain(key).to_lowercase()).or_insert(0) += 1;
                }
                Entry::Ignored => self.ignored += 1,
                Entry::Invalid => self.invalid += 1,
                Entry::OtherScope => self.other_scope += 1,
            }
        }
    }
}
