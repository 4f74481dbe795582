// src/crawl/frontier.rs
// =============================================================================
// The frontier: every key the crawl has already classified.
//
// One Mutex guards three things together:
// - the visited map (key -> Entry)
// - the per-URL word maps (word mode)
// - the output sink
//
// Keeping the sink behind the same lock means "first to see this URL" and
// "write this URL to the output" happen as one step: no duplicate lines, no
// interleaved partial lines.
//
// The lock is a std Mutex and is only held for the check-and-insert (plus the
// write). It is never held across an .await.
// =============================================================================

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

use super::sink::{OutputSink, WordIndex};
use crate::extract::WordMap;

// How a key was classified the first time it was seen
//
// Entries never change once stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entry {
    /// Valid, in scope (or scope "none"), written to the output
    Accepted,
    /// Already seen, excluded, or a fragment/non-web link
    Ignored,
    /// Failed URL validation
    Invalid,
    /// Valid, but outside the crawl scope
    OtherScope,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Entry::Accepted => "Accepted",
            Entry::Ignored => "Ignored",
            Entry::Invalid => "Invalid",
            Entry::OtherScope => "OtherScope",
        };
        write!(f, "{}", label)
    }
}

// Result of offering a key to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// The entry stored for the key (ours, or the earlier one)
    pub entry: Entry,
    /// True if this call stored it
    pub first_sight: bool,
}

impl Admission {
    /// What to tell the user: repeat sightings are always "Ignored"
    pub fn reported(&self) -> Entry {
        if self.first_sight {
            self.entry
        } else {
            Entry::Ignored
        }
    }

    /// Whether the caller should crawl this key
    pub fn accepted(&self) -> bool {
        self.first_sight && self.entry == Entry::Accepted
    }
}

struct Visited {
    entries: HashMap<String, Entry>,
    words: WordIndex,
    // URLs whose word map was (re)built in this run
    merged: HashSet<String>,
    sink: OutputSink,
}

pub struct Frontier {
    inner: Mutex<Visited>,
}

impl Frontier {
    pub fn new(sink: OutputSink) -> Self {
        Self {
            inner: Mutex::new(Visited {
                entries: HashMap::new(),
                words: WordIndex::new(),
                merged: HashSet::new(),
                sink,
            }),
        }
    }

    // A panicking task must not take the whole crawl down with it, so a
    // poisoned lock is simply reused
    fn lock(&self) -> MutexGuard<'_, Visited> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks keys as already seen before the crawl starts.
    /// Returns how many were new.
    pub fn preload<I, S>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut visited = self.lock();
        let mut added = 0;
        for key in keys {
            if visited.entries.insert(key.into(), Entry::Ignored).is_none() {
                added += 1;
            }
        }
        added
    }

    /// Seeds the word index with an earlier run's snapshot
    pub fn preload_words(&self, words: WordIndex) {
        self.lock().words = words;
    }

    /// Atomically checks `key` and records it as Accepted if it is new.
    ///
    /// Exactly one of any number of concurrent callers gets `true`. The
    /// winner's key is written to the output before the lock is released.
    pub fn try_accept(&self, key: &str) -> bool {
        self.admit(key, Entry::Accepted).first_sight
    }

    /// Records `key` with `proposed` if it has not been seen yet.
    ///
    /// A newly accepted key is written to the output sink. Sink errors are
    /// logged and the crawl carries on.
    pub fn admit(&self, key: &str, proposed: Entry) -> Admission {
        let mut visited = self.lock();

        if let Some(existing) = visited.entries.get(key) {
            return Admission {
                entry: *existing,
                first_sight: false,
            };
        }

        visited.entries.insert(key.to_string(), proposed);
        if proposed == Entry::Accepted {
            if let Err(e) = visited.sink.append_line(key) {
                warn!(url = key, error = %e, "cannot write url to output");
            }
        }

        Admission {
            entry: proposed,
            first_sight: true,
        }
    }

    /// Adds a page's word counts to the index, key by key, then rewrites
    /// the snapshot.
    ///
    /// The first merge for a URL in this run replaces whatever an earlier
    /// run stored for it, so re-crawling a page never inflates its counts.
    pub fn merge_words(&self, url: &str, words: WordMap) {
        let mut visited = self.lock();
        let Visited {
            words: index,
            merged,
            sink,
            ..
        } = &mut *visited;

        if merged.insert(url.to_string()) {
            index.remove(url);
        }
        let counts = index.entry(url.to_string()).or_default();
        for (word, count) in words {
            *counts.entry(word).or_insert(0) += count;
        }

        if let Err(e) = sink.write_snapshot(index) {
            warn!(url, error = %e, "cannot write word map to output");
        }
    }

    /// Copy of every classification so far
    pub fn snapshot(&self) -> HashMap<String, Entry> {
        self.lock().entries.clone()
    }

    /// Copy of the word index
    pub fn word_maps(&self) -> WordIndex {
        self.lock().words.clone()
    }

    pub fn describe_output(&self) -> String {
        self.lock().sink.describe()
    }

    /// Final flush of the output (prints the word map when writing to stdout)
    pub fn finish(&self) {
        let mut visited = self.lock();
        let Visited { words, sink, .. } = &mut *visited;
        if let Err(e) = sink.finish(words) {
            warn!(error = %e, "cannot finish output");
        }
    }
}
