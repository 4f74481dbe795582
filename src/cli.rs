// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI is a plain struct and clap generates the
// parsing code from the #[arg(...)] attributes.
//
// Example:
//   link-spider example.com --scope domain-tree -o urls.txt
//   link-spider example.com --mode words --language en_US -o words.json
//
// `Cli::into_config` turns the raw arguments into a validated CrawlConfig.
// Anything wrong with the input (bad seed, unreadable exclusion file) is
// reported there, before a single request is made.
// =============================================================================

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{load_exclusions, normalize_seeds, CrawlConfig, ExtractionMode};
use crate::crawl::ScopeMode;
use crate::error::Result;

#[derive(Parser, Debug)]
#[command(
    name = "link-spider",
    version,
    about = "A concurrent web crawler that collects links or dictionary words",
    long_about = "link-spider fetches the given seed pages, records every link it finds \
                  and, depending on --scope, keeps crawling the links it accepts. \
                  In word mode it counts dictionary words per page instead."
)]
pub struct Cli {
    /// Seed URLs to start from (e.g., https://example.com or example.com)
    pub urls: Vec<String>,

    /// Which discovered links are crawled further
    ///
    /// none = only the seeds are fetched
    /// domain = links on the same host as their page
    /// domain-tree = links under the page's root URL
    /// all = every valid link
    #[arg(long, value_enum, default_value_t = ScopeMode::None)]
    pub scope: ScopeMode,

    /// What to extract from each page
    #[arg(long, value_enum, default_value_t = Mode::Links)]
    pub mode: Mode,

    /// Dictionary language for word mode
    #[arg(long, default_value = "en_US")]
    pub language: String,

    /// Dictionary file for word mode (overrides --language lookup)
    #[arg(long)]
    pub dictionary: Option<PathBuf>,

    /// File of URLs (one per line) that are never written or crawled
    #[arg(long)]
    pub exclude: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Keep and extend an existing output file instead of replacing it
    ///
    /// Takes a value: --update false
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub update: bool,

    /// Proxy used for every request (e.g., http://127.0.0.1:8080)
    #[arg(long)]
    pub proxy: Option<String>,

    /// Number of concurrent crawl tasks (default: one per seed, 2 to 61)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Print options, every classified link and a final summary
    #[arg(short, long)]
    pub verbose: bool,

    /// Check that every seed answers with an HTML page before crawling
    #[arg(long)]
    pub browse: bool,
}

// The two extraction strategies as the user names them
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Links,
    Words,
}

impl Cli {
    /// Validates the arguments and builds the crawl configuration.
    ///
    /// Seeds must all be valid; the exclusion file must be readable.
    pub fn into_config(self) -> Result<CrawlConfig> {
        let seeds = normalize_seeds(&self.urls)?;

        let exclusions = match &self.exclude {
            Some(path) => load_exclusions(path)?,
            None => Vec::new(),
        };

        let mode = match self.mode {
            Mode::Links => ExtractionMode::Links,
            Mode::Words => ExtractionMode::Words {
                language: self.language,
                dictionary: self.dictionary,
            },
        };

        Ok(CrawlConfig {
            seeds,
            scope: self.scope,
            mode,
            exclusions,
            output: self.output,
            update: self.update,
            proxy: self.proxy,
            workers: self.workers,
            verbose: self.verbose,
            browse: self.browse,
            ..CrawlConfig::default()
        })
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why `value_enum`?
//    - ValueEnum lets clap parse "domain-tree" straight into ScopeMode::DomainTree
//    - Invalid values are rejected with a list of the allowed ones
//
// 2. Why ArgAction::Set for --update?
//    - A plain bool flag can only be switched on
//    - --update defaults to true, so it has to accept an explicit "false"
//
// 3. Why does into_config take `self`?
//    - The config takes ownership of the strings and paths
//    - Nothing needs the Cli struct afterwards, so no clones are needed
// -----------------------------------------------------------------------------
