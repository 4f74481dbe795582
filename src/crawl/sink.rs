// src/crawl/sink.rs
// =============================================================================
// Where crawl results go.
//
// - Stdout: one accepted URL per line
// - Lines: one accepted URL per line, appended to a file
// - WordSnapshot: the whole url -> word -> count map as pretty JSON,
//   rewritten after each page (file) or printed once at the end (stdout)
//
// The sink is owned by the frontier and only touched while the frontier's
// lock is held, so two tasks can never interleave partial lines.
//
// Update mode keeps what an earlier run wrote; the earlier contents are
// handed back so the frontier can treat them as already seen.
// =============================================================================

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{CrawlError, Result};
use crate::extract::WordMap;
use crate::urls::canonicalize;

/// url -> word counts for that page
pub type WordIndex = BTreeMap<String, WordMap>;

#[derive(Debug)]
pub enum OutputSink {
    Stdout,
    Lines { path: PathBuf, file: File },
    WordSnapshot { path: Option<PathBuf> },
}

impl OutputSink {
    /// Opens the line-per-URL sink.
    ///
    /// Returns the sink plus the URLs already present in the file (update
    /// mode only; overwrite mode removes the file first).
    pub fn open_lines(output: Option<&Path>, update: bool) -> Result<(Self, Vec<String>)> {
        let Some(path) = output else {
            return Ok((OutputSink::Stdout, Vec::new()));
        };
        let output_error = |source: std::io::Error| CrawlError::Output {
            path: path.to_path_buf(),
            source,
        };

        let previous = if update {
            match fs::read_to_string(path) {
                Ok(contents) => contents
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(canonicalize)
                    .collect(),
                Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
                Err(e) => return Err(output_error(e)),
            }
        } else {
            remove_if_exists(path).map_err(output_error)?;
            Vec::new()
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(output_error)?;

        Ok((
            OutputSink::Lines {
                path: path.to_path_buf(),
                file,
            },
            previous,
        ))
    }

    /// Opens the JSON word-map sink.
    ///
    /// In update mode an existing, readable snapshot is loaded so the next
    /// rewrite keeps it. A snapshot that fails to parse is replaced.
    pub fn open_words(output: Option<&Path>, update: bool) -> Result<(Self, WordIndex)> {
        let Some(path) = output else {
            return Ok((OutputSink::WordSnapshot { path: None }, WordIndex::new()));
        };
        let output_error = |source: std::io::Error| CrawlError::Output {
            path: path.to_path_buf(),
            source,
        };

        let previous = if update {
            match fs::read_to_string(path) {
                Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                    warn!(path = %path.display(), error = %e, "existing word map is not valid JSON, starting fresh");
                    WordIndex::new()
                }),
                Err(e) if e.kind() == ErrorKind::NotFound => WordIndex::new(),
                Err(e) => return Err(output_error(e)),
            }
        } else {
            remove_if_exists(path).map_err(output_error)?;
            WordIndex::new()
        };

        Ok((
            OutputSink::WordSnapshot {
                path: Some(path.to_path_buf()),
            },
            previous,
        ))
    }

    /// Writes one accepted URL. Word snapshots ignore single URLs.
    pub fn append_line(&mut self, url: &str) -> Result<()> {
        match self {
            // A closed stdout (`| head`) is an error here, not a panic
            OutputSink::Stdout => write_line(&mut io::stdout().lock(), url),
            OutputSink::Lines { file, .. } => write_line(file, url),
            OutputSink::WordSnapshot { .. } => Ok(()),
        }
    }

    /// Rewrites the JSON snapshot file. No-op for line sinks and stdout.
    pub fn write_snapshot(&mut self, words: &WordIndex) -> Result<()> {
        if let OutputSink::WordSnapshot { path: Some(path) } = self {
            let json = serde_json::to_string_pretty(words)?;
            fs::write(path, json)?;
        }
        Ok(())
    }

    /// Called once after the crawl: prints the word map when it has no file
    pub fn finish(&mut self, words: &WordIndex) -> Result<()> {
        match self {
            OutputSink::WordSnapshot { path: None } => {
                let json = serde_json::to_string_pretty(words)?;
                write_line(&mut io::stdout().lock(), &json)
            }
            OutputSink::Lines { file, .. } => Ok(file.flush()?),
            _ => Ok(()),
        }
    }

    /// Human-readable destination, for the options dump
    pub fn describe(&self) -> String {
        match self {
            OutputSink::Stdout | OutputSink::WordSnapshot { path: None } => "stdout".to_string(),
            OutputSink::Lines { path, .. } | OutputSink::WordSnapshot { path: Some(path) } => {
                path.display().to_string()
            }
        }
    }
}

fn write_line(out: &mut impl Write, line: &str) -> Result<()> {
    writeln!(out, "{}", line)?;
    out.flush()?;
    Ok(())
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lines_append_in_update_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(&path, "https://Example.com/a/\n\n").unwrap();

        let (mut sink, previous) = OutputSink::open_lines(Some(&path), true).unwrap();
        assert_eq!(previous, vec!["https://example.com/a".to_string()]);

        sink.append_line("https://example.com/b").unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "https://Example.com/a/\n\nhttps://example.com/b\n");
    }

    #[test]
    fn test_lines_truncate_in_overwrite_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(&path, "old.example.com\n").unwrap();

        let (mut sink, previous) = OutputSink::open_lines(Some(&path), false).unwrap();
        assert!(previous.is_empty());

        sink.append_line("new.example.com").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new.example.com\n");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_closed_output_is_an_error() {
        let err = write_line(&mut ClosedPipe, "https://example.com").unwrap_err();
        assert!(matches!(err, CrawlError::Io(ref e) if e.kind() == ErrorKind::BrokenPipe));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_no_output_means_stdout() {
        let (sink, previous) = OutputSink::open_lines(None, true).unwrap();
        assert!(matches!(sink, OutputSink::Stdout));
        assert!(previous.is_empty());
        assert_eq!(sink.describe(), "stdout");
    }

    #[test]
    fn test_unwritable_output_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("urls.txt");
        let err = OutputSink::open_lines(Some(&path), true).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_word_snapshot_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words.json");

        let (mut sink, previous) = OutputSink::open_words(Some(&path), false).unwrap();
        assert!(previous.is_empty());

        let mut words = WordIndex::new();
        words.insert(
            "https://example.com".to_string(),
            WordMap::from([("web".to_string(), 2)]),
        );
        sink.write_snapshot(&words).unwrap();

        let reloaded: WordIndex = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded, words);
    }

    #[test]
    fn test_word_snapshot_reloaded_in_update_mode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words.json");
        fs::write(&path, r#"{"https://example.com": {"web": 3}}"#).unwrap();

        let (_, previous) = OutputSink::open_words(Some(&path), true).unwrap();
        assert_eq!(previous["https://example.com"]["web"], 3);
    }
}
