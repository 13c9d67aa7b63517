//! Source runner
//!
//! A source is one independent origin of text: piped stdin or a single file.
//! Each source is read line by line and counted on its own, with its own
//! [`PhraseWindow`] and [`PhraseCounter`]. Nothing here is shared between
//! sources; [`parallel`] runs them side by side and merges afterwards.

pub mod parallel;

use crate::phrases::{normalize_line, PhraseCounter, PhraseWindow};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Where a stream of lines comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    /// Name used in diagnostics and reports.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Open the source for line reading.
    pub fn open(&self) -> Result<LineReader<Box<dyn Read + Send>>, SourceError> {
        let reader: Box<dyn Read + Send> = match self {
            Source::Stdin => Box::new(io::stdin()),
            Source::File(path) => Box::new(File::open(path).map_err(|e| SourceError::Open {
                source_name: self.name(),
                source: e,
            })?),
        };
        Ok(LineReader::new(reader))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => write!(f, "<stdin>"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::File(path.to_path_buf())
    }
}

/// Errors that stop a single source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to open {source_name}: {source}")]
    Open {
        source_name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {source_name} at line {line}: {source}")]
    Read {
        source_name: String,
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("{source_name} was cancelled after another source failed")]
    Cancelled { source_name: String },
}

impl SourceError {
    /// Name of the source that failed.
    pub fn source_name(&self) -> &str {
        match self {
            SourceError::Open { source_name, .. }
            | SourceError::Read { source_name, .. }
            | SourceError::Cancelled { source_name } => source_name,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SourceError::Cancelled { .. })
    }
}

/// Reads `\n`-terminated lines as text.
///
/// A trailing `\r` is dropped so CRLF files split the same as LF files, and
/// bytes that are not valid UTF-8 are replaced rather than failing the source.
pub struct LineReader<R> {
    inner: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            buf: Vec::with_capacity(256),
        }
    }
}

impl<R: Read> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.inner.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Per-source counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SourceStats {
    pub lines: usize,
    pub tokens: usize,
    pub phrases: u64,
}

/// A finished source: its phrase counts plus what was read.
#[derive(Debug, Clone)]
pub struct SourceCount {
    pub counter: PhraseCounter,
    pub stats: SourceStats,
}

/// Count the phrases of one source from its lines.
///
/// `cancel` is checked before each line; once set, counting stops with
/// [`SourceError::Cancelled`].
pub fn count_lines<I>(
    source_name: &str,
    lines: I,
    cancel: Option<&AtomicBool>,
) -> Result<SourceCount, SourceError>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut window = PhraseWindow::new();
    let mut counter = PhraseCounter::new();
    let mut stats = SourceStats::default();

    for line in lines {
        if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            return Err(SourceError::Cancelled {
                source_name: source_name.to_string(),
            });
        }

        let line = line.map_err(|e| SourceError::Read {
            source_name: source_name.to_string(),
            line: stats.lines + 1,
            source: e,
        })?;
        stats.lines += 1;

        let normalized = normalize_line(&line);
        for token in normalized.tokens() {
            stats.tokens += 1;
            if let Some(phrase) = window.push(token) {
                stats.phrases += 1;
                counter.increment(phrase);
            }
        }
    }

    tracing::debug!(
        "{}: {} lines, {} tokens, {} phrases ({} distinct)",
        source_name,
        stats.lines,
        stats.tokens,
        stats.phrases,
        counter.len()
    );

    Ok(SourceCount { counter, stats })
}

/// Open `source` and count it.
pub fn count_source(
    source: &Source,
    cancel: Option<&AtomicBool>,
) -> Result<SourceCount, SourceError> {
    let lines = source.open()?;
    count_lines(&source.name(), lines, cancel)
}
