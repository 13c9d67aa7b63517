//! Phrase extraction and counting
//!
//! The pieces chain per source:
//!
//! ```text
//! line ──normalize_line──▶ tokens ──PhraseWindow──▶ phrases ──▶ PhraseCounter
//! ```
//!
//! Counters from every source are then merged and handed to a [`Ranker`].

mod counter;
mod normalizer;
mod ranker;
mod window;

pub use counter::PhraseCounter;
pub use normalizer::{normalize_line, NormalizedLine, STRIPPED_PUNCTUATION};
pub use ranker::{RankedEntry, Ranker, Ranking, TieBreak, DEFAULT_LIMIT};
pub use window::{PhraseWindow, PHRASE_LEN};

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Three normalized tokens joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Phrase(String);

impl Phrase {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Phrase {
    fn from(s: String) -> Self {
        Phrase(s)
    }
}

impl From<&str> for Phrase {
    fn from(s: &str) -> Self {
        Phrase(s.to_string())
    }
}

impl From<Phrase> for String {
    fn from(p: Phrase) -> Self {
        p.0
    }
}

impl Deref for Phrase {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Phrase {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Count every phrase in `lines` as a single source.
///
/// ```
/// use phrasecount::phrases::count_phrases;
///
/// let counter = count_phrases(["the cat sat on the mat. the cat ran."]);
/// assert_eq!(counter.len(), 7);
/// assert_eq!(counter.get("the cat sat"), 1);
/// ```
pub fn count_phrases<I, S>(lines: I) -> PhraseCounter
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut window = PhraseWindow::new();
    let mut counter = PhraseCounter::new();
    for line in lines {
        let normalized = normalize_line(line.as_ref());
        counter.extend(window.phrases(normalized.tokens()));
    }
    counter
}

/// Count each source separately, merge them and rank the result.
///
/// Phrases never span two sources.
pub fn rank_sources<I, L, S>(sources: I, ranker: &Ranker) -> Ranking
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let merged = PhraseCounter::merge_all(sources.into_iter().map(count_phrases));
    ranker.rank(&merged)
}
