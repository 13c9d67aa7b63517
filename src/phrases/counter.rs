//! Phrase occurrence counting and merging

use super::Phrase;
use indexmap::map::Entry;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// Phrase → occurrence count.
///
/// Every stored count is at least 1; an absent phrase counts as 0. Phrases keep
/// the position of their first insertion, which only matters for
/// [`TieBreak::Legacy`](super::TieBreak::Legacy) ranking.
#[derive(Debug, Clone, Default)]
pub struct PhraseCounter {
    counts: IndexMap<Phrase, u64, FxBuildHasher>,
}

impl PhraseCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `phrase`.
    pub fn increment(&mut self, phrase: Phrase) {
        self.add(phrase, 1);
    }

    fn add(&mut self, phrase: Phrase, n: u64) {
        match self.counts.entry(phrase) {
            Entry::Occupied(mut e) => *e.get_mut() += n,
            Entry::Vacant(e) => {
                e.insert(n);
            }
        }
    }

    /// Occurrences of `phrase` (0 when never seen).
    pub fn get(&self, phrase: &str) -> u64 {
        self.counts.get(phrase).copied().unwrap_or(0)
    }

    /// Number of distinct phrases.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&Phrase, u64)> + ExactSizeIterator {
        self.counts.iter().map(|(p, c)| (p, *c))
    }

    /// Fold `src` into `self`, summing shared phrases. Phrases new to `self`
    /// are appended in `src` order.
    pub fn merge_from(&mut self, src: PhraseCounter) {
        if self.counts.is_empty() {
            self.counts = src.counts;
            return;
        }
        self.counts.reserve(src.counts.len());
        for (phrase, n) in src.counts {
            self.add(phrase, n);
        }
    }

    /// Consume `src` into `self` and hand `self` back as the merged counter.
    pub fn merge(mut self, src: PhraseCounter) -> PhraseCounter {
        self.merge_from(src);
        self
    }

    /// Merge any number of counters left to right. No input yields an empty counter.
    pub fn merge_all<I>(counters: I) -> PhraseCounter
    where
        I: IntoIterator<Item = PhraseCounter>,
    {
        counters
            .into_iter()
            .fold(PhraseCounter::new(), PhraseCounter::merge)
    }
}

impl FromIterator<Phrase> for PhraseCounter {
    fn from_iter<T: IntoIterator<Item = Phrase>>(iter: T) -> Self {
        let mut counter = PhraseCounter::new();
        counter.extend(iter);
        counter
    }
}

impl Extend<Phrase> for PhraseCounter {
    fn extend<T: IntoIterator<Item = Phrase>>(&mut self, iter: T) {
        for phrase in iter {
            self.increment(phrase);
        }
    }
}

impl PartialEq for PhraseCounter {
    /// Counters are equal when they hold the same phrase → count mapping,
    /// whatever order the phrases were first seen in.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(p, c)| other.get(p) == c)
    }
}

impl Eq for PhraseCounter {}
