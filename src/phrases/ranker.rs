//! Top-N selection over a merged counter
//!
//! Entries are ordered by count, highest first. Ties are resolved by a
//! [`TieBreak`] policy:
//!
//! - `Lexical` (default): equal counts are ordered by ascending phrase text,
//!   so output never depends on input order or hashing.
//! - `Legacy`: equal counts come out in the reverse of the order the phrases
//!   were first counted. This is what a stable ascending sort read back from
//!   the end produces, and matches the historical output byte for byte.

use super::{Phrase, PhraseCounter};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Entries reported when no limit is given.
pub const DEFAULT_LIMIT: usize = 100;

/// How to order phrases that share a count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    #[default]
    Lexical,
    Legacy,
}

impl FromStr for TieBreak {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lexical" => Ok(TieBreak::Lexical),
            "legacy" => Ok(TieBreak::Legacy),
            _ => Err(anyhow!(
                "Unknown tie-break '{}'. Valid values: lexical, legacy",
                s
            )),
        }
    }
}

impl std::fmt::Display for TieBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TieBreak::Lexical => write!(f, "lexical"),
            TieBreak::Legacy => write!(f, "legacy"),
        }
    }
}

/// One line of the ranked output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub phrase: Phrase,
    pub count: u64,
}

/// Result of ranking a counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ranking {
    /// The counter held no phrases at all.
    NoPhrases,
    /// Between one and `limit` entries, highest count first.
    Top(Vec<RankedEntry>),
}

impl Ranking {
    /// Ranked entries; empty for [`Ranking::NoPhrases`].
    pub fn entries(&self) -> &[RankedEntry] {
        match self {
            Ranking::NoPhrases => &[],
            Ranking::Top(entries) => entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Ranking::NoPhrases)
    }
}

/// Picks the most frequent phrases out of a counter.
#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    limit: usize,
    tie_break: TieBreak,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, TieBreak::default())
    }
}

impl Ranker {
    /// `limit` is clamped to at least 1.
    pub fn new(limit: usize, tie_break: TieBreak) -> Self {
        Self {
            limit: limit.max(1),
            tie_break,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Rank a counter snapshot. Returns `min(limit, distinct phrases)` entries.
    pub fn rank(&self, counter: &PhraseCounter) -> Ranking {
        if counter.is_empty() {
            return Ranking::NoPhrases;
        }

        let entries = match self.tie_break {
            TieBreak::Lexical => self.rank_lexical(counter),
            TieBreak::Legacy => self.rank_legacy(counter),
        };
        Ranking::Top(entries)
    }

    fn rank_lexical(&self, counter: &PhraseCounter) -> Vec<RankedEntry> {
        let mut entries: Vec<(&Phrase, u64)> = counter.iter().collect();
        let by_rank =
            |a: &(&Phrase, u64), b: &(&Phrase, u64)| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0));

        // Total order, so partitioning first and sorting the head is exact.
        if entries.len() > self.limit {
            entries.select_nth_unstable_by(self.limit - 1, by_rank);
            entries.truncate(self.limit);
        }
        entries.sort_unstable_by(by_rank);

        entries
            .into_iter()
            .map(|(phrase, count)| RankedEntry {
                phrase: phrase.clone(),
                count,
            })
            .collect()
    }

    fn rank_legacy(&self, counter: &PhraseCounter) -> Vec<RankedEntry> {
        // Reversed insertion order plus a stable descending sort is the same
        // sequence as a stable ascending sort read from the back.
        let mut entries: Vec<(&Phrase, u64)> = counter.iter().rev().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        entries
            .into_iter()
            .take(self.limit)
            .map(|(phrase, count)| RankedEntry {
                phrase: phrase.clone(),
                count,
            })
            .collect()
    }
}
