//! Report types handed to the reporters

use crate::phrases::{RankedEntry, Ranking};
use crate::pipeline::parallel::{RunOutcome, SourceReport};
use serde::Serialize;

/// Everything a reporter needs to render one run
#[derive(Debug, Clone, Serialize)]
pub struct PhraseReport {
    /// Highest count first; empty when no phrases were found
    pub phrases: Vec<RankedEntry>,
    /// Distinct phrases across all completed sources
    pub distinct_phrases: usize,
    /// Total phrase occurrences across all completed sources
    pub total_phrases: u64,
    pub sources: Vec<SourceSummary>,
}

impl PhraseReport {
    pub fn new(ranking: Ranking, outcome: &RunOutcome) -> Self {
        let phrases = match ranking {
            Ranking::NoPhrases => Vec::new(),
            Ranking::Top(entries) => entries,
        };
        Self {
            phrases,
            distinct_phrases: outcome.merged.len(),
            total_phrases: outcome.merged.total(),
            sources: outcome.reports.iter().map(SourceSummary::from).collect(),
        }
    }

    /// True when no source produced a single phrase.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

/// What happened to one input source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub name: String,
    pub lines: usize,
    pub tokens: usize,
    pub phrases: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&SourceReport> for SourceSummary {
    fn from(report: &SourceReport) -> Self {
        match &report.outcome {
            Ok(stats) => SourceSummary {
                name: report.source.name(),
                lines: stats.lines,
                tokens: stats.tokens,
                phrases: stats.phrases,
                error: None,
            },
            Err(e) => SourceSummary {
                name: report.source.name(),
                error: Some(e.to_string()),
                ..Default::default()
            },
        }
    }
}
