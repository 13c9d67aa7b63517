//! Output reporters for phrase counts
//!
//! Supports two output formats:
//! - `text` - `<phrase> - <count>` per line, or `No phrases found.`
//! - `json` - Machine-readable JSON with per-source summaries

mod json;
mod text;

use crate::models::PhraseReport;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render a report in the specified format
pub fn report_with_format(report: &PhraseReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::SourceSummary;
    use crate::phrases::RankedEntry;

    /// A small report with two phrases and one failed source
    pub(crate) fn test_report() -> PhraseReport {
        PhraseReport {
            phrases: vec![
                RankedEntry {
                    phrase: "x y z".into(),
                    count: 3,
                },
                RankedEntry {
                    phrase: "a b c".into(),
                    count: 2,
                },
            ],
            distinct_phrases: 2,
            total_phrases: 5,
            sources: vec![
                SourceSummary {
                    name: "<stdin>".into(),
                    lines: 4,
                    tokens: 9,
                    phrases: 5,
                    error: None,
                },
                SourceSummary {
                    name: "missing.txt".into(),
                    error: Some("failed to open missing.txt: not found".into()),
                    ..Default::default()
                },
            ],
        }
    }

    pub(crate) fn empty_report() -> PhraseReport {
        PhraseReport {
            phrases: Vec::new(),
            distinct_phrases: 0,
            total_phrases: 0,
            sources: Vec::new(),
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_report_dispatch() {
        let r = test_report();
        let text = report_with_format(&r, OutputFormat::Text).unwrap();
        assert!(text.starts_with("x y z - 3"));
        let json = report_with_format(&r, OutputFormat::Json).unwrap();
        assert!(json.trim_start().starts_with('{'));
    }
}
