//! Plain text reporter
//!
//! Kept free of styling so the output can be diffed and piped.

use crate::models::PhraseReport;
use anyhow::Result;

/// Printed instead of a ranking when nothing was counted.
pub const NO_PHRASES: &str = "No phrases found.";

/// Render report as `<phrase> - <count>` lines
pub fn render(report: &PhraseReport) -> Result<String> {
    if report.is_empty() {
        return Ok(format!("{NO_PHRASES}\n"));
    }

    let mut out = String::with_capacity(report.phrases.len() * 24);
    for entry in &report.phrases {
        out.push_str(&format!("{} - {}\n", entry.phrase, entry.count));
    }
    Ok(out)
}
