//! JSON reporter
//!
//! Outputs the full PhraseReport as pretty-printed JSON.

use crate::models::PhraseReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &PhraseReport) -> Result<String> {
    let mut out = serde_json::to_string_pretty(report)?;
    out.push('\n');
    Ok(out)
}
