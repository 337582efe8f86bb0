//! JSON reporter
//!
//! Outputs the full stored record as pretty-printed JSON. Useful for
//! machine consumption, piping to jq, or further processing.

use crate::store::StoredAnalysis;
use anyhow::Result;

/// Render a stored analysis as JSON
pub fn render(record: &StoredAnalysis) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}
