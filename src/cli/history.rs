//! `history` command: list stored analyses

use crate::store::{AnalysisStore, JsonStore};
use anyhow::Result;
use console::style;

pub(crate) fn run(limit: usize) -> Result<()> {
    let store = JsonStore::open_default()?;
    let records = store.list()?;

    if records.is_empty() {
        println!("No stored analyses yet. Run `retrocode analyze <file>` first.");
        return Ok(());
    }

    println!(
        "{}",
        style(format!("{} stored analyses (newest first)", records.len())).bold()
    );
    for record in records.iter().take(limit) {
        println!(
            "  {}  {}  {:>5.1}  {}  {}",
            style(&record.id[..8.min(record.id.len())]).dim(),
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.analysis.report.quality_score,
            record.analysis.language,
            record.analysis.title,
        );
    }
    if records.len() > limit {
        println!(
            "{}",
            style(format!("  ... and {} more", records.len() - limit)).dim()
        );
    }

    Ok(())
}
