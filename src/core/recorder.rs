use crate::core::history::HistoryLog;
use crate::domain::model::{normalize, Candidate};
use crate::utils::error::Result;
use chrono::{Local, NaiveDateTime};

/// Titles as they are written to the log: link suffix dropped, whitespace collapsed.
pub fn log_titles(picks: &[Candidate]) -> Vec<String> {
    picks.iter().map(|c| normalize(&c.title)).collect()
}

/// Persist one finished draw. Nothing is written for an empty draw.
pub fn record(log: &HistoryLog, picks: &[Candidate]) -> Result<()> {
    record_at(log, picks, Local::now().naive_local())
}

pub fn record_at(log: &HistoryLog, picks: &[Candidate], now: NaiveDateTime) -> Result<()> {
    if picks.is_empty() {
        return Ok(());
    }
    let titles = log_titles(picks);
    log.append_at(&titles, now)?;
    tracing::info!("📝 Recorded {} picks to {}", titles.len(), log.path().display());
    Ok(())
}
