//! Turning a day's reports into stored rows.

mod summary;

use chrono::{DateTime, NaiveDate, Utc};

use crate::db::Database;
use crate::error::PersistError;
use crate::models::{QcCounts, QcEnvelope, WorkEnvelope};
use crate::{log_info, log_warn};

pub use summary::summarize_day;

const ENABLE_LOGS: bool = true;

/// Result of a persist call that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOutcome {
    Saved(SaveReport),
    /// One of the envelopes reported failure; nothing was written.
    SkippedNoData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveReport {
    pub date: NaiveDate,
    pub hourly_table: String,
    pub summary_table: String,
    pub created_tables: bool,
    pub hourly_rows: usize,
    pub totals: QcCounts,
    pub total_work_hours: f64,
}

/// Both envelopes must report success before anything is written.
pub fn has_data(qc: &QcEnvelope, work: &WorkEnvelope) -> bool {
    qc.issuccess && work.issuccess
}

/// Store `date`'s reports, replacing whatever was stored for that date.
pub async fn persist(
    db: &Database,
    qc: &QcEnvelope,
    work: &WorkEnvelope,
    date: NaiveDate,
) -> Result<PersistOutcome, PersistError> {
    persist_at(db, qc, work, date, Utc::now()).await
}

pub async fn persist_at(
    db: &Database,
    qc: &QcEnvelope,
    work: &WorkEnvelope,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<PersistOutcome, PersistError> {
    if !has_data(qc, work) {
        log_warn!(
            "Skipping {date}: qc issuccess={}, work hours issuccess={}",
            qc.issuccess,
            work.issuccess
        );
        return Ok(PersistOutcome::SkippedNoData);
    }

    let summary = summarize_day(qc, work, date)?;
    let totals = summary.totals;
    let total_work_hours = summary.total_work_hours;

    let saved = db.save_day(summary, now).await?;
    if saved.created_tables {
        log_info!("Created tables for {}", saved.tables.period);
    }
    log_info!(
        "Saved {date}: {} hourly rows (replaced {}), {total_work_hours} work hours",
        saved.hourly_rows,
        saved.replaced_rows
    );

    Ok(PersistOutcome::Saved(SaveReport {
        date,
        hourly_table: saved.tables.hourly,
        summary_table: saved.tables.summary,
        created_tables: saved.created_tables,
        hourly_rows: saved.hourly_rows,
        totals,
        total_work_hours,
    }))
}
