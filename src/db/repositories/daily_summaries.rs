use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    helpers::{counts_from_row, counts_to_sql, format_date, parse_date, parse_datetime},
    models::DailySummaryRow,
    monthly::{table_exists, MonthlyTables},
};
use crate::models::DaySummary;

use super::{
    hourly_rows::{delete_hourly_rows, upsert_hourly_row},
    monthly_tables::ensure_monthly_tables,
};

fn row_to_summary(row: &Row) -> Result<DailySummaryRow> {
    let date: String = row.get(0)?;
    let created_at: String = row.get(10)?;
    Ok(DailySummaryRow {
        date: parse_date(&date, "date")?,
        totals: counts_from_row(row, 1)?,
        total_work_hours: row.get(9)?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

fn replace_daily_summary(
    conn: &Connection,
    tables: &MonthlyTables,
    summary: &DaySummary,
    now: DateTime<Utc>,
) -> Result<()> {
    let sql = format!(
        "INSERT OR REPLACE INTO {} (
            date,
            post_qc, post_approved, post_skipped, post_reannotated,
            comment_qc, comment_approved, comment_skipped, comment_reannotated,
            total_work_hours, created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        tables.summary_ident()
    );
    let [a, b, c, d, e, f, g, h] = counts_to_sql(&summary.totals)?;
    conn.execute(
        &sql,
        params![
            format_date(summary.date),
            a,
            b,
            c,
            d,
            e,
            f,
            g,
            h,
            summary.total_work_hours,
            now.to_rfc3339(),
        ],
    )
    .with_context(|| format!("failed to write daily summary for {}", summary.date))?;
    Ok(())
}

/// What a successful [`Database::save_day`] touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDay {
    pub tables: MonthlyTables,
    pub created_tables: bool,
    pub replaced_rows: usize,
    pub hourly_rows: usize,
}

impl Database {
    /// Write one day in a single transaction: make sure the month's tables
    /// exist, drop that date's hourly rows, upsert the active hours and
    /// replace the daily summary. Nothing is visible unless all of it lands.
    pub async fn save_day(&self, summary: DaySummary, now: DateTime<Utc>) -> Result<SavedDay> {
        self.execute(move |conn| {
            let tables = MonthlyTables::for_date(summary.date);
            let tx = conn
                .transaction()
                .context("failed to open write transaction")?;

            let created_tables = ensure_monthly_tables(&tx, &tables, now)?;
            let replaced_rows = delete_hourly_rows(&tx, &tables, summary.date)?;
            for entry in &summary.hourly {
                upsert_hourly_row(&tx, &tables, summary.date, entry, now)?;
            }
            replace_daily_summary(&tx, &tables, &summary, now)?;

            tx.commit().context("failed to commit daily write")?;

            Ok(SavedDay {
                tables,
                created_tables,
                replaced_rows,
                hourly_rows: summary.hourly.len(),
            })
        })
        .await
    }

    pub async fn daily_summary(&self, date: NaiveDate) -> Result<Option<DailySummaryRow>> {
        self.execute(move |conn| {
            let tables = MonthlyTables::for_date(date);
            if !table_exists(conn, &tables.summary)? {
                return Ok(None);
            }

            let sql = format!(
                "SELECT date,
                        post_qc, post_approved, post_skipped, post_reannotated,
                        comment_qc, comment_approved, comment_skipped, comment_reannotated,
                        total_work_hours, created_at
                 FROM {}
                 WHERE date = ?1",
                tables.summary_ident()
            );
            let mut stmt = conn.prepare(&sql)?;
            let row = stmt
                .query_row(params![format_date(date)], |row| Ok(row_to_summary(row)))
                .optional()?;
            row.transpose()
        })
        .await
    }
}
