use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};

use crate::db::{
    connection::Database,
    helpers::{counts_from_row, counts_to_sql, format_date, parse_date, parse_datetime},
    models::HourlyRow,
    monthly::{table_exists, MonthlyTables},
};
use crate::models::HourlyEntry;

fn row_to_hourly(row: &Row) -> Result<HourlyRow> {
    let date: String = row.get(0)?;
    let created_at: String = row.get(10)?;
    Ok(HourlyRow {
        date: parse_date(&date, "date")?,
        hour: row.get(1)?,
        counts: counts_from_row(row, 2)?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

pub(crate) fn delete_hourly_rows(
    conn: &Connection,
    tables: &MonthlyTables,
    date: NaiveDate,
) -> Result<usize> {
    let sql = format!("DELETE FROM {} WHERE date = ?1", tables.hourly_ident());
    conn.execute(&sql, params![format_date(date)])
        .with_context(|| format!("failed to clear hourly rows for {date}"))
}

/// Insert the hour, or overwrite the counters of an existing (date, hour).
pub(crate) fn upsert_hourly_row(
    conn: &Connection,
    tables: &MonthlyTables,
    date: NaiveDate,
    entry: &HourlyEntry,
    now: DateTime<Utc>,
) -> Result<()> {
    let sql = format!(
        "INSERT INTO {} (
            date, hour,
            post_qc, post_approved, post_skipped, post_reannotated,
            comment_qc, comment_approved, comment_skipped, comment_reannotated,
            created_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT(date, hour) DO UPDATE SET
            post_qc = excluded.post_qc,
            post_approved = excluded.post_approved,
            post_skipped = excluded.post_skipped,
            post_reannotated = excluded.post_reannotated,
            comment_qc = excluded.comment_qc,
            comment_approved = excluded.comment_approved,
            comment_skipped = excluded.comment_skipped,
            comment_reannotated = excluded.comment_reannotated,
            created_at = excluded.created_at",
        tables.hourly_ident()
    );
    let [a, b, c, d, e, f, g, h] = counts_to_sql(&entry.counts)?;
    conn.execute(
        &sql,
        params![
            format_date(date),
            entry.hour,
            a,
            b,
            c,
            d,
            e,
            f,
            g,
            h,
            now.to_rfc3339(),
        ],
    )
    .with_context(|| format!("failed to upsert hourly row {date} {}", entry.hour))?;
    Ok(())
}

impl Database {
    /// Hourly rows stored for `date`, in insertion order. Empty when the
    /// month's table does not exist yet.
    pub async fn hourly_rows(&self, date: NaiveDate) -> Result<Vec<HourlyRow>> {
        self.execute(move |conn| {
            let tables = MonthlyTables::for_date(date);
            if !table_exists(conn, &tables.hourly)? {
                return Ok(Vec::new());
            }

            let sql = format!(
                "SELECT date, hour,
                        post_qc, post_approved, post_skipped, post_reannotated,
                        comment_qc, comment_approved, comment_skipped, comment_reannotated,
                        created_at
                 FROM {}
                 WHERE date = ?1
                 ORDER BY id ASC",
                tables.hourly_ident()
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params![format_date(date)])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(row_to_hourly(row)?);
            }
            Ok(out)
        })
        .await
    }
}
