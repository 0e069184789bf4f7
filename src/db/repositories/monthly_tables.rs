use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::db::{
    connection::Database,
    helpers::parse_datetime,
    models::MonthlyTablesRecord,
    monthly::{table_exists, MonthlyTables},
};

fn row_to_record(row: &Row) -> Result<MonthlyTablesRecord> {
    let created_at: String = row.get("created_at")?;
    Ok(MonthlyTablesRecord {
        period: row.get("period")?,
        hourly_table: row.get("hourly_table")?,
        summary_table: row.get("summary_table")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

/// Create the month's table pair if missing and record it in the registry.
/// Returns `true` when the hourly table did not exist before.
pub(crate) fn ensure_monthly_tables(
    conn: &Connection,
    tables: &MonthlyTables,
    now: DateTime<Utc>,
) -> Result<bool> {
    let existed = table_exists(conn, &tables.hourly)
        .with_context(|| format!("failed to look up table {}", tables.hourly))?;

    conn.execute_batch(&tables.create_sql())
        .with_context(|| format!("failed to create tables for {}", tables.period))?;

    conn.execute(
        "INSERT OR IGNORE INTO monthly_tables (period, hourly_table, summary_table, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![tables.period, tables.hourly, tables.summary, now.to_rfc3339()],
    )
    .context("failed to register monthly tables")?;

    Ok(!existed)
}

impl Database {
    /// Months that have tables, oldest registration first.
    pub async fn monthly_periods(&self) -> Result<Vec<MonthlyTablesRecord>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT period, hourly_table, summary_table, created_at
                 FROM monthly_tables
                 ORDER BY created_at ASC, period ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                records.push(row_to_record(row)?);
            }
            Ok(records)
        })
        .await
    }
}
