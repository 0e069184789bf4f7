//! Per-month table naming.
//!
//! Each calendar month gets its own pair of tables, `<Month>_<Year>` for
//! hourly rows and `<Month>_<Year>_daily_summary` for the day totals. Names
//! only ever reach SQL through [`quote_ident`].

use chrono::NaiveDate;
use rusqlite::Connection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTables {
    /// `September_2025`
    pub period: String,
    pub hourly: String,
    pub summary: String,
}

impl MonthlyTables {
    pub fn for_date(date: NaiveDate) -> Self {
        let period = date.format("%B_%Y").to_string();
        Self {
            hourly: period.clone(),
            summary: format!("{period}_daily_summary"),
            period,
        }
    }

    pub fn hourly_ident(&self) -> String {
        quote_ident(&self.hourly)
    }

    pub fn summary_ident(&self) -> String {
        quote_ident(&self.summary)
    }

    /// `CREATE TABLE IF NOT EXISTS` for both tables.
    pub fn create_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {hourly} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                hour TEXT NOT NULL,
                post_qc INTEGER NOT NULL DEFAULT 0,
                post_approved INTEGER NOT NULL DEFAULT 0,
                post_skipped INTEGER NOT NULL DEFAULT 0,
                post_reannotated INTEGER NOT NULL DEFAULT 0,
                comment_qc INTEGER NOT NULL DEFAULT 0,
                comment_approved INTEGER NOT NULL DEFAULT 0,
                comment_skipped INTEGER NOT NULL DEFAULT 0,
                comment_reannotated INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                UNIQUE (date, hour)
            );
            CREATE TABLE IF NOT EXISTS {summary} (
                date TEXT PRIMARY KEY,
                post_qc INTEGER NOT NULL DEFAULT 0,
                post_approved INTEGER NOT NULL DEFAULT 0,
                post_skipped INTEGER NOT NULL DEFAULT 0,
                post_reannotated INTEGER NOT NULL DEFAULT 0,
                comment_qc INTEGER NOT NULL DEFAULT 0,
                comment_approved INTEGER NOT NULL DEFAULT 0,
                comment_skipped INTEGER NOT NULL DEFAULT 0,
                comment_reannotated INTEGER NOT NULL DEFAULT 0,
                total_work_hours REAL NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );",
            hourly = self.hourly_ident(),
            summary = self.summary_ident(),
        )
    }
}

/// Quote `name` as an SQLite identifier, doubling any embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn table_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [name],
        |row| row.get(0),
    )
}
