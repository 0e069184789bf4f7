use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

use crate::models::QcCounts;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

pub fn to_u64(value: i64, field: &str) -> Result<u64> {
    u64::try_from(value).map_err(|_| anyhow!("{field} contains negative value {value}"))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).with_context(|| format!("failed to parse {field}"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

/// Counters as SQLite integers, in column order.
pub fn counts_to_sql(counts: &QcCounts) -> Result<[i64; 8]> {
    let mut out = [0i64; 8];
    for (slot, value) in out.iter_mut().zip(counts.to_array()) {
        *slot = to_i64(value)?;
    }
    Ok(out)
}

/// Read the eight counter columns from a row selected with them in column
/// order starting at `offset`.
pub fn counts_from_row(row: &rusqlite::Row<'_>, offset: usize) -> Result<QcCounts> {
    let mut values = [0u64; 8];
    for (i, slot) in values.iter_mut().enumerate() {
        let raw: i64 = row.get(offset + i)?;
        *slot = to_u64(raw, QcCounts::COLUMNS[i])?;
    }
    Ok(QcCounts::from_array(values))
}
