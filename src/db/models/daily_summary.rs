//! Persisted per-day totals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::QcCounts;

/// Sum of every hour bucket for one date plus the day's worked hours.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DailySummaryRow {
    pub date: NaiveDate,
    pub totals: QcCounts,
    pub total_work_hours: f64,
    pub created_at: DateTime<Utc>,
}

/// Registry entry for a month whose tables exist.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyTablesRecord {
    pub period: String,
    pub hourly_table: String,
    pub summary_table: String,
    pub created_at: DateTime<Utc>,
}
