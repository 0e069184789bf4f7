//! Persisted per-hour QC activity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::QcCounts;

/// One hour bucket with non-zero activity, unique per (date, hour).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HourlyRow {
    pub date: NaiveDate,
    pub hour: String,
    pub counts: QcCounts,
    pub created_at: DateTime<Utc>,
}
