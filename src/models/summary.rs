use chrono::NaiveDate;
use serde::Serialize;

use super::QcCounts;

/// Counters for one hour bucket that had activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyEntry {
    pub hour: String,
    pub counts: QcCounts,
}

/// A normalized day ready to be written: the non-zero hours (one per
/// label) and the totals across every hour record received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub hourly: Vec<HourlyEntry>,
    pub totals: QcCounts,
    pub total_work_hours: f64,
}
