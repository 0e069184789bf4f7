use chrono::NaiveDate;

use crate::error::PersistError;
use crate::models::{coerce_count, DaySummary, HourRecord, HourlyEntry, QcCounts, QcEnvelope, WorkEnvelope};
use crate::log_warn;

const ENABLE_LOGS: bool = true;

fn record_counts(index: usize, record: &HourRecord) -> Result<QcCounts, PersistError> {
    let mut values = [0u64; 8];
    for (slot, (field, raw)) in values.iter_mut().zip(record.raw_counts()) {
        *slot = coerce_count(raw).ok_or_else(|| PersistError::MalformedRecord {
            index,
            hour: record.hour_label.clone(),
            field,
            value: raw.to_string(),
        })?;
    }
    Ok(QcCounts::from_array(values))
}

/// Normalize both reports for `date`.
///
/// Every hour record counts towards the totals. Only hours with some
/// activity become hourly entries, and a label seen twice keeps the later
/// record's counters.
///
/// A repeated label is the one case where the totals differ from the sum of
/// the hourly entries: the totals keep both records while the hourly entry
/// keeps only the later one. A warning is logged when that happens.
pub fn summarize_day(
    qc: &QcEnvelope,
    work: &WorkEnvelope,
    date: NaiveDate,
) -> Result<DaySummary, PersistError> {
    let mut totals = QcCounts::default();
    let mut hourly: Vec<HourlyEntry> = Vec::new();

    for (index, record) in qc.records().iter().enumerate() {
        let counts = record_counts(index, record)?;
        totals += counts;

        if counts.is_zero() {
            continue;
        }
        match hourly.iter_mut().find(|e| e.hour == record.hour_label) {
            Some(existing) => {
                log_warn!(
                    "Hour '{}' repeated in report for {date}; keeping the later record",
                    record.hour_label
                );
                existing.counts = counts;
            }
            None => hourly.push(HourlyEntry {
                hour: record.hour_label.clone(),
                counts,
            }),
        }
    }

    let total_work_hours = work
        .total_work_hours()
        .map_err(|value| PersistError::MalformedWorkHours {
            value: value.to_string(),
        })?;

    Ok(DaySummary {
        date,
        hourly,
        totals,
        total_work_hours,
    })
}
