//! Portal report envelopes.
//!
//! Both report endpoints answer with `{ "issuccess": bool, "data": [...] }`.
//! The payload is only read once the envelope reports success, so a failed
//! response never fails to parse because of what it carries. Hour records
//! keep their counters as raw JSON values; they are coerced to integers when
//! a day is summarized so a bad field can be reported with the record it
//! came from.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// A JSON response carrying a success flag and a payload sequence.
#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub issuccess: bool,
    /// `None` when the envelope failed or carried `null`.
    pub data: Option<Vec<T>>,
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    issuccess: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Value,
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Envelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnvelope::deserialize(deserializer)?;

        let data = if raw.issuccess && !raw.data.is_null() {
            Some(Vec::<T>::deserialize(raw.data).map_err(<D::Error as de::Error>::custom)?)
        } else {
            None
        };
        let message = match raw.message {
            Value::Null => None,
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        };

        Ok(Self {
            issuccess: raw.issuccess,
            data,
            message,
        })
    }
}

impl<T> Envelope<T> {
    pub fn succeeded(data: Vec<T>) -> Self {
        Self {
            issuccess: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn failed() -> Self {
        Self {
            issuccess: false,
            data: None,
            message: None,
        }
    }

    /// Payload records; a `null` or absent `data` reads as empty.
    pub fn records(&self) -> &[T] {
        self.data.as_deref().unwrap_or(&[])
    }
}

pub type QcEnvelope = Envelope<HourRecord>;
pub type WorkEnvelope = Envelope<WorkHourRecord>;

/// QC activity for one hour bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct HourRecord {
    /// Provider's hour-bucket label, e.g. `"07:00 AM"`.
    #[serde(rename = "date", alias = "hourLabel", alias = "hour")]
    pub hour_label: String,
    #[serde(rename = "totalPostQC", alias = "post_qc", default)]
    pub post_qc: Value,
    #[serde(rename = "totalPostApproved", alias = "post_approved", default)]
    pub post_approved: Value,
    #[serde(rename = "totalPostSkiped", alias = "post_skipped", default)]
    pub post_skipped: Value,
    #[serde(rename = "totalPostReannotated", alias = "post_reannotated", default)]
    pub post_reannotated: Value,
    #[serde(rename = "totalCommentQC", alias = "comment_qc", default)]
    pub comment_qc: Value,
    #[serde(rename = "totalCommentApproved", alias = "comment_approved", default)]
    pub comment_approved: Value,
    #[serde(rename = "totalCommentSkiped", alias = "comment_skipped", default)]
    pub comment_skipped: Value,
    #[serde(rename = "totalCommentReannotated", alias = "comment_reannotated", default)]
    pub comment_reannotated: Value,
}

impl HourRecord {
    /// The eight counters in storage column order.
    pub fn raw_counts(&self) -> [(&'static str, &Value); 8] {
        [
            ("post_qc", &self.post_qc),
            ("post_approved", &self.post_approved),
            ("post_skipped", &self.post_skipped),
            ("post_reannotated", &self.post_reannotated),
            ("comment_qc", &self.comment_qc),
            ("comment_approved", &self.comment_approved),
            ("comment_skipped", &self.comment_skipped),
            ("comment_reannotated", &self.comment_reannotated),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkHourRecord {
    #[serde(rename = "totalWorkHour", alias = "total_work_hour", default)]
    pub total_work_hour: Value,
}

impl WorkEnvelope {
    /// Worked hours for the day: the first record, or zero when there is none.
    /// A value that is not a non-negative number comes back as the error.
    pub fn total_work_hours(&self) -> Result<f64, &Value> {
        match self.records().first() {
            Some(record) => coerce_hours(&record.total_work_hour).ok_or(&record.total_work_hour),
            None => Ok(0.0),
        }
    }
}

/// Read worked hours. `null` counts as zero; numbers and numeric strings
/// must be finite and non-negative.
pub fn coerce_hours(value: &Value) -> Option<f64> {
    let hours = match value {
        Value::Null => return Some(0.0),
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (hours.is_finite() && hours >= 0.0).then_some(hours)
}

/// Read a counter as a non-negative integer.
///
/// Accepts JSON integers, integral floats (`3.0`) and decimal strings
/// (`"3"`). Anything else, including `null`, is rejected.
pub fn coerce_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
}
