pub mod counts;
pub mod report;
pub mod summary;

pub use counts::QcCounts;
pub use report::{
    coerce_count, coerce_hours, Envelope, HourRecord, QcEnvelope, WorkEnvelope, WorkHourRecord,
};
pub use summary::{DaySummary, HourlyEntry};
