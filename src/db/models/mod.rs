pub mod daily_summary;
pub mod hourly_row;

pub use daily_summary::{DailySummaryRow, MonthlyTablesRecord};
pub use hourly_row::HourlyRow;
