mod daily_summaries;
mod hourly_rows;
mod monthly_tables;

pub use daily_summaries::SavedDay;
