//! SQLite persistence for daily QC history.

pub mod connection;
mod helpers;
mod migrations;
pub mod models;
pub mod monthly;
mod repositories;

pub use connection::Database;
pub use models::{DailySummaryRow, HourlyRow, MonthlyTablesRecord};
pub use monthly::MonthlyTables;
pub use repositories::SavedDay;
