//! Client side of the annotation portal: form login and the two daily
//! report endpoints.

pub mod auth;
mod html;
pub mod reports;

pub use auth::{login, Session};
pub use reports::{fetch_qc_report, fetch_work_hours};
