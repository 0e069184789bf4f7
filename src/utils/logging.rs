//! Logger setup plus module-gated logging macros.
//!
//! Every module that logs declares a flag and then uses the macros exported
//! at the crate root:
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_info};
//!
//! log_info!("fetched {} hour buckets", 12);
//! ```
//! Flipping the flag to `false` silences one module without touching the
//! `RUST_LOG` filter.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install `env_logger` once per process. Reads `RUST_LOG`, defaulting to
/// `info` so a bare run still reports progress on stderr.
pub fn init() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or("info"),
        )
        .format_timestamp_secs()
        .try_init();
    });
}

#[doc(hidden)]
#[macro_export]
macro_rules! log_gated {
    ($level:ident, $($arg:tt)*) => {
        if ENABLE_LOGS {
            log::$level!($($arg)*);
        }
    };
}

/// Info logging, skipped when the calling module sets `ENABLE_LOGS = false`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::log_gated!(info, $($arg)*) };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::log_gated!(warn, $($arg)*) };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::log_gated!(error, $($arg)*) };
}

/// Debug logging for request/response detail. Never pass secrets.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::log_gated!(debug, $($arg)*) };
}
