mod utils;

pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod models;
pub mod pipeline;
pub mod portal;

use std::process::ExitCode;

use chrono::Local;
use config::AppConfig;
use error::RunError;
use ledger::PersistOutcome;

const ENABLE_LOGS: bool = true;

/// Collect today's reports. Status lines go to stdout, diagnostics to the
/// logger.
pub fn run() -> ExitCode {
    utils::logging::init();
    log_info!("qc-ledger starting up...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => return fail(RunError::from(err)),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            println!("Failed to start async runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let today = Local::now().date_naive();
    match runtime.block_on(pipeline::collect_day(&config, today)) {
        Ok(PersistOutcome::Saved(report)) => {
            let t = report.totals;
            println!(
                "Data saved to table {} in {} for {}",
                report.hourly_table,
                config.db_path.display(),
                report.date
            );
            println!(
                "  {} active hours | posts qc/approved/skipped/reannotated: {}/{}/{}/{} | comments: {}/{}/{}/{} | work hours: {}",
                report.hourly_rows,
                t.post_qc,
                t.post_approved,
                t.post_skipped,
                t.post_reannotated,
                t.comment_qc,
                t.comment_approved,
                t.comment_skipped,
                t.comment_reannotated,
                report.total_work_hours
            );
            ExitCode::SUCCESS
        }
        Ok(PersistOutcome::SkippedNoData) => {
            println!("No data available to save.");
            ExitCode::SUCCESS
        }
        Err(err) => fail(err),
    }
}

fn fail(err: RunError) -> ExitCode {
    println!("{err}");
    log_error!("Run aborted: {err:?}");
    ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1))
}
