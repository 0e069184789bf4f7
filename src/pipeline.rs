use chrono::NaiveDate;

use crate::config::AppConfig;
use crate::db::Database;
use crate::error::{PersistError, RunError};
use crate::ledger::{self, PersistOutcome};
use crate::portal::{self, reports};
use crate::{log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// Log in, pull both reports for `date` and store them. Any failure ends the
/// run at that step; the database is only opened once there is data to write
/// and is closed again before this returns.
pub async fn collect_day(config: &AppConfig, date: NaiveDate) -> Result<PersistOutcome, RunError> {
    let credentials = &config.credentials;

    let session = portal::login(&config.portal, credentials).await?;

    let qc = reports::fetch_qc_report(&session, &config.portal, &credentials.annotator_id, date).await?;
    let work =
        reports::fetch_work_hours(&session, &config.portal, &credentials.annotator_id, date).await?;

    if !ledger::has_data(&qc, &work) {
        log_warn!(
            "Portal reported no data for {date} (qc: {:?}, work hours: {:?})",
            qc.message,
            work.message
        );
        return Ok(PersistOutcome::SkippedNoData);
    }

    let db_path = config.db_path.clone();
    let db = tokio::task::spawn_blocking(move || Database::new(db_path))
        .await
        .map_err(|err| PersistError::Storage(err.into()))?
        .map_err(PersistError::Storage)?;
    log_info!("Writing {date} to {}", db.path().display());
    let outcome = ledger::persist(&db, &qc, &work, date).await?;
    drop(db);

    Ok(outcome)
}
