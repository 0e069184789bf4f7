use chrono::NaiveDate;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::config::PortalConfig;
use crate::error::FetchError;
use crate::models::{QcEnvelope, WorkEnvelope};
use crate::{log_debug, log_info, log_warn};

use super::auth::Session;

const ENABLE_LOGS: bool = true;

pub const QC_REPORT: &str = "qc report";
pub const WORK_HOURS: &str = "work hours";

type Query = Vec<(&'static str, String)>;

/// Start and end of the provider's day window, `YYYY-MM-DD 00:00` to
/// `YYYY-MM-DD 23:55`.
pub fn day_window(date: NaiveDate) -> (String, String) {
    let day = date.format("%Y-%m-%d");
    (format!("{day} 00:00"), format!("{day} 23:55"))
}

pub fn qc_report_query(annotator_id: &str, date: NaiveDate) -> Query {
    let (from, to) = day_window(date);
    vec![
        ("projectId", "all".to_string()),
        ("annotatorId", annotator_id.to_string()),
        ("fromdate", from),
        ("todate", to),
        ("sortby", "day".to_string()),
        ("type", "annotated".to_string()),
        ("interactionType", "2".to_string()),
    ]
}

pub fn work_hours_query(annotator_id: &str, date: NaiveDate) -> Query {
    let (from, to) = day_window(date);
    vec![
        ("type", "1".to_string()),
        ("fromdate", from),
        ("todate", to),
        ("projectId", "all".to_string()),
        ("annotatorId", annotator_id.to_string()),
    ]
}

/// Hour-bucketed QC counts for `annotator_id` on `date`.
pub async fn fetch_qc_report(
    session: &Session,
    portal: &PortalConfig,
    annotator_id: &str,
    date: NaiveDate,
) -> Result<QcEnvelope, FetchError> {
    let envelope: QcEnvelope = fetch_envelope(
        session,
        portal.endpoint(&portal.qc_report_path),
        &qc_report_query(annotator_id, date),
        QC_REPORT,
    )
    .await?;
    log_info!(
        "Fetched {QC_REPORT} for {date}: issuccess={}, {} hour buckets",
        envelope.issuccess,
        envelope.records().len()
    );
    Ok(envelope)
}

/// Total worked hours for `annotator_id` on `date`.
pub async fn fetch_work_hours(
    session: &Session,
    portal: &PortalConfig,
    annotator_id: &str,
    date: NaiveDate,
) -> Result<WorkEnvelope, FetchError> {
    let envelope: WorkEnvelope = fetch_envelope(
        session,
        portal.endpoint(&portal.work_hours_path),
        &work_hours_query(annotator_id, date),
        WORK_HOURS,
    )
    .await?;
    log_info!(
        "Fetched {WORK_HOURS} for {date}: issuccess={}, {} records",
        envelope.issuccess,
        envelope.records().len()
    );
    Ok(envelope)
}

async fn fetch_envelope<T: DeserializeOwned>(
    session: &Session,
    url: Url,
    query: &Query,
    report: &'static str,
) -> Result<T, FetchError> {
    let transport = |source| FetchError::Transport { report, source };

    log_debug!("GET {url} ({report})");
    let response = session
        .client()
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(transport)?;

    let status = response.status();
    if !status.is_success() {
        log_warn!("{report} returned status {status}");
        return Err(FetchError::Status {
            report,
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }

    let body = response.text().await.map_err(transport)?;
    serde_json::from_str(&body).map_err(|source| FetchError::Parse { report, source })
}
