// tests/portal_flow.rs
//
// Drives login + both report fetches + persistence against a tiny
// in-process HTTP stub of the portal.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use qc_ledger_lib::config::AppConfig;
use qc_ledger_lib::db::Database;
use qc_ledger_lib::error::{AuthError, FetchError, RunError};
use qc_ledger_lib::ledger::PersistOutcome;
use qc_ledger_lib::pipeline::collect_day;

const SESSION_COOKIE: &str = ".AspNetCore.Identity.Application=signed-in";

#[derive(Clone)]
struct Portal {
    password: &'static str,
    token_on_page: bool,
    qc_status: u16,
    qc_body: String,
    work_body: String,
}

impl Default for Portal {
    fn default() -> Self {
        Self {
            password: "right",
            token_on_page: true,
            qc_status: 200,
            qc_body: json!({
                "issuccess": true,
                "data": [
                    { "date": "07:00 AM", "totalPostQC": 5, "totalPostApproved": 3,
                      "totalPostSkiped": 1, "totalPostReannotated": 1, "totalCommentQC": 0,
                      "totalCommentApproved": 0, "totalCommentSkiped": 0, "totalCommentReannotated": 0 },
                    { "date": "08:00 AM", "totalPostQC": 0, "totalPostApproved": 0,
                      "totalPostSkiped": 0, "totalPostReannotated": 0, "totalCommentQC": 0,
                      "totalCommentApproved": 0, "totalCommentSkiped": 0, "totalCommentReannotated": 0 }
                ]
            })
            .to_string(),
            work_body: json!({ "issuccess": true, "data": [{ "totalWorkHour": 7.5 }] }).to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Seen {
    method: String,
    target: String,
    cookie: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Seen>>>;

async fn start(portal: Portal) -> (String, Log) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let seen = log.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else { break };
            let portal = portal.clone();
            let seen = seen.clone();
            tokio::spawn(async move {
                let _ = serve(stream, &portal, &seen).await;
            });
        }
    });

    (format!("http://{addr}"), log)
}

async fn serve(stream: TcpStream, portal: &Portal, seen: &Log) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).await?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.insert(k.trim().to_ascii_lowercase(), v.trim().to_string());
        }
    }

    let len: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = vec![0; len];
    reader.read_exact(&mut body).await?;
    let body = String::from_utf8_lossy(&body).to_string();
    let cookie = headers.get("cookie").cloned();

    seen.lock().unwrap().push(Seen {
        method: method.clone(),
        target: target.clone(),
        cookie: cookie.clone(),
        body: body.clone(),
    });

    let path = target.split('?').next().unwrap_or_default();
    let signed_in = cookie.as_deref().is_some_and(|c| c.contains(SESSION_COOKIE));

    let (status, extra, payload): (u16, Vec<String>, String) = match (method.as_str(), path) {
        ("GET", "/Account/Login") => {
            let field = if portal.token_on_page {
                r#"<input name="__RequestVerificationToken" type="hidden" value="tok-123" />"#
            } else {
                ""
            };
            (
                200,
                vec!["Set-Cookie: .AspNetCore.Antiforgery=af; path=/".into()],
                format!(r#"<html><form method="post"><input name="Email">{field}</form></html>"#),
            )
        }
        ("POST", "/Account/Login") => {
            let ok = body.contains("__RequestVerificationToken=tok-123")
                && body.contains(&format!("Password={}", portal.password))
                && body.contains("RememberMe=true");
            if ok {
                (
                    302,
                    vec![
                        "Location: /Home/Index".into(),
                        format!("Set-Cookie: {SESSION_COOKIE}; path=/"),
                    ],
                    String::new(),
                )
            } else {
                (302, vec!["Location: /Account/Login".into()], String::new())
            }
        }
        ("GET", "/Home/Index") => (200, vec![], "<html>home</html>".into()),
        ("GET", "/ProjectReport/GetQCHourWiseReports") if signed_in => {
            (portal.qc_status, vec![], portal.qc_body.clone())
        }
        ("GET", "/WorkingHour/GetQCWorkingHourReports") if signed_in => {
            (200, vec![], portal.work_body.clone())
        }
        _ => (401, vec![], "unauthorized".into()),
    };

    let mut response = format!(
        "HTTP/1.1 {status} X\r\nContent-Length: {}\r\nConnection: close\r\n",
        payload.len()
    );
    for header in extra {
        response.push_str(&header);
        response.push_str("\r\n");
    }
    response.push_str("\r\n");
    response.push_str(&payload);

    let stream = reader.get_mut();
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn config(base_url: &str, password: &str, db_path: &Path) -> AppConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("EMAIL", "qc@example.com".to_string()),
        ("PASSWORD", password.to_string()),
        ("ANNOTATOR_ID", "77".to_string()),
        ("QC_PORTAL_BASE_URL", base_url.to_string()),
        ("QC_DB_PATH", db_path.display().to_string()),
        ("QC_HTTP_TIMEOUT_SECS", "5".to_string()),
    ]);
    AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 10).unwrap()
}

fn report_requests(log: &Log) -> Vec<Seen> {
    log.lock()
        .unwrap()
        .iter()
        .filter(|s| s.target.contains("Report"))
        .cloned()
        .collect()
}

#[tokio::test]
async fn collects_and_stores_the_day() {
    let (base, log) = start(Portal::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("work_history.db");

    let outcome = collect_day(&config(&base, "right", &db_path), date()).await.unwrap();
    let report = match outcome {
        PersistOutcome::Saved(report) => report,
        other => panic!("expected Saved, got {other:?}"),
    };
    assert_eq!(report.hourly_table, "September_2025");
    assert_eq!(report.hourly_rows, 1);
    assert_eq!(report.total_work_hours, 7.5);

    let login_post = log
        .lock()
        .unwrap()
        .iter()
        .find(|s| s.method == "POST")
        .cloned()
        .unwrap();
    assert!(login_post.body.contains("Email=qc%40example.com"));

    let reports = report_requests(&log);
    assert_eq!(reports.len(), 2);
    for request in &reports {
        assert!(request.cookie.as_deref().unwrap().contains(SESSION_COOKIE));
        assert!(request.target.contains("annotatorId=77"));
        assert!(request.target.contains("fromdate=2025-09-10+00%3A00"));
        assert!(request.target.contains("todate=2025-09-10+23%3A55"));
        assert!(request.target.contains("projectId=all"));
    }

    let db = Database::new(db_path).unwrap();
    let hours = db.hourly_rows(date()).await.unwrap();
    assert_eq!(hours.len(), 1);
    assert_eq!(hours[0].hour, "07:00 AM");
    let summary = db.daily_summary(date()).await.unwrap().unwrap();
    assert_eq!(summary.totals.to_array(), [5, 3, 1, 1, 0, 0, 0, 0]);
    assert_eq!(summary.total_work_hours, 7.5);
}

#[tokio::test]
async fn bounce_back_to_login_fails_before_any_fetch() {
    let (base, log) = start(Portal::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("work_history.db");

    let err = collect_day(&config(&base, "wrong", &db_path), date())
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), 1);
    match err {
        RunError::Auth(AuthError::Rejected { status, url }) => {
            assert_eq!(status, 200);
            assert!(url.ends_with("/Account/Login"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(report_requests(&log).is_empty());
    assert!(!db_path.exists());
}

#[tokio::test]
async fn login_page_without_token_is_auth_failure() {
    let (base, log) = start(Portal {
        token_on_page: false,
        ..Portal::default()
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("work_history.db");

    let err = collect_day(&config(&base, "right", &db_path), date())
        .await
        .unwrap_err();

    assert!(matches!(err, RunError::Auth(AuthError::TokenNotFound { .. })));
    assert!(log.lock().unwrap().iter().all(|s| s.method == "GET"));
    assert!(report_requests(&log).is_empty());
}

#[tokio::test]
async fn report_error_status_is_fetch_failure() {
    let (base, _log) = start(Portal {
        qc_status: 500,
        ..Portal::default()
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("work_history.db");

    let err = collect_day(&config(&base, "right", &db_path), date())
        .await
        .unwrap_err();

    match err {
        RunError::Fetch(FetchError::Status { status, .. }) => assert_eq!(status, 500),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!db_path.exists());
}

#[tokio::test]
async fn malformed_report_json_is_fetch_failure() {
    let (base, _log) = start(Portal {
        work_body: "<html>session expired</html>".into(),
        ..Portal::default()
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("work_history.db");

    let err = collect_day(&config(&base, "right", &db_path), date())
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Fetch(FetchError::Parse { .. })));
}

#[tokio::test]
async fn unsuccessful_envelope_ends_cleanly_without_writes() {
    let (base, log) = start(Portal {
        qc_body: json!({ "issuccess": false, "data": null }).to_string(),
        ..Portal::default()
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("work_history.db");

    let outcome = collect_day(&config(&base, "right", &db_path), date())
        .await
        .unwrap();

    assert_eq!(outcome, PersistOutcome::SkippedNoData);
    assert_eq!(report_requests(&log).len(), 2);
    assert!(!db_path.exists());
}

#[tokio::test]
async fn failed_envelope_with_odd_payload_still_skips() {
    let (base, _log) = start(Portal {
        work_body: json!({
            "issuccess": false,
            "data": [{ "totalWorkHour": "n/a" }],
            "message": "report unavailable"
        })
        .to_string(),
        ..Portal::default()
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("work_history.db");

    let outcome = collect_day(&config(&base, "right", &db_path), date())
        .await
        .unwrap();

    assert_eq!(outcome, PersistOutcome::SkippedNoData);
    assert!(!db_path.exists());
}

#[tokio::test]
async fn null_work_hours_are_stored_as_zero() {
    let (base, _log) = start(Portal {
        work_body: json!({ "issuccess": true, "data": [{ "totalWorkHour": null }] }).to_string(),
        ..Portal::default()
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("work_history.db");

    let outcome = collect_day(&config(&base, "right", &db_path), date())
        .await
        .unwrap();
    match outcome {
        PersistOutcome::Saved(report) => assert_eq!(report.total_work_hours, 0.0),
        other => panic!("expected Saved, got {other:?}"),
    }

    let db = Database::new(db_path).unwrap();
    let summary = db.daily_summary(date()).await.unwrap().unwrap();
    assert_eq!(summary.total_work_hours, 0.0);
}
