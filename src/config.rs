use std::{fmt, path::PathBuf, time::Duration};

use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Url,
};

use crate::error::ConfigError;
use crate::log_warn;

const ENABLE_LOGS: bool = true;

pub const ENV_EMAIL: &str = "EMAIL";
pub const ENV_PASSWORD: &str = "PASSWORD";
pub const ENV_ANNOTATOR_ID: &str = "ANNOTATOR_ID";
pub const ENV_BASE_URL: &str = "QC_PORTAL_BASE_URL";
pub const ENV_DB_PATH: &str = "QC_DB_PATH";
pub const ENV_TIMEOUT_SECS: &str = "QC_HTTP_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "https://roobtech.com";
const DEFAULT_DB_PATH: &str = "work_history.db";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:140.0) Gecko/20100101 Firefox/140.0";

/// Portal account used for one run. Never persisted.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub annotator_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("annotator_id", &self.annotator_id)
            .finish()
    }
}

/// Where the portal lives and how requests to it look.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub base_url: Url,
    pub login_path: String,
    pub qc_report_path: String,
    pub work_hours_path: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl PortalConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            login_path: "/Account/Login".into(),
            qc_report_path: "/ProjectReport/GetQCHourWiseReports".into(),
            work_hours_path: "/WorkingHour/GetQCWorkingHourReports".into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn parse(base_url: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(base_url).map_err(|err| ConfigError::InvalidBaseUrl {
            value: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                value: base_url.to_string(),
                reason: "not a base URL".into(),
            });
        }
        Ok(Self::new(url))
    }

    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url.set_query(None);
        url
    }

    pub fn login_url(&self) -> Url {
        self.endpoint(&self.login_path)
    }

    /// Last segment of the login path. A post-login URL containing it means
    /// the portal bounced us back to the form.
    pub fn login_marker(&self) -> &str {
        self.login_path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.login_path)
    }

    /// Headers sent with every portal request.
    pub fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&self.user_agent) {
            Ok(value) => {
                headers.insert(header::USER_AGENT, value);
            }
            Err(err) => log_warn!("Ignoring invalid user agent '{}': {err}", self.user_agent),
        }
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        headers.insert(header::DNT, HeaderValue::from_static("1"));
        headers.insert("Sec-GPC", HeaderValue::from_static("1"));
        headers
    }
}

/// Everything a run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub portal: PortalConfig,
    pub db_path: PathBuf,
}

impl AppConfig {
    /// Load from the process environment after merging `.env`, if present.
    ///
    /// | Env Var                | Default                |
    /// |------------------------|------------------------|
    /// | `EMAIL`                | required               |
    /// | `PASSWORD`             | required               |
    /// | `ANNOTATOR_ID`         | required               |
    /// | `QC_PORTAL_BASE_URL`   | `https://roobtech.com` |
    /// | `QC_DB_PATH`           | `work_history.db`      |
    /// | `QC_HTTP_TIMEOUT_SECS` | `30`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let email = get(ENV_EMAIL);
        let password = get(ENV_PASSWORD);
        let annotator_id = get(ENV_ANNOTATOR_ID);

        let credentials = match (email, password, annotator_id) {
            (Some(email), Some(password), Some(annotator_id)) => Credentials {
                email,
                password,
                annotator_id: annotator_id.trim().to_string(),
            },
            (email, password, annotator_id) => {
                let missing = [
                    (ENV_EMAIL, email.is_none()),
                    (ENV_PASSWORD, password.is_none()),
                    (ENV_ANNOTATOR_ID, annotator_id.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                return Err(ConfigError::CredentialsMissing { missing });
            }
        };

        let base_url = get(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let mut portal = PortalConfig::parse(base_url.trim())?;

        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => portal.timeout = Duration::from_secs(secs),
                _ => log_warn!(
                    "{ENV_TIMEOUT_SECS}='{raw}' is not a positive integer; using {DEFAULT_TIMEOUT_SECS}s"
                ),
            }
        }

        let db_path = get(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        Ok(Self {
            credentials,
            portal,
            db_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reports_all_missing_credentials_together() {
        let err = AppConfig::from_lookup(lookup(&[(ENV_PASSWORD, "secret")])).unwrap_err();
        match err {
            ConfigError::CredentialsMissing { missing } => {
                assert_eq!(missing, vec![ENV_EMAIL, ENV_ANNOTATOR_ID]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_values_count_as_missing() {
        let err = AppConfig::from_lookup(lookup(&[
            (ENV_EMAIL, "a@b.c"),
            (ENV_PASSWORD, "   "),
            (ENV_ANNOTATOR_ID, "42"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::CredentialsMissing { ref missing } if missing == &vec![ENV_PASSWORD]
        ));
    }

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_EMAIL, "a@b.c"),
            (ENV_PASSWORD, "secret"),
            (ENV_ANNOTATOR_ID, " 42 "),
        ]))
        .unwrap();

        assert_eq!(config.credentials.annotator_id, "42");
        assert_eq!(config.db_path, PathBuf::from("work_history.db"));
        assert_eq!(config.portal.base_url.as_str(), "https://roobtech.com/");
        assert_eq!(config.portal.timeout, Duration::from_secs(30));
        assert_eq!(
            config.portal.login_url().as_str(),
            "https://roobtech.com/Account/Login"
        );
        assert_eq!(config.portal.login_marker(), "Login");
    }

    #[test]
    fn overrides_and_bad_timeout_fallback() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_EMAIL, "a@b.c"),
            (ENV_PASSWORD, "secret"),
            (ENV_ANNOTATOR_ID, "42"),
            (ENV_BASE_URL, "http://127.0.0.1:8080"),
            (ENV_DB_PATH, "/tmp/history.db"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap();

        assert_eq!(
            config.portal.endpoint("/WorkingHour/GetQCWorkingHourReports").as_str(),
            "http://127.0.0.1:8080/WorkingHour/GetQCWorkingHourReports"
        );
        assert_eq!(config.db_path, PathBuf::from("/tmp/history.db"));
        assert_eq!(config.portal.timeout, Duration::from_secs(30));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let err = AppConfig::from_lookup(lookup(&[
            (ENV_EMAIL, "a@b.c"),
            (ENV_PASSWORD, "secret"),
            (ENV_ANNOTATOR_ID, "42"),
            (ENV_BASE_URL, "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = Credentials {
            email: "a@b.c".into(),
            password: "hunter2".into(),
            annotator_id: "42".into(),
        };
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
