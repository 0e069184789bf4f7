//! Failure taxonomy for a single collection run.
//!
//! Each stage owns its error type; [`RunError`] is what the binary sees and
//! maps to an exit status. A run with nothing to save is not an error, see
//! [`crate::ledger::PersistOutcome::SkippedNoData`].

/// Pre-flight configuration problems, raised before any network activity.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variables: {}", .missing.join(", "))]
    CredentialsMissing { missing: Vec<&'static str> },

    #[error("invalid portal base URL '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

/// Login failures. All variants abort the run.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The login page carried no anti-forgery hidden field.
    #[error("anti-forgery token field '{field}' not found on login page")]
    TokenNotFound { field: &'static str },

    /// Network, TLS, redirect-limit or client construction failure.
    #[error("login request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The portal answered but did not accept the credentials.
    #[error("login rejected (status {status}, final URL {url})")]
    Rejected { status: u16, url: String },
}

/// Report retrieval failures. All variants abort the run.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{report} request failed: {source}")]
    Transport {
        report: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{report} request returned status {status} ({url})")]
    Status {
        report: &'static str,
        status: u16,
        url: String,
    },

    #[error("{report} response is not a valid envelope: {source}")]
    Parse {
        report: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistence failures. Either aborts with nothing written for the date.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// A count field could not be read as a non-negative integer.
    #[error("hour record #{index} ('{hour}'): field {field} has non-numeric value {value}")]
    MalformedRecord {
        index: usize,
        hour: String,
        field: &'static str,
        value: String,
    },

    /// The worked-hours figure is neither null nor a non-negative number.
    #[error("work hours record has non-numeric value {value}")]
    MalformedWorkHours { value: String },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("failed to fetch data: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to save data: {0}")]
    Persist(#[from] PersistError),
}

impl RunError {
    /// Process exit status for this failure. Every failure class is fatal.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Config(_) | RunError::Auth(_) | RunError::Fetch(_) | RunError::Persist(_) => 1,
        }
    }
}
