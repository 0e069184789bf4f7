use std::sync::Arc;

use reqwest::{
    cookie::{CookieStore, Jar},
    redirect, Client, StatusCode, Url,
};

use crate::config::{Credentials, PortalConfig};
use crate::error::AuthError;
use crate::{log_debug, log_info, log_warn};

use super::html;

const ENABLE_LOGS: bool = true;

pub const TOKEN_FIELD: &str = "__RequestVerificationToken";

/// Authenticated portal session: an HTTP client bound to the cookie jar
/// filled in during login. Lives for one run and is never written to disk.
#[derive(Clone)]
pub struct Session {
    client: Client,
    jar: Arc<Jar>,
}

impl Session {
    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    /// Number of cookies the jar would send to `url`.
    pub fn cookie_count(&self, url: &Url) -> usize {
        self.jar
            .cookies(url)
            .and_then(|header| header.to_str().ok().map(|s| s.split(';').count()))
            .unwrap_or(0)
    }
}

fn build_client(portal: &PortalConfig, jar: Arc<Jar>) -> Result<Client, reqwest::Error> {
    Client::builder()
        .cookie_provider(jar)
        .default_headers(portal.default_headers())
        .redirect(redirect::Policy::limited(10))
        .timeout(portal.timeout)
        .build()
}

/// A login POST succeeded when it ends on a 200 page that is not the login
/// form again.
fn login_accepted(status: StatusCode, final_url: &Url, login_marker: &str) -> bool {
    status == StatusCode::OK && !final_url.path().contains(login_marker)
}

/// Scrape the anti-forgery token, then post the credentials with it.
pub async fn login(portal: &PortalConfig, credentials: &Credentials) -> Result<Session, AuthError> {
    let jar = Arc::new(Jar::default());
    let client = build_client(portal, jar.clone())?;
    let login_url = portal.login_url();

    log_debug!("Fetching login form from {login_url}");
    let page = client.get(login_url.clone()).send().await?;
    let page_status = page.status();
    if !page_status.is_success() {
        let url = page.url().to_string();
        log_warn!("Login page returned status {page_status}");
        return Err(AuthError::Rejected {
            status: page_status.as_u16(),
            url,
        });
    }
    let body = page.text().await?;

    let token = html::input_value(&body, TOKEN_FIELD)
        .ok_or(AuthError::TokenNotFound { field: TOKEN_FIELD })?;

    let form = [
        ("Email", credentials.email.as_str()),
        ("Password", credentials.password.as_str()),
        ("RememberMe", "true"),
        (TOKEN_FIELD, token.as_str()),
    ];

    let response = client.post(login_url).form(&form).send().await?;
    let status = response.status();
    let final_url = response.url().clone();

    if !login_accepted(status, &final_url, portal.login_marker()) {
        log_warn!("Login failed. Status code: {}, URL: {final_url}", status.as_u16());
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            url: final_url.to_string(),
        });
    }

    let session = Session { client, jar };
    log_info!(
        "Login successful ({} session cookies)",
        session.cookie_count(&portal.base_url)
    );
    Ok(session)
}
