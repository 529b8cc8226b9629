use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use bytes::Bytes;
use http::Method;
use http::header::{HeaderName, HeaderValue};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use crate::config::{Credentials, GatewayConfig};
use crate::error::GatewayError;
use crate::http::HttpClient;
use crate::secret::Secret;

/// Login response. Only the token fields are read; unknown fields are
/// ignored.
#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default, rename = "bearerToken")]
    bearer_token: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

impl LoginResponse {
    /// `bearerToken` wins; `token` is the fallback. Blank values do not count.
    fn into_token(self) -> Option<Secret> {
        self.bearer_token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.token.filter(|t| !t.trim().is_empty()))
            .map(Secret::new)
    }
}

/// Owns the bearer token for one credential set.
///
/// The cache starts empty, is filled by the first successful login, and is
/// emptied by [`invalidate`](Self::invalidate). Reads are lock-free; a
/// refresh gate makes concurrent callers that miss the cache share one login.
pub struct SessionManager {
    http: HttpClient,
    login_url: Url,
    credentials: Credentials,
    login_timeout: Duration,
    cached: ArcSwapOption<Secret>,
    refresh: Mutex<()>,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("login_url", &self.login_url.as_str())
            .field("has_token", &self.has_token())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Build a session manager with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the configuration is invalid or
    /// the TLS connector cannot be created.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;
        let http = HttpClient::new(config.allow_insecure_http)?;
        Ok(Self::with_client(config, http))
    }

    pub(crate) fn with_client(config: &GatewayConfig, http: HttpClient) -> Self {
        Self {
            http,
            login_url: config.login_url.clone(),
            credentials: config.credentials.clone(),
            login_timeout: config.login_timeout,
            cached: ArcSwapOption::empty(),
            refresh: Mutex::new(()),
        }
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Cached token, or a fresh one from the login endpoint.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::AuthFailed`] when the login call fails or times out
    /// - [`GatewayError::AuthResponseInvalid`] when a 2xx login response has
    ///   no token
    ///
    /// The cache stays empty on failure.
    pub async fn token(&self) -> Result<Arc<Secret>, GatewayError> {
        if let Some(token) = self.cached.load_full() {
            tracing::trace!("reusing cached gateway token");
            return Ok(token);
        }

        let _gate = self.refresh.lock().await;
        // Another caller may have logged in while we waited.
        if let Some(token) = self.cached.load_full() {
            return Ok(token);
        }

        let token = Arc::new(self.login().await?);
        self.cached.store(Some(Arc::clone(&token)));
        Ok(token)
    }

    /// Drop the cached token. Idempotent.
    pub fn invalidate(&self) {
        if self.cached.swap(None).is_some() {
            tracing::debug!("gateway token invalidated");
        }
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.cached.load().is_some()
    }

    #[instrument(name = "erp_gateway.login", skip_all, fields(login_url = %self.login_url))]
    async fn login(&self) -> Result<Secret, GatewayError> {
        let headers = self.login_headers()?;
        let response = self
            .http
            .execute(
                Method::POST,
                &self.login_url,
                headers,
                Bytes::from_static(b"{}"),
                Some(self.login_timeout),
            )
            .await
            .map_err(|e| GatewayError::AuthFailed(e.to_string()))?;

        if !response.status.is_success() {
            let details = response
                .body_text()
                .unwrap_or_else(|| response.status.to_string());
            tracing::warn!(status = response.status.as_u16(), "gateway login rejected");
            return Err(GatewayError::AuthFailed(format!(
                "HTTP {}: {details}",
                response.status.as_u16()
            )));
        }

        let token = serde_json::from_slice::<LoginResponse>(&response.body)
            .ok()
            .and_then(LoginResponse::into_token)
            .ok_or(GatewayError::AuthResponseInvalid)?;

        tracing::info!("gateway login succeeded");
        Ok(token)
    }

    fn login_headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>, GatewayError> {
        let creds = &self.credentials;
        [
            ("token", creds.api_token.expose()),
            ("appkey", creds.app_key.expose()),
            ("username", creds.username.as_str()),
            ("password", creds.password.expose()),
        ]
        .into_iter()
        .map(|(name, value)| {
            let mut value = HeaderValue::from_str(value).map_err(|_| {
                GatewayError::Config(format!("credential for '{name}' is not a valid header value"))
            })?;
            value.set_sensitive(true);
            Ok((HeaderName::from_static(name), value))
        })
        .collect()
    }
}
