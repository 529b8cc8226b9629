use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::{HttpClient, RawResponse};
use crate::session::SessionManager;

/// Authenticated JSON calls against the gateway.
///
/// A 401/403 invalidates the session and surfaces
/// [`GatewayError::SessionExpired`]; the call is not retried here. The next
/// call logs in again.
#[derive(Debug, Clone)]
pub struct Transport {
    session: Arc<SessionManager>,
    request_timeout: Option<Duration>,
}

impl Transport {
    #[must_use]
    pub fn new(session: Arc<SessionManager>, request_timeout: Option<Duration>) -> Self {
        Self {
            session,
            request_timeout,
        }
    }

    /// Build a session manager and transport from one config.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the configuration is invalid.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let session = Arc::new(SessionManager::from_config(config)?);
        Ok(Self::new(session, config.request_timeout))
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Send `body` as JSON with the session's bearer token.
    ///
    /// Returns the decoded response body; an empty 2xx body decodes to
    /// [`Value::Null`].
    ///
    /// # Errors
    ///
    /// - login errors from [`SessionManager::token`], unchanged
    /// - [`GatewayError::SessionExpired`] on HTTP 401/403
    /// - [`GatewayError::GatewayRequestFailed`] on any other failure, carrying
    ///   the response body when there is one
    #[instrument(name = "erp_gateway.send", skip_all, fields(method = %method, path = url.path()))]
    pub async fn send<B>(&self, method: Method, url: &Url, body: &B) -> Result<Value, GatewayError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let payload = serde_json::to_vec(body).map_err(|e| {
            GatewayError::GatewayRequestFailed(format!("failed to encode request body: {e}"))
        })?;

        let token = self.session.token().await?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
            .map(|mut v| {
                v.set_sensitive(true);
                v
            })
            .map_err(|_| {
                self.session.invalidate();
                GatewayError::AuthResponseInvalid
            })?;
        let headers: Vec<(HeaderName, HeaderValue)> = vec![(AUTHORIZATION, bearer)];

        let response = self
            .http()
            .execute(
                method,
                url,
                headers,
                Bytes::from(payload),
                self.request_timeout,
            )
            .await
            .map_err(|e| GatewayError::GatewayRequestFailed(e.to_string()))?;

        self.classify(response)
    }

    fn http(&self) -> &HttpClient {
        self.session.http()
    }

    fn classify(&self, response: RawResponse) -> Result<Value, GatewayError> {
        let status = response.status;
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            self.session.invalidate();
            tracing::warn!(status = status.as_u16(), "gateway rejected token; session invalidated");
            return Err(GatewayError::SessionExpired);
        }

        if !status.is_success() {
            let details = response
                .body_text()
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            tracing::warn!(status = status.as_u16(), "gateway request failed");
            return Err(GatewayError::GatewayRequestFailed(details));
        }

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&response.body).map_err(|e| {
            GatewayError::GatewayRequestFailed(format!("response is not valid JSON: {e}"))
        })
    }
}
