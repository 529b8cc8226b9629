//! Thin hyper client used by the session and transport layers.
//!
//! Bodies are always JSON and always read to completion; the gateway never
//! streams.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use thiserror::Error;
use url::Url;

use crate::error::GatewayError;

#[derive(Debug, Error)]
pub(crate) enum HttpError {
    #[error("failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error("transport error: {}", error_chain(.0))]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// Fully-read response.
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl RawResponse {
    /// Body as text for error details; `None` when empty.
    pub fn body_text(&self) -> Option<String> {
        let text = String::from_utf8_lossy(&self.body);
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }
}

/// Pooled HTTP/1.1 client with rustls (webpki roots).
///
/// Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub(crate) struct HttpClient {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl HttpClient {
    pub fn new(allow_insecure_http: bool) -> Result<Self, GatewayError> {
        if allow_insecure_http {
            tracing::warn!("insecure HTTP enabled for the ERP gateway; use only with mock servers");
        }

        let provider = rustls::crypto::CryptoProvider::get_default()
            .cloned()
            .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()));

        let builder = hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(provider)
            .map_err(|e| GatewayError::Config(format!("TLS setup failed: {e}")))?;
        let https = if allow_insecure_http {
            builder.https_or_http().enable_http1().build()
        } else {
            builder.https_only().enable_http1().build()
        };

        let mut client_builder = Client::builder(TokioExecutor::new());
        client_builder.pool_timer(TokioTimer::new());
        let inner = client_builder.build::<_, Full<Bytes>>(https);

        Ok(Self { inner })
    }

    /// Send a JSON request and read the whole response.
    ///
    /// Non-2xx statuses are returned as `Ok`; the caller classifies them.
    pub async fn execute(
        &self,
        method: Method,
        url: &Url,
        headers: Vec<(HeaderName, HeaderValue)>,
        body: Bytes,
        timeout: Option<Duration>,
    ) -> Result<RawResponse, HttpError> {
        let mut builder = Request::builder()
            .method(method)
            .uri(url.as_str())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        let request = builder.body(Full::new(body))?;

        let exchange = async {
            let response = self.inner.request(request).await?;
            let status = response.status();
            let body = response.into_body().collect().await?.to_bytes();
            Ok::<_, HttpError>(RawResponse { status, body })
        };

        match timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| HttpError::Timeout(limit))?,
            None => exchange.await,
        }
    }
}

/// Render an error with its source chain, `outer: inner: root`.
fn error_chain(err: &dyn StdError) -> String {
    let mut rendered = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        rendered.push_str(": ");
        rendered.push_str(&source.to_string());
        current = source.source();
    }
    rendered
}
