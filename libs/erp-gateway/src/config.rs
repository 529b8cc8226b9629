use std::time::Duration;

use serde::{Deserialize, Deserializer, de};
use url::Url;

use crate::error::GatewayError;
use crate::secret::Secret;

/// Sandbox login endpoint.
pub const DEFAULT_LOGIN_URL: &str = "https://api.sandbox.sankhya.com.br/login";

/// Sandbox `CRUDServiceProvider.loadRecords` endpoint.
pub const DEFAULT_LOAD_RECORDS_URL: &str = "https://api.sandbox.sankhya.com.br/gateway/v1/mge/service.sbr?serviceName=CRUDServiceProvider.loadRecords&outputType=json";

/// Sandbox `DatasetSP.save` endpoint.
pub const DEFAULT_SAVE_URL: &str = "https://api.sandbox.sankhya.com.br/gateway/v1/mge/service.sbr?serviceName=DatasetSP.save&outputType=json";

const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Static credential bundle sent as headers on the login call.
///
/// Secret fields print as `[REDACTED]` in `Debug` output.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credentials {
    /// Integration token (`token` header).
    pub api_token: Secret,
    /// Application key (`appkey` header).
    pub app_key: Secret,
    /// Integration user (`username` header).
    pub username: String,
    /// Integration password (`password` header).
    pub password: Secret,
}

/// Connection settings for one gateway and one credential set.
///
/// Durations are written as humantime strings (`"10s"`, `"1m 30s"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default = "default_login_url")]
    pub login_url: Url,

    #[serde(default = "default_load_records_url")]
    pub load_records_url: Url,

    #[serde(default = "default_save_url")]
    pub save_url: Url,

    pub credentials: Credentials,

    /// Upper bound for the login exchange.
    #[serde(
        default = "default_login_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub login_timeout: Duration,

    /// Upper bound for each `loadRecords`/`save` call; `None` waits forever.
    #[serde(
        default = "default_request_timeout",
        deserialize_with = "deserialize_opt_duration"
    )]
    pub request_timeout: Option<Duration>,

    /// Permit plain `http://` endpoints (mock servers only).
    #[serde(default)]
    pub allow_insecure_http: bool,
}

impl GatewayConfig {
    /// Sandbox endpoints and default timeouts for the given credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            login_url: default_login_url(),
            load_records_url: default_load_records_url(),
            save_url: default_save_url(),
            credentials,
            login_timeout: DEFAULT_LOGIN_TIMEOUT,
            request_timeout: default_request_timeout(),
            allow_insecure_http: false,
        }
    }

    /// Check that credentials are filled in and every endpoint is usable.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] on a blank credential, a zero login
    /// timeout, a non-HTTP scheme, or `http://` without
    /// `allow_insecure_http`.
    pub fn validate(&self) -> Result<(), GatewayError> {
        let creds = &self.credentials;
        if creds.api_token.is_empty() {
            return Err(GatewayError::Config("credentials.api_token must not be empty".into()));
        }
        if creds.app_key.is_empty() {
            return Err(GatewayError::Config("credentials.app_key must not be empty".into()));
        }
        if creds.username.trim().is_empty() {
            return Err(GatewayError::Config("credentials.username must not be empty".into()));
        }
        if creds.password.is_empty() {
            return Err(GatewayError::Config("credentials.password must not be empty".into()));
        }
        if self.login_timeout.is_zero() {
            return Err(GatewayError::Config("login_timeout must be > 0".into()));
        }
        for (name, url) in [
            ("login_url", &self.login_url),
            ("load_records_url", &self.load_records_url),
            ("save_url", &self.save_url),
        ] {
            self.check_scheme(name, url)?;
        }
        Ok(())
    }

    fn check_scheme(&self, name: &str, url: &Url) -> Result<(), GatewayError> {
        match url.scheme() {
            "https" => Ok(()),
            "http" if self.allow_insecure_http => Ok(()),
            "http" => Err(GatewayError::Config(format!(
                "{name} uses http:// but allow_insecure_http is off"
            ))),
            other => Err(GatewayError::Config(format!(
                "{name} has unsupported scheme '{other}'"
            ))),
        }
    }
}

fn parse_default(raw: &str) -> Url {
    // Compile-time constants; covered by `default_urls_parse`.
    #[allow(clippy::expect_used)]
    Url::parse(raw).expect("default gateway URL is valid")
}

fn default_login_url() -> Url {
    parse_default(DEFAULT_LOGIN_URL)
}

fn default_load_records_url() -> Url {
    parse_default(DEFAULT_LOAD_RECORDS_URL)
}

fn default_save_url() -> Url {
    parse_default(DEFAULT_SAVE_URL)
}

fn default_login_timeout() -> Duration {
    DEFAULT_LOGIN_TIMEOUT
}

#[allow(clippy::unnecessary_wraps)]
fn default_request_timeout() -> Option<Duration> {
    Some(DEFAULT_REQUEST_TIMEOUT)
}

fn deserialize_duration<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
    let raw = String::deserialize(d)?;
    humantime::parse_duration(&raw).map_err(de::Error::custom)
}

fn deserialize_opt_duration<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
    match Option::<String>::deserialize(d)? {
        Some(raw) => humantime::parse_duration(&raw)
            .map(Some)
            .map_err(de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    fn creds() -> Credentials {
        Credentials {
            api_token: Secret::new("api-token"),
            app_key: Secret::new("app-key"),
            username: "integration@example.com".into(),
            password: Secret::new("pw"),
        }
    }

    #[test]
    fn default_urls_parse() {
        let cfg = GatewayConfig::new(creds());
        assert_eq!(cfg.login_url.path(), "/login");
        assert!(cfg.load_records_url.as_str().contains("CRUDServiceProvider.loadRecords"));
        assert!(cfg.save_url.as_str().contains("DatasetSP.save"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserializes_with_defaults() {
        let cfg: GatewayConfig = serde_json::from_value(json!({
            "credentials": {
                "api_token": "t",
                "app_key": "k",
                "username": "u",
                "password": "p"
            }
        }))
        .unwrap();
        assert_eq!(cfg.login_timeout, Duration::from_secs(10));
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(30)));
        assert!(!cfg.allow_insecure_http);
    }

    #[test]
    fn deserializes_humantime_durations() {
        let cfg: GatewayConfig = serde_json::from_value(json!({
            "credentials": { "api_token": "t", "app_key": "k", "username": "u", "password": "p" },
            "login_timeout": "2s",
            "request_timeout": null
        }))
        .unwrap();
        assert_eq!(cfg.login_timeout, Duration::from_secs(2));
        assert_eq!(cfg.request_timeout, None);
    }

    #[test]
    fn rejects_unknown_fields() {
        let result: Result<GatewayConfig, _> = serde_json::from_value(json!({
            "credentials": { "api_token": "t", "app_key": "k", "username": "u", "password": "p" },
            "retries": 3
        }));
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_blank_credentials() {
        let mut cfg = GatewayConfig::new(creds());
        cfg.credentials.app_key = Secret::new("");
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, GatewayError::Config(ref msg) if msg.contains("app_key")));
    }

    #[test]
    fn validate_rejects_plain_http_by_default() {
        let mut cfg = GatewayConfig::new(creds());
        cfg.login_url = Url::parse("http://localhost:8080/login").unwrap();
        assert!(cfg.validate().is_err());

        cfg.allow_insecure_http = true;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_other_schemes() {
        let mut cfg = GatewayConfig::new(creds());
        cfg.save_url = Url::parse("ftp://example.com/save").unwrap();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, GatewayError::Config(ref msg) if msg.contains("ftp")));
    }

    #[test]
    fn debug_redacts_secrets() {
        let dbg = format!("{:?}", GatewayConfig::new(creds()));
        assert!(!dbg.contains("api-token"));
        assert!(!dbg.contains("app-key"));
        assert!(dbg.contains("integration@example.com"));
    }
}
