use thiserror::Error;

/// Failures surfaced by the gateway adapter.
///
/// Messages never embed credentials or bearer tokens.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The login call failed at the network or HTTP level.
    #[error("gateway authentication failed: {0}")]
    AuthFailed(String),

    /// The login call succeeded but carried neither `bearerToken` nor `token`.
    #[error("login response did not contain a bearer token")]
    AuthResponseInvalid,

    /// A gateway call was rejected with 401/403. The cached token has been
    /// dropped; the caller must retry the whole operation.
    #[error("gateway session expired, retry the operation")]
    SessionExpired,

    /// Any other transport or HTTP failure, with the upstream details.
    #[error("gateway request failed: {0}")]
    GatewayRequestFailed(String),

    /// Invalid adapter configuration (URLs, header values, TLS setup).
    #[error("gateway config error: {0}")]
    Config(String),
}
