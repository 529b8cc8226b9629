//! Error types for the sales-pipeline SDK.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PipelineError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("login response did not contain a bearer token")]
    AuthResponseInvalid,

    /// The token was rejected and dropped; retry the whole operation.
    #[error("session expired, retry the operation")]
    SessionExpired,

    #[error("gateway request failed: {0}")]
    GatewayRequestFailed(String),

    /// The write went through but the refreshed list did not contain the
    /// record. `id` is `None` for creates.
    #[error(
        "saved {entity} record {} was not found on re-read",
        .id.as_deref().unwrap_or("<new>")
    )]
    RecordNotFoundAfterSave { entity: String, id: Option<String> },

    #[error("configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    #[must_use]
    pub fn not_found_after_save(entity: impl Into<String>, id: Option<&str>) -> Self {
        Self::RecordNotFoundAfterSave {
            entity: entity.into(),
            id: id.map(str::to_owned),
        }
    }

    /// Whether retrying the same operation may succeed without user action.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}
