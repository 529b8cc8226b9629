//! Module configuration, layered with figment.
//!
//! Sources, later ones winning:
//! 1. field defaults
//! 2. YAML file, when given
//! 3. `PIPELINE__*` environment variables, `__` separating nested keys
//!    (`PIPELINE__GATEWAY__CREDENTIALS__USERNAME`)

use std::path::Path;

use erp_gateway::{GatewayConfig, GatewayError};
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::service::ServiceConfig;

pub const ENV_PREFIX: &str = "PIPELINE__";

const DEFAULT_COLOR: &str = "#3b82f6";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file does not exist: {0}")]
    MissingFile(String),

    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<GatewayError> for ConfigError {
    fn from(e: GatewayError) -> Self {
        Self::Invalid(e.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    pub gateway: GatewayConfig,

    /// Color written when a funnel or stage draft has none.
    #[serde(default = "default_color")]
    pub default_color: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_owned()
}

impl PipelineConfig {
    /// Load from an optional YAML file and the environment, then validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, a source fails to
    /// parse, or the merged values are invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::MissingFile(path.display().to_string()));
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(&figment)
    }

    /// Extract and validate from an already assembled figment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on extraction or validation failure.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a blank default color or an
    /// invalid gateway section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_color.trim().is_empty() {
            return Err(ConfigError::Invalid("default_color must not be empty".into()));
        }
        self.gateway.validate()?;
        Ok(())
    }

    #[must_use]
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            default_color: self.default_color.clone(),
        }
    }
}
