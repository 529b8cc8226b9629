use async_trait::async_trait;
use http::Method;
use tracing::instrument;
use url::Url;

use crate::codec::{GatewayRecord, LoadRequest, SaveRequest, decode_entities};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::transport::Transport;

/// Generic read/write access to gateway entities.
///
/// Entity services depend on this trait rather than on [`ErpGateway`] so
/// they can be exercised against an in-memory store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Run a query and decode its rows, keyed by `primary_key`.
    ///
    /// # Errors
    ///
    /// Propagates transport and session errors; an empty result is not an
    /// error.
    async fn load(
        &self,
        request: &LoadRequest,
        primary_key: &str,
    ) -> Result<Vec<GatewayRecord>, GatewayError>;

    /// Write one record. The gateway does not echo the saved row.
    ///
    /// # Errors
    ///
    /// Propagates transport and session errors.
    async fn save(&self, request: &SaveRequest) -> Result<(), GatewayError>;
}

/// [`RecordStore`] backed by the remote `loadRecords` and `save` services.
#[derive(Debug, Clone)]
pub struct ErpGateway {
    transport: Transport,
    load_records_url: Url,
    save_url: Url,
}

impl ErpGateway {
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if `config` fails validation or the
    /// HTTP client cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Ok(Self::with_transport(
            Transport::from_config(config)?,
            config.load_records_url.clone(),
            config.save_url.clone(),
        ))
    }

    #[must_use]
    pub fn with_transport(transport: Transport, load_records_url: Url, save_url: Url) -> Self {
        Self {
            transport,
            load_records_url,
            save_url,
        }
    }

    #[must_use]
    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

#[async_trait]
impl RecordStore for ErpGateway {
    #[instrument(
        name = "erp_gateway.load",
        skip_all,
        fields(entity = request.root_entity(), rows = tracing::field::Empty)
    )]
    async fn load(
        &self,
        request: &LoadRequest,
        primary_key: &str,
    ) -> Result<Vec<GatewayRecord>, GatewayError> {
        let response = self
            .transport
            .send(Method::POST, &self.load_records_url, &request.envelope())
            .await?;

        let rows = decode_entities(response.pointer("/responseBody/entities"), primary_key);
        tracing::Span::current().record("rows", rows.len());
        tracing::debug!("records loaded");
        Ok(rows)
    }

    #[instrument(
        name = "erp_gateway.save",
        skip_all,
        fields(entity = request.entity_name(), update = request.is_update())
    )]
    async fn save(&self, request: &SaveRequest) -> Result<(), GatewayError> {
        self.transport
            .send(Method::POST, &self.save_url, &request.envelope())
            .await?;
        tracing::debug!(fields = request.fields().len(), "record saved");
        Ok(())
    }
}
