#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Adapter for the ERP generic CRUD gateway.
//!
//! The gateway exposes two generic services, `loadRecords` and `save`, that
//! speak a positional field protocol instead of named JSON objects. This
//! crate hides that protocol behind three pieces:
//!
//! - [`SessionManager`] - acquires and caches the bearer token
//! - [`Transport`] - authenticated JSON calls with one forced invalidation
//!   on 401/403
//! - [`codec`] - decoding of the metadata-tagged envelope into
//!   [`GatewayRecord`]s and encoding of sparse writes into save requests
//!
//! [`ErpGateway`] wires them together and implements [`RecordStore`], the
//! seam consumed by entity-specific services.
//!
//! # Example
//!
//! ```ignore
//! use erp_gateway::{ErpGateway, GatewayConfig, LoadRequest, RecordStore};
//!
//! let gateway = ErpGateway::new(&config)?;
//! let request = LoadRequest::new("AD_FUNIS")
//!     .fields(["NOME", "COR"])
//!     .criteria("ATIVO = 'S'");
//! let rows = gateway.load(&request, "CODFUNIL").await?;
//! ```

pub mod codec;
mod config;
mod error;
mod gateway;
mod http;
mod secret;
mod session;
mod transport;

pub use codec::{
    FieldLayout, GatewayRecord, LoadRequest, PositionalValues, PrimaryKey, SaveRequest,
    SortOrder, decode_entities,
};
pub use config::{
    Credentials, DEFAULT_LOAD_RECORDS_URL, DEFAULT_LOGIN_URL, DEFAULT_SAVE_URL, GatewayConfig,
};
pub use error::GatewayError;
pub use gateway::{ErpGateway, RecordStore};
pub use secret::Secret;
pub use session::SessionManager;
pub use transport::Transport;
