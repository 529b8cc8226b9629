//! Sales pipeline module.
//!
//! Funnels, their ordered stages, and the leads moving through them, stored
//! in ERP tables behind the generic CRUD gateway:
//!
//! | Entity | Table | Primary key |
//! |---|---|---|
//! | funnel | `AD_FUNIS` | `CODFUNIL` |
//! | stage | `AD_FUNIS_ESTAGIOS` | `CODESTAGIO` |
//! | lead | `AD_LEADS` | `CODLEAD` |
//!
//! Nothing is deleted: removal flips `ATIVO` to `"N"` and every list query
//! filters on `ATIVO = 'S'`.

#![forbid(unsafe_code)]

pub mod board;
pub mod config;
pub mod domain;
mod infra;

pub use board::{LeadBoard, MoveOutcome};
pub use config::{ConfigError, PipelineConfig};
pub use domain::clock::{Clock, FixedClock, SystemClock};
pub use domain::error::DomainError;
pub use domain::local_client::LocalClient;
pub use domain::service::{Service, ServiceConfig};
pub use domain::soft::SoftList;
