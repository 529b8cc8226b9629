//! Sales pipeline SDK
//!
//! This crate provides the public API of the sales-pipeline module:
//! - `PipelineClient` trait for funnel, stage and lead operations
//! - Model types (`Funnel`, `Stage`, `Lead` and their drafts)
//! - Error type (`PipelineError`)
//!
//! ```ignore
//! let funnels = client.list_funnels().await;
//! let stages = client.list_stages(&funnels[0].id).await;
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::PipelineClient;
pub use errors::PipelineError;
pub use models::{Funnel, FunnelDraft, Lead, LeadDraft, Stage, StageDraft};
