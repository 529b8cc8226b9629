//! `PipelineClient` trait definition.

use async_trait::async_trait;

use crate::errors::PipelineError;
use crate::models::{Funnel, FunnelDraft, Lead, LeadDraft, Stage, StageDraft};

/// Funnel, stage and lead operations against the ERP.
///
/// List operations never fail: a gateway error is logged and an empty list
/// returned. Writes propagate errors and leave it to the caller to restore
/// any state it changed ahead of the call.
#[async_trait]
pub trait PipelineClient: Send + Sync {
    /// Active funnels.
    async fn list_funnels(&self) -> Vec<Funnel>;

    /// Active stages of one funnel, ordered by position.
    async fn list_stages(&self, funnel_id: &str) -> Vec<Stage>;

    /// Create (no id) or update (id present) a funnel and return it as stored.
    async fn save_funnel(&self, draft: FunnelDraft) -> Result<Funnel, PipelineError>;

    /// Create (no id) or update (id present) a stage and return it as stored.
    async fn save_stage(&self, draft: StageDraft) -> Result<Stage, PipelineError>;

    /// Deactivate a funnel. No re-read.
    async fn delete_funnel(&self, funnel_id: &str) -> Result<(), PipelineError>;

    /// Deactivate a stage. No re-read.
    async fn delete_stage(&self, stage_id: &str) -> Result<(), PipelineError>;

    /// Active leads across all funnels.
    async fn list_leads(&self) -> Vec<Lead>;

    /// Create (no id) or update (id present) a lead and return it as stored.
    async fn save_lead(&self, draft: LeadDraft) -> Result<Lead, PipelineError>;

    /// Move a lead to another stage. No re-read.
    async fn move_lead(&self, lead_id: &str, stage_id: &str) -> Result<(), PipelineError>;
}
