use std::sync::Arc;

use async_trait::async_trait;
use erp_gateway::RecordStore;
use sales_pipeline_sdk::{
    Funnel, FunnelDraft, Lead, LeadDraft, PipelineClient, PipelineError, Stage, StageDraft,
};

use crate::domain::service::Service;

/// In-process [`PipelineClient`] over a [`Service`].
pub struct LocalClient<S: RecordStore + 'static> {
    service: Arc<Service<S>>,
}

impl<S: RecordStore + 'static> LocalClient<S> {
    #[must_use]
    pub fn new(service: Arc<Service<S>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl<S: RecordStore + 'static> PipelineClient for LocalClient<S> {
    async fn list_funnels(&self) -> Vec<Funnel> {
        self.service.list_funnels().await.into_rows()
    }

    async fn list_stages(&self, funnel_id: &str) -> Vec<Stage> {
        self.service.list_stages(funnel_id).await.into_rows()
    }

    async fn save_funnel(&self, draft: FunnelDraft) -> Result<Funnel, PipelineError> {
        self.service.save_funnel(draft).await.map_err(Into::into)
    }

    async fn save_stage(&self, draft: StageDraft) -> Result<Stage, PipelineError> {
        self.service.save_stage(draft).await.map_err(Into::into)
    }

    async fn delete_funnel(&self, funnel_id: &str) -> Result<(), PipelineError> {
        self.service.delete_funnel(funnel_id).await.map_err(Into::into)
    }

    async fn delete_stage(&self, stage_id: &str) -> Result<(), PipelineError> {
        self.service.delete_stage(stage_id).await.map_err(Into::into)
    }

    async fn list_leads(&self) -> Vec<Lead> {
        self.service.list_leads().await.into_rows()
    }

    async fn save_lead(&self, draft: LeadDraft) -> Result<Lead, PipelineError> {
        self.service.save_lead(draft).await.map_err(Into::into)
    }

    async fn move_lead(&self, lead_id: &str, stage_id: &str) -> Result<(), PipelineError> {
        self.service
            .move_lead(lead_id, stage_id)
            .await
            .map_err(Into::into)
    }
}
