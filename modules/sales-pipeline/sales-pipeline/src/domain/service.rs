use std::sync::Arc;

use erp_gateway::RecordStore;
use sales_pipeline_sdk::{Funnel, FunnelDraft, Lead, LeadDraft, Stage, StageDraft};
use tracing::instrument;

use super::clock::Clock;
use super::error::DomainError;
use super::soft::SoftList;
use crate::infra::{funnels, leads, stages};

// ============================================================================
// Service Configuration
// ============================================================================

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Color written when a funnel or stage draft has none.
    pub default_color: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_color: "#3b82f6".to_owned(),
        }
    }
}

// ============================================================================
// Service Implementation
// ============================================================================

/// Entity operations composed from a [`RecordStore`].
///
/// Every call is one stateless round trip (two for saves). Saves re-read the
/// entity list because the gateway does not echo the stored row: updates are
/// matched by id, creates take the last row of the refreshed list.
pub struct Service<S: RecordStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    config: ServiceConfig,
}

impl<S: RecordStore> Service<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, config: ServiceConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    // ---- funnels -----------------------------------------------------------

    #[instrument(name = "sales_pipeline.list_funnels", skip_all)]
    pub async fn list_funnels(&self) -> SoftList<Funnel> {
        SoftList::from_result(funnels::ENTITY, self.load_funnels().await)
    }

    #[instrument(name = "sales_pipeline.save_funnel", skip_all, fields(id = draft.existing_id()))]
    pub async fn save_funnel(&self, draft: FunnelDraft) -> Result<Funnel, DomainError> {
        let request = funnels::save_request(&draft, self.clock.today(), &self.config.default_color);
        self.store.save(&request).await?;
        tracing::info!(update = request.is_update(), "funnel saved");

        let rows = self.load_funnels().await?;
        pick_saved(rows, draft.existing_id(), |f| &f.id)
            .ok_or_else(|| DomainError::not_found_after_save(funnels::ENTITY, draft.existing_id()))
    }

    #[instrument(name = "sales_pipeline.delete_funnel", skip_all, fields(id = funnel_id))]
    pub async fn delete_funnel(&self, funnel_id: &str) -> Result<(), DomainError> {
        let request = funnels::delete_request(funnel_id, self.clock.today());
        self.store.save(&request).await?;
        tracing::info!("funnel deactivated");
        Ok(())
    }

    async fn load_funnels(&self) -> Result<Vec<Funnel>, DomainError> {
        let rows = self
            .store
            .load(&funnels::list_request(), funnels::PRIMARY_KEY)
            .await?;
        Ok(rows.iter().map(funnels::from_record).collect())
    }

    // ---- stages ------------------------------------------------------------

    #[instrument(name = "sales_pipeline.list_stages", skip_all, fields(funnel_id = %funnel_id))]
    pub async fn list_stages(&self, funnel_id: &str) -> SoftList<Stage> {
        SoftList::from_result(stages::ENTITY, self.load_stages(funnel_id).await)
    }

    #[instrument(
        name = "sales_pipeline.save_stage",
        skip_all,
        fields(id = draft.existing_id(), funnel_id = %draft.funnel_id)
    )]
    pub async fn save_stage(&self, draft: StageDraft) -> Result<Stage, DomainError> {
        let request = stages::save_request(&draft, &self.config.default_color);
        self.store.save(&request).await?;
        tracing::info!(update = request.is_update(), "stage saved");

        let rows = self.load_stages(&draft.funnel_id).await?;
        pick_saved(rows, draft.existing_id(), |s| &s.id)
            .ok_or_else(|| DomainError::not_found_after_save(stages::ENTITY, draft.existing_id()))
    }

    #[instrument(name = "sales_pipeline.delete_stage", skip_all, fields(id = stage_id))]
    pub async fn delete_stage(&self, stage_id: &str) -> Result<(), DomainError> {
        self.store.save(&stages::delete_request(stage_id)).await?;
        tracing::info!("stage deactivated");
        Ok(())
    }

    async fn load_stages(&self, funnel_id: &str) -> Result<Vec<Stage>, DomainError> {
        let rows = self
            .store
            .load(&stages::list_request(funnel_id), stages::PRIMARY_KEY)
            .await?;
        Ok(rows.iter().map(stages::from_record).collect())
    }

    // ---- leads -------------------------------------------------------------

    #[instrument(name = "sales_pipeline.list_leads", skip_all)]
    pub async fn list_leads(&self) -> SoftList<Lead> {
        SoftList::from_result(leads::ENTITY, self.load_leads().await)
    }

    #[instrument(name = "sales_pipeline.save_lead", skip_all, fields(id = draft.existing_id()))]
    pub async fn save_lead(&self, draft: LeadDraft) -> Result<Lead, DomainError> {
        let request = leads::save_request(&draft, self.clock.today());
        self.store.save(&request).await?;
        tracing::info!(update = request.is_update(), "lead saved");

        let rows = self.load_leads().await?;
        pick_saved(rows, draft.existing_id(), |l| &l.id)
            .ok_or_else(|| DomainError::not_found_after_save(leads::ENTITY, draft.existing_id()))
    }

    #[instrument(name = "sales_pipeline.move_lead", skip_all, fields(lead_id = %lead_id, stage_id = %stage_id))]
    pub async fn move_lead(&self, lead_id: &str, stage_id: &str) -> Result<(), DomainError> {
        let request = leads::move_request(lead_id, stage_id, self.clock.today());
        self.store.save(&request).await?;
        tracing::info!("lead moved");
        Ok(())
    }

    async fn load_leads(&self) -> Result<Vec<Lead>, DomainError> {
        let rows = self
            .store
            .load(&leads::list_request(), leads::PRIMARY_KEY)
            .await?;
        Ok(rows.iter().map(leads::from_record).collect())
    }
}

/// Row matching `id`, or the last row when there is no id.
///
/// The last-row rule assumes the gateway lists new rows last and that no
/// other writer created a row in between.
fn pick_saved<T>(rows: Vec<T>, id: Option<&str>, id_of: impl Fn(&T) -> &String) -> Option<T> {
    match id {
        Some(id) => rows.into_iter().find(|row| id_of(row) == id),
        None => rows.into_iter().last(),
    }
}
