//! Client-side lead board with optimistic stage moves.

use sales_pipeline_sdk::{Lead, PipelineClient, PipelineError};

/// Result of [`LeadBoard::move_lead`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The lead was moved; `from` is the stage it left.
    Moved { from: String },
    /// The lead already sat in the target stage. Nothing was sent.
    Unchanged,
    /// No lead with that id on the board. Nothing was sent.
    NotOnBoard,
}

/// Leads of one board view.
///
/// Moves are applied locally before the write and rolled back if the write
/// fails.
#[derive(Debug, Clone, Default)]
pub struct LeadBoard {
    leads: Vec<Lead>,
}

impl LeadBoard {
    #[must_use]
    pub fn new(leads: Vec<Lead>) -> Self {
        Self { leads }
    }

    /// Reload from the client, replacing everything on the board.
    pub async fn refresh<C: PipelineClient + ?Sized>(&mut self, client: &C) {
        self.leads = client.list_leads().await;
    }

    #[must_use]
    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    /// Leads in `stage_id` whose name or description contains `search`,
    /// ignoring case. An empty search matches everything.
    #[must_use]
    pub fn leads_in_stage(&self, stage_id: &str, search: &str) -> Vec<&Lead> {
        let needle = search.trim().to_lowercase();
        self.leads
            .iter()
            .filter(|lead| lead.stage_id == stage_id)
            .filter(|lead| {
                needle.is_empty()
                    || lead.name.to_lowercase().contains(&needle)
                    || lead.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Sum of lead values in a stage.
    #[must_use]
    pub fn stage_total(&self, stage_id: &str) -> f64 {
        self.leads
            .iter()
            .filter(|lead| lead.stage_id == stage_id)
            .map(|lead| lead.value)
            .sum()
    }

    /// Move a lead to `stage_id`, optimistically.
    ///
    /// # Errors
    ///
    /// Returns the client's error after restoring the lead's previous stage.
    pub async fn move_lead<C: PipelineClient + ?Sized>(
        &mut self,
        client: &C,
        lead_id: &str,
        stage_id: &str,
    ) -> Result<MoveOutcome, PipelineError> {
        let Some(index) = self.leads.iter().position(|lead| lead.id == lead_id) else {
            return Ok(MoveOutcome::NotOnBoard);
        };
        if self.leads[index].stage_id == stage_id {
            return Ok(MoveOutcome::Unchanged);
        }

        let from = std::mem::replace(&mut self.leads[index].stage_id, stage_id.to_owned());

        match client.move_lead(lead_id, stage_id).await {
            Ok(()) => Ok(MoveOutcome::Moved { from }),
            Err(e) => {
                tracing::warn!(lead_id, error = %e, "lead move rejected; rolled back");
                self.leads[index].stage_id = from;
                Err(e)
            }
        }
    }
}
