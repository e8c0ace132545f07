//! KAM directory and lead assignment

use std::sync::Arc;

use kam_leads_core::{
    Clock, Error, Kam, KamDraft, KamId, KamStore, Lead, LeadId, LeadStore, Result,
};

use crate::validation;

pub struct KamDirectory {
    kams: Arc<dyn KamStore>,
    leads: Arc<dyn LeadStore>,
    clock: Arc<dyn Clock>,
}

impl KamDirectory {
    pub fn new(kams: Arc<dyn KamStore>, leads: Arc<dyn LeadStore>, clock: Arc<dyn Clock>) -> Self {
        Self { kams, leads, clock }
    }

    pub async fn add_kam(&self, draft: KamDraft) -> Result<Kam> {
        validation::require_non_empty("name", &draft.name)?;
        validation::validate_email(&draft.email)?;
        validation::validate_phone(&draft.phone)?;

        let kam = self.kams.save_kam(&Kam::from_draft(draft, self.clock.now())).await?;
        tracing::info!(kam_id = %kam.id, name = %kam.name, "KAM added");
        Ok(kam)
    }

    /// May be empty
    pub async fn list_kams(&self) -> Result<Vec<Kam>> {
        self.kams.list_kams().await
    }

    pub async fn kam(&self, kam_id: KamId) -> Result<Kam> {
        self.kams
            .get_kam(kam_id)
            .await?
            .ok_or(Error::KamNotFound(kam_id))
    }

    /// Point every listed lead at this KAM, replacing any previous owner
    ///
    /// All leads are resolved before the first write, so an unknown id leaves
    /// every lead untouched.
    pub async fn assign_leads(&self, kam_id: KamId, lead_ids: &[LeadId]) -> Result<Kam> {
        let kam = self.kam(kam_id).await?;

        let mut leads = Vec::with_capacity(lead_ids.len());
        for &lead_id in lead_ids {
            let lead = self
                .leads
                .get_lead(lead_id)
                .await?
                .ok_or(Error::LeadNotFound(lead_id))?;
            leads.push(lead);
        }

        let now = self.clock.now();
        for mut lead in leads {
            if let Some(previous) = lead.kam_id.filter(|&owner| owner != kam_id) {
                tracing::debug!(
                    lead_id = %lead.id,
                    from = %previous,
                    to = %kam_id,
                    "Reassigning lead"
                );
            }
            lead.kam_id = Some(kam_id);
            lead.updated_at = now;
            self.leads.save_lead(&lead).await?;
        }

        tracing::info!(%kam_id, assigned = lead_ids.len(), "Leads assigned");
        Ok(kam)
    }

    /// Leads currently owned by the KAM; may be empty
    pub async fn leads_for_kam(&self, kam_id: KamId) -> Result<Vec<Lead>> {
        self.kam(kam_id).await?;
        self.leads.leads_for_kam(kam_id).await
    }
}
