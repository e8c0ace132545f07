//! Lead lifecycle and call scheduling
//!
//! Status is a free field: any status can be overwritten with any other by
//! [`LeadLifecycle::set_status`]. The one automatic transition is that
//! recording an interaction of any type moves the lead to `IN_PROGRESS`.
//! Only `CALL` interactions move the call schedule.
//!
//! Writes are read-modify-write against the store with no version check;
//! two concurrent updates of the same lead can lose one of them.
//! Recording an interaction saves the lead before inserting the interaction,
//! so a failed insert leaves the lead `IN_PROGRESS` and rescheduled with no
//! matching interaction row.

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use std::sync::Arc;

use kam_leads_core::{
    Clock, Error, Interaction, InteractionDraft, InteractionId, InteractionStore, Lead, LeadDraft,
    LeadId, LeadStatus, LeadStore, Result,
};

use crate::validation;

pub struct LeadLifecycle {
    leads: Arc<dyn LeadStore>,
    interactions: Arc<dyn InteractionStore>,
    clock: Arc<dyn Clock>,
    /// Offset that defines "today" for the call queue
    day_offset: FixedOffset,
}

impl LeadLifecycle {
    pub fn new(
        leads: Arc<dyn LeadStore>,
        interactions: Arc<dyn InteractionStore>,
        clock: Arc<dyn Clock>,
        day_offset: FixedOffset,
    ) -> Self {
        Self {
            leads,
            interactions,
            clock,
            day_offset,
        }
    }

    /// Create a lead in status `NEW` with its first call one interval out
    ///
    /// Any status on the draft is ignored.
    pub async fn create_lead(&self, draft: LeadDraft) -> Result<Lead> {
        validation::require_non_empty("name", &draft.name)?;
        let call_frequency_days = match draft.call_frequency_days {
            Some(days) if days > 0 => days,
            Some(_) => return Err(Error::validation("call_frequency_days must be positive")),
            None => return Err(Error::validation("call_frequency_days is required")),
        };

        let lead = Lead::new(
            &draft.name,
            &draft.address,
            call_frequency_days,
            self.clock.now(),
        )?;
        let saved = self.leads.save_lead(&lead).await?;

        tracing::info!(
            lead_id = %saved.id,
            call_frequency_days,
            next_call_date = %saved.next_call_date,
            "Lead created"
        );
        Ok(saved)
    }

    /// Overwrite the status unconditionally; call dates are untouched
    pub async fn set_status(&self, lead_id: LeadId, status: LeadStatus) -> Result<Lead> {
        let mut lead = self.lead(lead_id).await?;
        let previous = lead.status;

        lead.status = status;
        lead.updated_at = self.clock.now();
        let saved = self.leads.save_lead(&lead).await?;

        tracing::info!(%lead_id, from = %previous, to = %status, "Lead status updated");
        Ok(saved)
    }

    /// Log an interaction against a lead
    ///
    /// The lead always moves to `IN_PROGRESS`, including from `CONVERTED` or
    /// `LOST`. A `CALL` also sets the last call to now and the next call one
    /// interval later. The interaction is stamped with the current time; a
    /// caller-supplied time is discarded.
    pub async fn record_interaction(
        &self,
        lead_id: LeadId,
        draft: InteractionDraft,
    ) -> Result<Interaction> {
        let mut lead = self.lead(lead_id).await?;
        let now = self.clock.now();

        lead.status = LeadStatus::InProgress;
        if draft.interaction_type.is_call() {
            lead.mark_called(now)?;
        } else {
            lead.updated_at = now;
        }
        self.leads.save_lead(&lead).await?;

        let interaction = Interaction {
            id: InteractionId::new(),
            lead_id,
            interaction_type: draft.interaction_type,
            occurred_at: now,
            notes: draft.notes,
        };
        let saved = self.interactions.insert_interaction(&interaction).await?;

        metrics::counter!(
            "kam_leads_interactions_recorded_total",
            "type" => saved.interaction_type.as_str()
        )
        .increment(1);
        tracing::info!(
            %lead_id,
            interaction_id = %saved.id,
            interaction_type = %saved.interaction_type,
            next_call_date = %lead.next_call_date,
            "Interaction recorded"
        );
        Ok(saved)
    }

    /// Active leads whose next call falls on the current local day
    pub async fn due_today(&self) -> Result<Vec<Lead>> {
        let (start, end) = local_day_window(self.clock.now(), self.day_offset);
        let due = self
            .leads
            .leads_due_between(start, end, &LeadStatus::ACTIVE)
            .await?;

        tracing::debug!(%start, %end, due = due.len(), "Computed today's calls");
        Ok(due)
    }

    pub async fn list_leads(&self) -> Result<Vec<Lead>> {
        self.leads.list_leads().await
    }

    pub async fn lead(&self, lead_id: LeadId) -> Result<Lead> {
        self.leads
            .get_lead(lead_id)
            .await?
            .ok_or(Error::LeadNotFound(lead_id))
    }

    /// Interaction history of a lead, oldest first
    pub async fn interactions_for(&self, lead_id: LeadId) -> Result<Vec<Interaction>> {
        self.lead(lead_id).await?;
        self.interactions.interactions_for_lead(lead_id).await
    }

    pub async fn interaction(&self, interaction_id: InteractionId) -> Result<Interaction> {
        self.interactions
            .get_interaction(interaction_id)
            .await?
            .ok_or(Error::InteractionNotFound(interaction_id))
    }
}

/// `[start of the local day, start + 1 day)` containing `now`, in UTC
pub fn local_day_window(
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let local = now.with_timezone(&offset);
    let since_midnight = Duration::seconds(i64::from(local.num_seconds_from_midnight()))
        + Duration::nanoseconds(i64::from(local.nanosecond()));
    let start = now - since_midnight;
    (start, start + Duration::days(1))
}
