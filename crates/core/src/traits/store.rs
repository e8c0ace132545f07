//! Storage seams
//!
//! Each operation is one atomic unit against the backing store. Writes are
//! upserts keyed by the record id; the engines issue read-modify-write
//! sequences and rely on the store for any serializability beyond that.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::contact::Contact;
use crate::error::Result;
use crate::ids::{ContactId, InteractionId, KamId, LeadId};
use crate::interaction::Interaction;
use crate::kam::Kam;
use crate::lead::{Lead, LeadStatus};
use crate::performance::KamRollup;

/// Supplies per-KAM rollups in one pass
#[async_trait]
pub trait AggregationSource: Send + Sync {
    /// One row per KAM, including KAMs that own no leads
    async fn kam_rollups(&self) -> Result<Vec<KamRollup>>;
}

#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn get_lead(&self, id: LeadId) -> Result<Option<Lead>>;

    /// Insert or overwrite, returning the record as stored
    async fn save_lead(&self, lead: &Lead) -> Result<Lead>;

    async fn list_leads(&self) -> Result<Vec<Lead>>;

    async fn leads_for_kam(&self, kam_id: KamId) -> Result<Vec<Lead>>;

    /// Leads with `start <= next_call_date < end` whose status is in `statuses`
    async fn leads_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        statuses: &[LeadStatus],
    ) -> Result<Vec<Lead>>;
}

#[async_trait]
pub trait KamStore: Send + Sync {
    /// Insert or overwrite, returning the record as stored
    async fn save_kam(&self, kam: &Kam) -> Result<Kam>;

    async fn get_kam(&self, id: KamId) -> Result<Option<Kam>>;

    async fn list_kams(&self) -> Result<Vec<Kam>>;
}

#[async_trait]
pub trait InteractionStore: Send + Sync {
    async fn insert_interaction(&self, interaction: &Interaction) -> Result<Interaction>;

    async fn get_interaction(&self, id: InteractionId) -> Result<Option<Interaction>>;

    /// Oldest first
    async fn interactions_for_lead(&self, lead_id: LeadId) -> Result<Vec<Interaction>>;
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Insert or overwrite, returning the record as stored
    async fn save_contact(&self, contact: &Contact) -> Result<Contact>;

    async fn get_contact(&self, id: ContactId) -> Result<Option<Contact>>;

    /// Oldest first
    async fn contacts_for_lead(&self, lead_id: LeadId) -> Result<Vec<Contact>>;

    async fn delete_contact(&self, id: ContactId) -> Result<()>;

    /// Clear the primary flag on every contact of the lead
    async fn clear_primary_contacts(&self, lead_id: LeadId) -> Result<()>;
}

/// A backend that provides every seam
pub trait Store:
    AggregationSource + LeadStore + KamStore + InteractionStore + ContactStore
{
}

impl<T> Store for T where
    T: AggregationSource + LeadStore + KamStore + InteractionStore + ContactStore
{
}
