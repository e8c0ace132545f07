//! In-memory store
//!
//! Each table is an arena: records live in a `Vec` in insertion order and a
//! `HashMap` maps the id handle to the slot. Relationships are id fields and
//! navigation is a scan of the related table. Used for development and tests,
//! and as the fallback when ScyllaDB is disabled or unreachable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;

use kam_leads_core::{
    AggregationSource, Contact, ContactId, ContactStore, Interaction, InteractionId,
    InteractionStore, Kam, KamId, KamRollup, KamStore, Lead, LeadId, LeadStatus, LeadStore,
    Result,
};

/// Records in insertion order plus an id index
#[derive(Debug)]
struct Table<K, V> {
    rows: Vec<V>,
    index: HashMap<K, usize>,
}

impl<K: Copy + Eq + Hash, V: Clone> Table<K, V> {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Overwrite in place, or append a new slot
    fn upsert(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(&slot) => self.rows[slot] = value,
            None => {
                self.index.insert(key, self.rows.len());
                self.rows.push(value);
            }
        }
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&slot| &self.rows[slot])
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let slot = self.index.remove(key)?;
        let removed = self.rows.remove(slot);
        for position in self.index.values_mut() {
            if *position > slot {
                *position -= 1;
            }
        }
        Some(removed)
    }

    fn iter(&self) -> impl Iterator<Item = &V> {
        self.rows.iter()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.rows.iter_mut()
    }
}

/// Process-local store for every record kind
#[derive(Debug)]
pub struct InMemoryStore {
    kams: RwLock<Table<KamId, Kam>>,
    leads: RwLock<Table<LeadId, Lead>>,
    interactions: RwLock<Table<InteractionId, Interaction>>,
    contacts: RwLock<Table<ContactId, Contact>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            kams: RwLock::new(Table::new()),
            leads: RwLock::new(Table::new()),
            interactions: RwLock::new(Table::new()),
            contacts: RwLock::new(Table::new()),
        }
    }

    /// Contact rows held in the arena, including any not reachable by index
    #[cfg(test)]
    fn contact_rows(&self) -> usize {
        self.contacts.read().rows.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AggregationSource for InMemoryStore {
    async fn kam_rollups(&self) -> Result<Vec<KamRollup>> {
        let mut counts: HashMap<KamId, (u32, u32)> = HashMap::new();
        for lead in self.leads.read().iter() {
            if let Some(kam_id) = lead.kam_id {
                let entry = counts.entry(kam_id).or_default();
                entry.0 += 1;
                if lead.status == LeadStatus::Converted {
                    entry.1 += 1;
                }
            }
        }

        let rollups = self
            .kams
            .read()
            .iter()
            .map(|kam| {
                let (total_leads, converted_leads) =
                    counts.get(&kam.id).copied().unwrap_or_default();
                KamRollup {
                    kam_id: kam.id,
                    name: kam.name.clone(),
                    email: kam.email.clone(),
                    phone: kam.phone.clone(),
                    total_leads,
                    converted_leads,
                }
            })
            .collect();

        Ok(rollups)
    }
}

#[async_trait]
impl LeadStore for InMemoryStore {
    async fn get_lead(&self, id: LeadId) -> Result<Option<Lead>> {
        Ok(self.leads.read().get(&id).cloned())
    }

    async fn save_lead(&self, lead: &Lead) -> Result<Lead> {
        self.leads.write().upsert(lead.id, lead.clone());
        Ok(lead.clone())
    }

    async fn list_leads(&self) -> Result<Vec<Lead>> {
        Ok(self.leads.read().iter().cloned().collect())
    }

    async fn leads_for_kam(&self, kam_id: KamId) -> Result<Vec<Lead>> {
        Ok(self
            .leads
            .read()
            .iter()
            .filter(|lead| lead.kam_id == Some(kam_id))
            .cloned()
            .collect())
    }

    async fn leads_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        statuses: &[LeadStatus],
    ) -> Result<Vec<Lead>> {
        Ok(self
            .leads
            .read()
            .iter()
            .filter(|lead| lead.next_call_date >= start && lead.next_call_date < end)
            .filter(|lead| statuses.contains(&lead.status))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl KamStore for InMemoryStore {
    async fn save_kam(&self, kam: &Kam) -> Result<Kam> {
        self.kams.write().upsert(kam.id, kam.clone());
        Ok(kam.clone())
    }

    async fn get_kam(&self, id: KamId) -> Result<Option<Kam>> {
        Ok(self.kams.read().get(&id).cloned())
    }

    async fn list_kams(&self) -> Result<Vec<Kam>> {
        Ok(self.kams.read().iter().cloned().collect())
    }
}

#[async_trait]
impl InteractionStore for InMemoryStore {
    async fn insert_interaction(&self, interaction: &Interaction) -> Result<Interaction> {
        self.interactions
            .write()
            .upsert(interaction.id, interaction.clone());
        Ok(interaction.clone())
    }

    async fn get_interaction(&self, id: InteractionId) -> Result<Option<Interaction>> {
        Ok(self.interactions.read().get(&id).cloned())
    }

    async fn interactions_for_lead(&self, lead_id: LeadId) -> Result<Vec<Interaction>> {
        let mut interactions: Vec<Interaction> = self
            .interactions
            .read()
            .iter()
            .filter(|interaction| interaction.lead_id == lead_id)
            .cloned()
            .collect();
        // Stable: same-instant interactions keep insertion order
        interactions.sort_by_key(|interaction| interaction.occurred_at);
        Ok(interactions)
    }
}

#[async_trait]
impl ContactStore for InMemoryStore {
    async fn save_contact(&self, contact: &Contact) -> Result<Contact> {
        self.contacts.write().upsert(contact.id, contact.clone());
        Ok(contact.clone())
    }

    async fn get_contact(&self, id: ContactId) -> Result<Option<Contact>> {
        Ok(self.contacts.read().get(&id).cloned())
    }

    async fn contacts_for_lead(&self, lead_id: LeadId) -> Result<Vec<Contact>> {
        let mut contacts: Vec<Contact> = self
            .contacts
            .read()
            .iter()
            .filter(|contact| contact.lead_id == lead_id)
            .cloned()
            .collect();
        contacts.sort_by_key(|contact| contact.created_at);
        Ok(contacts)
    }

    async fn delete_contact(&self, id: ContactId) -> Result<()> {
        self.contacts.write().remove(&id);
        Ok(())
    }

    async fn clear_primary_contacts(&self, lead_id: LeadId) -> Result<()> {
        for contact in self
            .contacts
            .write()
            .iter_mut()
            .filter(|contact| contact.lead_id == lead_id)
        {
            contact.is_primary = false;
        }
        Ok(())
    }
}
