//! KAM directory and contact book

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use kam_leads_core::{
    ContactDraft, ContactId, Error, FixedClock, KamDraft, KamId, LeadDraft, LeadId, LeadStore,
};
use kam_leads_engine::{ContactBook, KamDirectory, LeadLifecycle};
use kam_leads_persistence::InMemoryStore;

struct Harness {
    store: Arc<InMemoryStore>,
    clock: Arc<FixedClock>,
    kams: KamDirectory,
    leads: LeadLifecycle,
    contacts: ContactBook,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    ));
    let utc = chrono::FixedOffset::east_opt(0).unwrap();

    Harness {
        kams: KamDirectory::new(store.clone(), store.clone(), clock.clone()),
        leads: LeadLifecycle::new(store.clone(), store.clone(), clock.clone(), utc),
        contacts: ContactBook::new(store.clone(), store.clone(), clock.clone()),
        store,
        clock,
    }
}

fn kam_draft(name: &str) -> KamDraft {
    KamDraft {
        name: name.to_string(),
        email: "asha.rao@example.com".to_string(),
        phone: "+919876543210".to_string(),
    }
}

fn contact_draft(name: &str, role: &str) -> ContactDraft {
    ContactDraft {
        name: name.to_string(),
        role: role.to_string(),
        email: format!("{}@spicegarden.in", name.to_lowercase().replace(' ', ".")),
        phone: "9876543210".to_string(),
    }
}

impl Harness {
    async fn lead(&self, name: &str) -> LeadId {
        self.leads
            .create_lead(LeadDraft {
                name: name.to_string(),
                call_frequency_days: Some(7),
                ..Default::default()
            })
            .await
            .unwrap()
            .id
    }

    /// Advance the clock so contacts get distinct creation times
    async fn contact(&self, lead_id: LeadId, name: &str, role: &str) -> ContactId {
        self.clock.advance(Duration::minutes(1));
        self.contacts
            .add_contact(lead_id, contact_draft(name, role))
            .await
            .unwrap()
            .id
    }
}

#[tokio::test]
async fn test_add_kam_validates_details() {
    let h = harness();

    let mut bad_email = kam_draft("Asha");
    bad_email.email = "asha-at-example".to_string();
    assert!(matches!(h.kams.add_kam(bad_email).await, Err(Error::Validation(_))));

    let mut bad_phone = kam_draft("Asha");
    bad_phone.phone = "12345".to_string();
    assert!(matches!(h.kams.add_kam(bad_phone).await, Err(Error::Validation(_))));

    assert!(h.kams.list_kams().await.unwrap().is_empty());

    let kam = h.kams.add_kam(kam_draft(" Asha Rao ")).await.unwrap();
    assert_eq!(kam.name, "Asha Rao");
    assert_eq!(h.kams.list_kams().await.unwrap(), vec![kam]);
}

#[tokio::test]
async fn test_assignment_is_all_or_nothing() {
    let h = harness();
    let kam = h.kams.add_kam(kam_draft("Asha")).await.unwrap();
    let known = h.lead("Spice Garden").await;
    let missing = LeadId::new();

    assert_eq!(
        h.kams.assign_leads(kam.id, &[known, missing]).await,
        Err(Error::LeadNotFound(missing))
    );
    assert!(h.store.get_lead(known).await.unwrap().unwrap().kam_id.is_none());

    h.kams.assign_leads(kam.id, &[known]).await.unwrap();
    assert_eq!(
        h.store.get_lead(known).await.unwrap().unwrap().kam_id,
        Some(kam.id)
    );
}

#[tokio::test]
async fn test_unknown_kam() {
    let h = harness();
    let lead = h.lead("Spice Garden").await;
    let missing = KamId::new();

    assert_eq!(
        h.kams.assign_leads(missing, &[lead]).await,
        Err(Error::KamNotFound(missing))
    );
    assert_eq!(
        h.kams.leads_for_kam(missing).await,
        Err(Error::KamNotFound(missing))
    );
}

#[tokio::test]
async fn test_first_contact_is_primary() {
    let h = harness();
    let lead = h.lead("Spice Garden").await;

    assert_eq!(
        h.contacts.primary_contact(lead).await,
        Err(Error::PrimaryContactNotFound(lead))
    );

    let owner = h.contact(lead, "Meera", "Owner").await;
    let chef = h.contact(lead, "Kiran", "Chef").await;

    let primary = h.contacts.primary_contact(lead).await.unwrap();
    assert_eq!(primary.id, owner);

    let contacts = h.contacts.contacts_for(lead).await.unwrap();
    assert_eq!(contacts.len(), 2);
    assert!(!contacts.iter().find(|c| c.id == chef).unwrap().is_primary);
}

#[tokio::test]
async fn test_set_primary_moves_flag() {
    let h = harness();
    let lead = h.lead("Spice Garden").await;
    let owner = h.contact(lead, "Meera", "Owner").await;
    let manager = h.contact(lead, "Vikram", "Manager").await;

    h.contacts.set_primary(lead, manager).await.unwrap();

    let contacts = h.contacts.contacts_for(lead).await.unwrap();
    let primaries: Vec<ContactId> = contacts
        .iter()
        .filter(|c| c.is_primary)
        .map(|c| c.id)
        .collect();
    assert_eq!(primaries, vec![manager]);
    assert_ne!(primaries[0], owner);
}

#[tokio::test]
async fn test_set_primary_rejects_foreign_contact() {
    let h = harness();
    let lead = h.lead("Spice Garden").await;
    let other_lead = h.lead("Dosa Hut").await;
    let foreign = h.contact(other_lead, "Ravi", "Owner").await;

    assert!(matches!(
        h.contacts.set_primary(lead, foreign).await,
        Err(Error::Validation(_))
    ));

    let missing = ContactId::new();
    assert_eq!(
        h.contacts.set_primary(lead, missing).await,
        Err(Error::ContactNotFound(missing))
    );
}

#[tokio::test]
async fn test_deleting_primary_promotes_earliest_remaining() {
    let h = harness();
    let lead = h.lead("Spice Garden").await;
    let owner = h.contact(lead, "Meera", "Owner").await;
    let chef = h.contact(lead, "Kiran", "Chef").await;
    h.contact(lead, "Vikram", "Manager").await;

    h.contacts.delete_contact(owner).await.unwrap();

    assert_eq!(h.contacts.primary_contact(lead).await.unwrap().id, chef);
    assert_eq!(
        h.contacts.delete_contact(owner).await,
        Err(Error::ContactNotFound(owner))
    );
}

#[tokio::test]
async fn test_update_keeps_primary_and_lead() {
    let h = harness();
    let lead = h.lead("Spice Garden").await;
    let owner = h.contact(lead, "Meera", "Owner").await;

    let updated = h
        .contacts
        .update_contact(owner, contact_draft("Meera Iyer", "Co-owner"))
        .await
        .unwrap();
    assert_eq!(updated.name, "Meera Iyer");
    assert_eq!(updated.role, "Co-owner");
    assert!(updated.is_primary);
    assert_eq!(updated.lead_id, lead);

    let mut invalid = contact_draft("Meera", "Owner");
    invalid.phone = "call me".to_string();
    assert!(matches!(
        h.contacts.update_contact(owner, invalid).await,
        Err(Error::Validation(_))
    ));
}

#[tokio::test]
async fn test_contacts_by_role() {
    let h = harness();
    let lead = h.lead("Spice Garden").await;
    h.contact(lead, "Meera", "Owner").await;
    h.contact(lead, "Kiran", "Chef").await;
    h.contact(lead, "Arjun", "chef").await;

    let chefs = h.contacts.contacts_by_role(lead, "CHEF").await.unwrap();
    assert_eq!(chefs.len(), 2);

    let missing = LeadId::new();
    assert_eq!(
        h.contacts.contacts_by_role(missing, "Chef").await,
        Err(Error::LeadNotFound(missing))
    );
}
