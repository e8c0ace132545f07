//! Contacts of a lead and primary-contact bookkeeping
//!
//! A lead has at most one primary contact. The first contact added becomes
//! primary, and deleting the primary promotes the earliest remaining contact.

use std::sync::Arc;

use kam_leads_core::{
    Clock, Contact, ContactDraft, ContactId, ContactStore, Error, LeadId, LeadStore, Result,
};

use crate::validation;

pub struct ContactBook {
    contacts: Arc<dyn ContactStore>,
    leads: Arc<dyn LeadStore>,
    clock: Arc<dyn Clock>,
}

impl ContactBook {
    pub fn new(
        contacts: Arc<dyn ContactStore>,
        leads: Arc<dyn LeadStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            contacts,
            leads,
            clock,
        }
    }

    pub async fn add_contact(&self, lead_id: LeadId, draft: ContactDraft) -> Result<Contact> {
        self.ensure_lead(lead_id).await?;
        validate(&draft)?;

        let mut contact = Contact::from_draft(lead_id, draft, self.clock.now());
        contact.is_primary = self.contacts.contacts_for_lead(lead_id).await?.is_empty();

        let saved = self.contacts.save_contact(&contact).await?;
        tracing::info!(
            contact_id = %saved.id,
            %lead_id,
            is_primary = saved.is_primary,
            "Contact added"
        );
        Ok(saved)
    }

    pub async fn contacts_for(&self, lead_id: LeadId) -> Result<Vec<Contact>> {
        self.ensure_lead(lead_id).await?;
        self.contacts.contacts_for_lead(lead_id).await
    }

    /// Role match ignores ASCII case and surrounding whitespace
    pub async fn contacts_by_role(&self, lead_id: LeadId, role: &str) -> Result<Vec<Contact>> {
        let role = role.trim();
        let mut contacts = self.contacts_for(lead_id).await?;
        contacts.retain(|contact| contact.role.eq_ignore_ascii_case(role));
        Ok(contacts)
    }

    /// Replace name, role, email and phone; lead and primary flag are kept
    pub async fn update_contact(
        &self,
        contact_id: ContactId,
        draft: ContactDraft,
    ) -> Result<Contact> {
        let mut contact = self.contact(contact_id).await?;
        validate(&draft)?;

        contact.apply(draft);
        let saved = self.contacts.save_contact(&contact).await?;
        tracing::info!(%contact_id, "Contact updated");
        Ok(saved)
    }

    pub async fn delete_contact(&self, contact_id: ContactId) -> Result<()> {
        let contact = self.contact(contact_id).await?;
        self.contacts.delete_contact(contact_id).await?;

        if contact.is_primary {
            let remaining = self.contacts.contacts_for_lead(contact.lead_id).await?;
            if let Some(mut successor) = remaining.into_iter().next() {
                successor.is_primary = true;
                self.contacts.save_contact(&successor).await?;
                tracing::info!(
                    lead_id = %contact.lead_id,
                    contact_id = %successor.id,
                    "Primary contact reassigned"
                );
            }
        }

        tracing::info!(%contact_id, lead_id = %contact.lead_id, "Contact deleted");
        Ok(())
    }

    pub async fn primary_contact(&self, lead_id: LeadId) -> Result<Contact> {
        self.contacts_for(lead_id)
            .await?
            .into_iter()
            .find(|contact| contact.is_primary)
            .ok_or(Error::PrimaryContactNotFound(lead_id))
    }

    /// Make `contact_id` the only primary contact of the lead
    pub async fn set_primary(&self, lead_id: LeadId, contact_id: ContactId) -> Result<Contact> {
        self.ensure_lead(lead_id).await?;
        let mut contact = self.contact(contact_id).await?;
        if contact.lead_id != lead_id {
            return Err(Error::validation(format!(
                "Contact {} does not belong to lead {}",
                contact_id, lead_id
            )));
        }

        self.contacts.clear_primary_contacts(lead_id).await?;
        contact.is_primary = true;
        let saved = self.contacts.save_contact(&contact).await?;

        tracing::info!(%lead_id, %contact_id, "Primary contact set");
        Ok(saved)
    }

    async fn contact(&self, contact_id: ContactId) -> Result<Contact> {
        self.contacts
            .get_contact(contact_id)
            .await?
            .ok_or(Error::ContactNotFound(contact_id))
    }

    async fn ensure_lead(&self, lead_id: LeadId) -> Result<()> {
        match self.leads.get_lead(lead_id).await? {
            Some(_) => Ok(()),
            None => Err(Error::LeadNotFound(lead_id)),
        }
    }
}

fn validate(draft: &ContactDraft) -> Result<()> {
    validation::require_non_empty("name", &draft.name)?;
    validation::require_non_empty("role", &draft.role)?;
    validation::validate_email(&draft.email)?;
    validation::validate_phone(&draft.phone)?;
    Ok(())
}
