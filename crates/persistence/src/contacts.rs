//! Contact rows

use async_trait::async_trait;
use scylla::frame::response::result::Row;
use uuid::Uuid;

use kam_leads_core::{Contact, ContactId, ContactStore, LeadId, Result};

use crate::store::{from_millis, to_millis, ScyllaStore};
use crate::PersistenceError;

const CONTACT_COLUMNS: &str = "contact_id, lead_id, name, role, email, phone, is_primary, created_at";

#[async_trait]
impl ContactStore for ScyllaStore {
    async fn save_contact(&self, contact: &Contact) -> Result<Contact> {
        let query = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            self.table("contacts"),
            CONTACT_COLUMNS
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    contact.id.as_uuid(),
                    contact.lead_id.as_uuid(),
                    &contact.name,
                    &contact.role,
                    &contact.email,
                    &contact.phone,
                    contact.is_primary,
                    to_millis(contact.created_at),
                ),
            )
            .await
            .map_err(PersistenceError::from)?;

        tracing::debug!(contact_id = %contact.id, lead_id = %contact.lead_id, "Contact saved");
        Ok(contact.clone())
    }

    async fn get_contact(&self, id: ContactId) -> Result<Option<Contact>> {
        let query = format!(
            "SELECT {} FROM {} WHERE contact_id = ?",
            CONTACT_COLUMNS,
            self.table("contacts")
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (id.as_uuid(),))
            .await
            .map_err(PersistenceError::from)?;

        match result.rows.and_then(|rows| rows.into_iter().next()) {
            Some(row) => Ok(Some(row_to_contact(row)?)),
            None => Ok(None),
        }
    }

    async fn contacts_for_lead(&self, lead_id: LeadId) -> Result<Vec<Contact>> {
        let query = format!(
            "SELECT {} FROM {} WHERE lead_id = ?",
            CONTACT_COLUMNS,
            self.table("contacts")
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (lead_id.as_uuid(),))
            .await
            .map_err(PersistenceError::from)?;

        let mut contacts = result
            .rows
            .unwrap_or_default()
            .into_iter()
            .map(row_to_contact)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        contacts.sort_by_key(|contact| contact.created_at);
        Ok(contacts)
    }

    async fn delete_contact(&self, id: ContactId) -> Result<()> {
        let query = format!("DELETE FROM {} WHERE contact_id = ?", self.table("contacts"));

        self.client
            .session()
            .query_unpaged(query, (id.as_uuid(),))
            .await
            .map_err(PersistenceError::from)?;

        tracing::info!(contact_id = %id, "Contact deleted");
        Ok(())
    }

    async fn clear_primary_contacts(&self, lead_id: LeadId) -> Result<()> {
        let query = format!(
            "UPDATE {} SET is_primary = false WHERE contact_id = ?",
            self.table("contacts")
        );

        for contact in self.contacts_for_lead(lead_id).await? {
            if !contact.is_primary {
                continue;
            }
            self.client
                .session()
                .query_unpaged(query.clone(), (contact.id.as_uuid(),))
                .await
                .map_err(PersistenceError::from)?;
        }

        Ok(())
    }
}

fn row_to_contact(row: Row) -> std::result::Result<Contact, PersistenceError> {
    let (contact_id, lead_id, name, role, email, phone, is_primary, created_at): (
        Uuid,
        Uuid,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<bool>,
        i64,
    ) = row
        .into_typed()
        .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

    Ok(Contact {
        id: ContactId::from_uuid(contact_id),
        lead_id: LeadId::from_uuid(lead_id),
        name: name.unwrap_or_default(),
        role: role.unwrap_or_default(),
        email: email.unwrap_or_default(),
        phone: phone.unwrap_or_default(),
        is_primary: is_primary.unwrap_or(false),
        created_at: from_millis("created_at", created_at)?,
    })
}
