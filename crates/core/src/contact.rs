//! Contacts attached to a lead

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ContactId, LeadId};

/// A person at the restaurant; at most one per lead is primary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub lead_id: LeadId,
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

/// Caller input for adding or updating a contact
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: String,
}

impl Contact {
    pub fn from_draft(lead_id: LeadId, draft: ContactDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: ContactId::new(),
            lead_id,
            name: draft.name.trim().to_string(),
            role: draft.role.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            is_primary: false,
            created_at: now,
        }
    }

    /// Overwrite the editable details, keeping identity, lead and primary flag
    pub fn apply(&mut self, draft: ContactDraft) {
        self.name = draft.name.trim().to_string();
        self.role = draft.role.trim().to_string();
        self.email = draft.email.trim().to_string();
        self.phone = draft.phone.trim().to_string();
    }
}
