//! Key account managers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::KamId;

/// A key account manager
///
/// Lead ownership lives on the lead (`Lead::kam_id`); the KAM record does
/// not embed its leads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kam {
    pub id: KamId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// Caller input for creating a KAM
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KamDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Kam {
    pub fn from_draft(draft: KamDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: KamId::new(),
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            created_at: now,
        }
    }
}
