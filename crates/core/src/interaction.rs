//! Logged contact events against a lead

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::ids::{InteractionId, LeadId};

/// Interaction channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionType {
    Call,
    Email,
    Meeting,
    Visit,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Email => "EMAIL",
            Self::Meeting => "MEETING",
            Self::Visit => "VISIT",
        }
    }

    /// Only calls move a lead's call schedule
    pub fn is_call(&self) -> bool {
        matches!(self, Self::Call)
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CALL" => Ok(Self::Call),
            "EMAIL" => Ok(Self::Email),
            "MEETING" => Ok(Self::Meeting),
            "VISIT" => Ok(Self::Visit),
            other => Err(Error::validation(format!("Unknown interaction type: {}", other))),
        }
    }
}

/// A recorded interaction, immutable once stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,
    pub lead_id: LeadId,
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,
    /// Stamped by the engine at recording time
    pub occurred_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Caller input for recording an interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionDraft {
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,
    #[serde(default)]
    pub notes: Option<String>,
    /// Ignored: the engine stamps its own time
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
}

impl InteractionDraft {
    pub fn new(interaction_type: InteractionType) -> Self {
        Self {
            interaction_type,
            notes: None,
            occurred_at: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
