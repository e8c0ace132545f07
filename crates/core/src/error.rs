//! Error types shared by the engines and the store traits

use crate::ids::{ContactId, InteractionId, KamId, LeadId};
use crate::performance::Ranking;
use thiserror::Error;

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, Error>;

/// Engine and store errors
///
/// Every failure is a deterministic function of the current data; nothing here
/// is worth retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("KAM not found with id: {0}")]
    KamNotFound(KamId),

    #[error("Lead not found with id: {0}")]
    LeadNotFound(LeadId),

    #[error("Contact not found with id: {0}")]
    ContactNotFound(ContactId),

    #[error("Interaction not found with id: {0}")]
    InteractionNotFound(InteractionId),

    #[error("Primary contact not found for lead id: {0}")]
    PrimaryContactNotFound(LeadId),

    #[error("No KAMs found")]
    NoKamsFound,

    #[error("No KAM performance data available")]
    NoPerformanceData,

    #[error("No {0} KAMs found relative to the average conversion rate")]
    NoQualifyingKams(Ranking),

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The store rejected or lost a write
    #[error("Internal failure: {0}")]
    Internal(String),
}

impl Error {
    /// Errors meaning "no data matches" rather than a fault
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::KamNotFound(_)
                | Self::LeadNotFound(_)
                | Self::ContactNotFound(_)
                | Self::InteractionNotFound(_)
                | Self::PrimaryContactNotFound(_)
                | Self::NoKamsFound
                | Self::NoPerformanceData
                | Self::NoQualifyingKams(_)
        )
    }

    /// Short, stable label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::KamNotFound(_) => "kam_not_found",
            Self::LeadNotFound(_) => "lead_not_found",
            Self::ContactNotFound(_) => "contact_not_found",
            Self::InteractionNotFound(_) => "interaction_not_found",
            Self::PrimaryContactNotFound(_) => "primary_contact_not_found",
            Self::NoKamsFound => "no_kams_found",
            Self::NoPerformanceData => "no_performance_data",
            Self::NoQualifyingKams(_) => "no_qualifying_kams",
            Self::Validation(_) => "validation",
            Self::Internal(_) => "internal",
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
