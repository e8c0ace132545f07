//! Core traits and types for KAM lead tracking
//!
//! This crate provides foundational types used across all other crates:
//! - Record types (leads, KAMs, interactions, contacts) and their id handles
//! - Derived performance projections (rollups, conversion rates)
//! - Store traits for pluggable backends (in-memory, ScyllaDB)
//! - The clock seam used for scheduling
//! - Error types

pub mod contact;
pub mod error;
pub mod ids;
pub mod interaction;
pub mod kam;
pub mod lead;
pub mod performance;
pub mod traits;

pub use contact::{Contact, ContactDraft};
pub use error::{Error, Result};
pub use ids::{ContactId, InteractionId, KamId, LeadId};
pub use interaction::{Interaction, InteractionDraft, InteractionType};
pub use kam::{Kam, KamDraft};
pub use lead::{Lead, LeadDraft, LeadStatus};
pub use performance::{KamPerformance, KamRollup, Ranking};

// Trait re-exports
pub use traits::{
    AggregationSource, Clock, ContactStore, FixedClock, InteractionStore, KamStore, LeadStore,
    Store, SystemClock,
};
