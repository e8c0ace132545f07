//! Engines of the KAM lead tracker
//!
//! - [`PerformanceEngine`]: conversion-rate projections and rankings
//! - [`LeadLifecycle`]: lead status, interactions and call scheduling
//! - [`KamDirectory`]: KAMs and lead ownership
//! - [`ContactBook`]: contacts of a lead
//!
//! Engines hold no mutable state; every call reads fresh from the store.

pub mod contacts;
pub mod kams;
pub mod lifecycle;
pub mod performance;
pub mod validation;

pub use contacts::ContactBook;
pub use kams::KamDirectory;
pub use lifecycle::{local_day_window, LeadLifecycle};
pub use performance::{mean_conversion_rate, rank, PerformanceEngine};
