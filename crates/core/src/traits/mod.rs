//! Core traits for the lead tracker
//!
//! Engines depend only on these seams, which enables:
//! - Pluggable backends (in-memory arena or ScyllaDB)
//! - Testing against an in-memory store and a fixed clock
//!
//! # Trait Hierarchy
//!
//! ```text
//! Storage:
//!   - AggregationSource: per-KAM rollups for the ranking engine
//!   - LeadStore: lead records and the due-call filter
//!   - KamStore: KAM records
//!   - InteractionStore: append-only interaction log
//!   - ContactStore: contacts per lead
//!   - Store: everything above, for wiring a single backend
//!
//! Time:
//!   - Clock: current instant, fixed in tests
//! ```

mod clock;
mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use store::{AggregationSource, ContactStore, InteractionStore, KamStore, LeadStore, Store};
