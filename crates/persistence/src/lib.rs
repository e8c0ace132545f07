//! Storage backends for the KAM lead tracker
//!
//! - [`InMemoryStore`]: arena tables behind `parking_lot` locks, for
//!   development, tests and fallback
//! - [`ScyllaStore`]: ScyllaDB tables keyed by record id
//!
//! Both implement every seam in `kam_leads_core::traits`.

pub mod client;
pub mod contacts;
pub mod error;
pub mod interactions;
pub mod kams;
pub mod leads;
pub mod memory;
pub mod schema;
pub mod store;

pub use client::{ScyllaClient, ScyllaConfig};
pub use error::PersistenceError;
pub use memory::InMemoryStore;
pub use store::ScyllaStore;

/// Connect to ScyllaDB, ensure the schema and return the store
pub async fn init(config: ScyllaConfig) -> Result<ScyllaStore, PersistenceError> {
    let client = ScyllaClient::connect(config).await?;
    client.ensure_schema().await?;
    Ok(ScyllaStore::new(client))
}
