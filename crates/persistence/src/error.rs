//! Persistence errors

use scylla::transport::errors::{NewSessionError, QueryError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to connect to ScyllaDB: {0}")]
    Connection(#[from] NewSessionError),

    #[error("Query failed: {0}")]
    Query(#[from] QueryError),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Store failures reach the engines as internal failures
impl From<PersistenceError> for kam_leads_core::Error {
    fn from(err: PersistenceError) -> Self {
        tracing::error!(error = %err, "Store operation failed");
        kam_leads_core::Error::Internal(err.to_string())
    }
}
