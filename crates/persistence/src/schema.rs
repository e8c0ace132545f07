//! ScyllaDB schema creation
//!
//! Timestamps are stored as BIGINT epoch milliseconds. Lookups by owning
//! lead or KAM go through secondary indexes.

use crate::error::PersistenceError;
use scylla::Session;

/// Create the keyspace if it doesn't exist
pub async fn create_keyspace(
    session: &Session,
    keyspace: &str,
    replication_factor: u8,
) -> Result<(), PersistenceError> {
    let query = format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
        keyspace, replication_factor
    );

    session
        .query_unpaged(query, &[])
        .await
        .map_err(|e| PersistenceError::SchemaError(format!("Failed to create keyspace: {}", e)))?;

    Ok(())
}

/// Create all required tables
pub async fn create_tables(session: &Session, keyspace: &str) -> Result<(), PersistenceError> {
    let tables = [
        (
            "kams",
            format!(
                r#"
        CREATE TABLE IF NOT EXISTS {}.kams (
            kam_id UUID,
            name TEXT,
            email TEXT,
            phone TEXT,
            created_at BIGINT,
            PRIMARY KEY (kam_id)
        )"#,
                keyspace
            ),
        ),
        (
            "leads",
            format!(
                r#"
        CREATE TABLE IF NOT EXISTS {}.leads (
            lead_id UUID,
            name TEXT,
            address TEXT,
            status TEXT,
            kam_id UUID,
            call_frequency_days INT,
            next_call_date BIGINT,
            last_call_date BIGINT,
            created_at BIGINT,
            updated_at BIGINT,
            PRIMARY KEY (lead_id)
        )"#,
                keyspace
            ),
        ),
        (
            "interactions",
            format!(
                r#"
        CREATE TABLE IF NOT EXISTS {}.interactions (
            interaction_id UUID,
            lead_id UUID,
            interaction_type TEXT,
            occurred_at BIGINT,
            notes TEXT,
            PRIMARY KEY (interaction_id)
        )"#,
                keyspace
            ),
        ),
        (
            "contacts",
            format!(
                r#"
        CREATE TABLE IF NOT EXISTS {}.contacts (
            contact_id UUID,
            lead_id UUID,
            name TEXT,
            role TEXT,
            email TEXT,
            phone TEXT,
            is_primary BOOLEAN,
            created_at BIGINT,
            PRIMARY KEY (contact_id)
        )"#,
                keyspace
            ),
        ),
    ];

    for (name, ddl) in tables {
        session.query_unpaged(ddl, &[]).await.map_err(|e| {
            PersistenceError::SchemaError(format!("Failed to create {} table: {}", name, e))
        })?;
    }

    tracing::info!("All tables created successfully");
    Ok(())
}

/// Secondary indexes for per-lead and per-KAM lookups
pub async fn create_indexes(session: &Session, keyspace: &str) -> Result<(), PersistenceError> {
    let indexes = [
        ("leads_kam_id_idx", "leads", "kam_id"),
        ("interactions_lead_id_idx", "interactions", "lead_id"),
        ("contacts_lead_id_idx", "contacts", "lead_id"),
    ];

    for (index, table, column) in indexes {
        let ddl = format!(
            "CREATE INDEX IF NOT EXISTS {} ON {}.{} ({})",
            index, keyspace, table, column
        );
        session.query_unpaged(ddl, &[]).await.map_err(|e| {
            PersistenceError::SchemaError(format!("Failed to create index {}: {}", index, e))
        })?;
    }

    Ok(())
}
