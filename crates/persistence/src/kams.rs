//! KAM rows

use async_trait::async_trait;
use scylla::frame::response::result::Row;
use uuid::Uuid;

use kam_leads_core::{Kam, KamId, KamStore, Result};

use crate::store::{from_millis, to_millis, ScyllaStore};
use crate::PersistenceError;

const KAM_COLUMNS: &str = "kam_id, name, email, phone, created_at";

#[async_trait]
impl KamStore for ScyllaStore {
    async fn save_kam(&self, kam: &Kam) -> Result<Kam> {
        let query = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?)",
            self.table("kams"),
            KAM_COLUMNS
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    kam.id.as_uuid(),
                    &kam.name,
                    &kam.email,
                    &kam.phone,
                    to_millis(kam.created_at),
                ),
            )
            .await
            .map_err(PersistenceError::from)?;

        tracing::info!(kam_id = %kam.id, "KAM saved in ScyllaDB");
        Ok(kam.clone())
    }

    async fn get_kam(&self, id: KamId) -> Result<Option<Kam>> {
        let query = format!(
            "SELECT {} FROM {} WHERE kam_id = ?",
            KAM_COLUMNS,
            self.table("kams")
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (id.as_uuid(),))
            .await
            .map_err(PersistenceError::from)?;

        match result.rows.and_then(|rows| rows.into_iter().next()) {
            Some(row) => Ok(Some(row_to_kam(row)?)),
            None => Ok(None),
        }
    }

    async fn list_kams(&self) -> Result<Vec<Kam>> {
        let query = format!("SELECT {} FROM {}", KAM_COLUMNS, self.table("kams"));

        let result = self
            .client
            .session()
            .query_unpaged(query, &[])
            .await
            .map_err(PersistenceError::from)?;

        let mut kams = result
            .rows
            .unwrap_or_default()
            .into_iter()
            .map(row_to_kam)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        // Token order is arbitrary; list in creation order
        kams.sort_by_key(|kam| kam.created_at);
        Ok(kams)
    }
}

fn row_to_kam(row: Row) -> std::result::Result<Kam, PersistenceError> {
    let (kam_id, name, email, phone, created_at): (
        Uuid,
        Option<String>,
        Option<String>,
        Option<String>,
        i64,
    ) = row
        .into_typed()
        .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

    Ok(Kam {
        id: KamId::from_uuid(kam_id),
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        phone: phone.unwrap_or_default(),
        created_at: from_millis("created_at", created_at)?,
    })
}
