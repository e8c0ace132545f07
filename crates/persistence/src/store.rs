//! ScyllaDB-backed store
//!
//! One `ScyllaStore` implements every storage seam over a shared session.
//! Tables are keyed by record id; reads by owner go through secondary indexes
//! and aggregates are computed client-side from a scan.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use kam_leads_core::{AggregationSource, KamId, KamRollup, KamStore, LeadStatus, Result};

use crate::{PersistenceError, ScyllaClient};

#[derive(Clone)]
pub struct ScyllaStore {
    pub(crate) client: ScyllaClient,
}

impl ScyllaStore {
    pub fn new(client: ScyllaClient) -> Self {
        Self { client }
    }

    /// `{keyspace}.{table}`
    pub(crate) fn table(&self, table: &str) -> String {
        format!("{}.{}", self.client.keyspace(), table)
    }
}

pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_millis(
    field: &str,
    millis: i64,
) -> std::result::Result<DateTime<Utc>, PersistenceError> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        PersistenceError::InvalidData(format!("{} out of range: {}", field, millis))
    })
}

#[async_trait]
impl AggregationSource for ScyllaStore {
    async fn kam_rollups(&self) -> Result<Vec<KamRollup>> {
        let kams = self.list_kams().await?;

        let query = format!("SELECT kam_id, status FROM {}", self.table("leads"));
        let result = self
            .client
            .session()
            .query_unpaged(query, &[])
            .await
            .map_err(PersistenceError::from)?;

        let mut counts: HashMap<KamId, (u32, u32)> = HashMap::new();
        for row in result.rows.unwrap_or_default() {
            let (kam_id, status): (Option<uuid::Uuid>, String) = row
                .into_typed()
                .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;
            let Some(kam_id) = kam_id else { continue };

            let entry = counts.entry(KamId::from_uuid(kam_id)).or_default();
            entry.0 += 1;
            if status == LeadStatus::Converted.as_str() {
                entry.1 += 1;
            }
        }

        tracing::debug!(kams = kams.len(), "Computed KAM rollups");

        Ok(kams
            .into_iter()
            .map(|kam| {
                let (total_leads, converted_leads) =
                    counts.get(&kam.id).copied().unwrap_or_default();
                KamRollup {
                    kam_id: kam.id,
                    name: kam.name,
                    email: kam.email,
                    phone: kam.phone,
                    total_leads,
                    converted_leads,
                }
            })
            .collect())
    }
}
