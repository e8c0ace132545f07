//! Lead rows

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scylla::frame::response::result::Row;
use uuid::Uuid;

use kam_leads_core::{KamId, Lead, LeadId, LeadStatus, LeadStore, Result};

use crate::store::{from_millis, to_millis, ScyllaStore};
use crate::PersistenceError;

const LEAD_COLUMNS: &str = "lead_id, name, address, status, kam_id, call_frequency_days, \
                            next_call_date, last_call_date, created_at, updated_at";

impl ScyllaStore {
    async fn select_leads(
        &self,
        filter: &str,
        values: impl scylla::serialize::row::SerializeRow + Send,
    ) -> Result<Vec<Lead>> {
        let query = format!(
            "SELECT {} FROM {} {}",
            LEAD_COLUMNS,
            self.table("leads"),
            filter
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, values)
            .await
            .map_err(PersistenceError::from)?;

        let leads = result
            .rows
            .unwrap_or_default()
            .into_iter()
            .map(row_to_lead)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(leads)
    }
}

#[async_trait]
impl LeadStore for ScyllaStore {
    async fn get_lead(&self, id: LeadId) -> Result<Option<Lead>> {
        let mut leads = self
            .select_leads("WHERE lead_id = ?", (id.as_uuid(),))
            .await?;
        Ok(leads.pop())
    }

    async fn save_lead(&self, lead: &Lead) -> Result<Lead> {
        let query = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            self.table("leads"),
            LEAD_COLUMNS
        );

        let call_frequency_days = i32::try_from(lead.call_frequency_days).map_err(|_| {
            PersistenceError::InvalidData(format!(
                "call_frequency_days too large: {}",
                lead.call_frequency_days
            ))
        })?;

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    lead.id.as_uuid(),
                    &lead.name,
                    &lead.address,
                    lead.status.as_str(),
                    lead.kam_id.map(|id| id.as_uuid()),
                    call_frequency_days,
                    to_millis(lead.next_call_date),
                    lead.last_call_date.map(to_millis),
                    to_millis(lead.created_at),
                    to_millis(lead.updated_at),
                ),
            )
            .await
            .map_err(PersistenceError::from)?;

        tracing::debug!(lead_id = %lead.id, status = %lead.status, "Lead saved in ScyllaDB");
        Ok(lead.clone())
    }

    async fn list_leads(&self) -> Result<Vec<Lead>> {
        let mut leads = self.select_leads("", ()).await?;
        leads.sort_by_key(|lead| lead.created_at);
        Ok(leads)
    }

    async fn leads_for_kam(&self, kam_id: KamId) -> Result<Vec<Lead>> {
        let mut leads = self
            .select_leads("WHERE kam_id = ?", (kam_id.as_uuid(),))
            .await?;
        leads.sort_by_key(|lead| lead.created_at);
        Ok(leads)
    }

    async fn leads_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        statuses: &[LeadStatus],
    ) -> Result<Vec<Lead>> {
        // Range on a non-key column needs a filtered scan; status is checked here
        let mut leads = self
            .select_leads(
                "WHERE next_call_date >= ? AND next_call_date < ? ALLOW FILTERING",
                (to_millis(start), to_millis(end)),
            )
            .await?;
        leads.retain(|lead| statuses.contains(&lead.status));
        leads.sort_by_key(|lead| lead.next_call_date);
        Ok(leads)
    }
}

type LeadRow = (
    Uuid,
    Option<String>,
    Option<String>,
    String,
    Option<Uuid>,
    i32,
    i64,
    Option<i64>,
    i64,
    i64,
);

fn row_to_lead(row: Row) -> std::result::Result<Lead, PersistenceError> {
    let (
        lead_id,
        name,
        address,
        status,
        kam_id,
        call_frequency_days,
        next_call_date,
        last_call_date,
        created_at,
        updated_at,
    ): LeadRow = row
        .into_typed()
        .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

    let status = status
        .parse::<LeadStatus>()
        .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;
    let call_frequency_days = u32::try_from(call_frequency_days).map_err(|_| {
        PersistenceError::InvalidData(format!(
            "negative call_frequency_days: {}",
            call_frequency_days
        ))
    })?;

    Ok(Lead {
        id: LeadId::from_uuid(lead_id),
        name: name.unwrap_or_default(),
        address: address.unwrap_or_default(),
        status,
        kam_id: kam_id.map(KamId::from_uuid),
        call_frequency_days,
        next_call_date: from_millis("next_call_date", next_call_date)?,
        last_call_date: last_call_date
            .map(|millis| from_millis("last_call_date", millis))
            .transpose()?,
        created_at: from_millis("created_at", created_at)?,
        updated_at: from_millis("updated_at", updated_at)?,
    })
}
