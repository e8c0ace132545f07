//! Interaction rows

use async_trait::async_trait;
use scylla::frame::response::result::Row;
use uuid::Uuid;

use kam_leads_core::{Interaction, InteractionId, InteractionStore, InteractionType, LeadId, Result};

use crate::store::{from_millis, to_millis, ScyllaStore};
use crate::PersistenceError;

const INTERACTION_COLUMNS: &str = "interaction_id, lead_id, interaction_type, occurred_at, notes";

#[async_trait]
impl InteractionStore for ScyllaStore {
    async fn insert_interaction(&self, interaction: &Interaction) -> Result<Interaction> {
        let query = format!(
            "INSERT INTO {} ({}) VALUES (?, ?, ?, ?, ?)",
            self.table("interactions"),
            INTERACTION_COLUMNS
        );

        self.client
            .session()
            .query_unpaged(
                query,
                (
                    interaction.id.as_uuid(),
                    interaction.lead_id.as_uuid(),
                    interaction.interaction_type.as_str(),
                    to_millis(interaction.occurred_at),
                    &interaction.notes,
                ),
            )
            .await
            .map_err(PersistenceError::from)?;

        tracing::debug!(
            interaction_id = %interaction.id,
            lead_id = %interaction.lead_id,
            "Interaction saved in ScyllaDB"
        );
        Ok(interaction.clone())
    }

    async fn get_interaction(&self, id: InteractionId) -> Result<Option<Interaction>> {
        let query = format!(
            "SELECT {} FROM {} WHERE interaction_id = ?",
            INTERACTION_COLUMNS,
            self.table("interactions")
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (id.as_uuid(),))
            .await
            .map_err(PersistenceError::from)?;

        match result.rows.and_then(|rows| rows.into_iter().next()) {
            Some(row) => Ok(Some(row_to_interaction(row)?)),
            None => Ok(None),
        }
    }

    async fn interactions_for_lead(&self, lead_id: LeadId) -> Result<Vec<Interaction>> {
        let query = format!(
            "SELECT {} FROM {} WHERE lead_id = ?",
            INTERACTION_COLUMNS,
            self.table("interactions")
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (lead_id.as_uuid(),))
            .await
            .map_err(PersistenceError::from)?;

        let mut interactions = result
            .rows
            .unwrap_or_default()
            .into_iter()
            .map(row_to_interaction)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        interactions.sort_by_key(|interaction| interaction.occurred_at);
        Ok(interactions)
    }
}

fn row_to_interaction(row: Row) -> std::result::Result<Interaction, PersistenceError> {
    let (interaction_id, lead_id, interaction_type, occurred_at, notes): (
        Uuid,
        Uuid,
        String,
        i64,
        Option<String>,
    ) = row
        .into_typed()
        .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

    Ok(Interaction {
        id: InteractionId::from_uuid(interaction_id),
        lead_id: LeadId::from_uuid(lead_id),
        interaction_type: interaction_type
            .parse::<InteractionType>()
            .map_err(|e| PersistenceError::InvalidData(e.to_string()))?,
        occurred_at: from_millis("occurred_at", occurred_at)?,
        notes,
    })
}
