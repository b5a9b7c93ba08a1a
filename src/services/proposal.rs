//! Proposal listing for the vault details view.

use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRow {
    pub id: i32,
    pub description: String,
    pub proposer_address: String,
    pub recipient_address: String,
    pub requested_amount: String,
    pub funding_vault_id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// All proposals submitted to a vault, oldest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_proposals_for_vault(pool: &PgPool, vault_id: i32) -> Result<Vec<ProposalRow>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i32, String, String, String, String, i32, OffsetDateTime)>(
        "SELECT id, description, proposer_address, recipient_address, requested_amount, funding_vault_id, created_at
         FROM proposals
         WHERE funding_vault_id = $1
         ORDER BY created_at ASC, id ASC",
    )
    .bind(vault_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(id, description, proposer_address, recipient_address, requested_amount, funding_vault_id, created_at)| {
                ProposalRow {
                    id,
                    description,
                    proposer_address,
                    recipient_address,
                    requested_amount,
                    funding_vault_id,
                    created_at,
                }
            },
        )
        .collect())
}

#[cfg(test)]
#[path = "proposal_test.rs"]
mod tests;
