//! Vault service — funding vault metadata and action gating.
//!
//! DESIGN
//! ======
//! The relational store mirrors vaults that already exist on chain. Rows are
//! written once, after the deployment transaction is confirmed, and read by
//! the details view. Amounts are kept as the decimal strings the creator
//! entered; the on-chain values are those strings scaled by the funding
//! token's decimals.
//!
//! Which actions a vault offers depends only on its tally date: before it,
//! proposals, deposits and voter registration are open; after it, only
//! distribution is.

use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::info;

use crate::chain::Address;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("vault not found: {0}")]
    NotFound(i32),
    #[error("space not found: {0}")]
    SpaceNotFound(i32),
    #[error("vault already recorded: {0}")]
    DuplicateAddress(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row of the `funding_vaults` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingVault {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub creator_address: String,
    pub vault_address: String,
    pub funding_token_address: String,
    pub voting_token_address: String,
    #[serde(with = "time::serde::rfc3339")]
    pub tally_date: OffsetDateTime,
    pub min_requestable_amount: String,
    pub max_requestable_amount: String,
    pub space_id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewVault {
    pub name: String,
    pub description: String,
    pub creator_address: Address,
    pub vault_address: Address,
    pub funding_token_address: Address,
    pub voting_token_address: Address,
    pub tally_date: OffsetDateTime,
    pub min_requestable_amount: String,
    pub max_requestable_amount: String,
    pub space_id: i32,
}

type VaultTuple = (
    i32,
    String,
    String,
    String,
    String,
    String,
    String,
    OffsetDateTime,
    String,
    String,
    i32,
    OffsetDateTime,
);

const VAULT_COLUMNS: &str = "id, name, description, creator_address, vault_address, funding_token_address, \
     voting_token_address, tally_date, min_requestable_amount, max_requestable_amount, space_id, created_at";

fn from_tuple(row: VaultTuple) -> FundingVault {
    let (
        id,
        name,
        description,
        creator_address,
        vault_address,
        funding_token_address,
        voting_token_address,
        tally_date,
        min_requestable_amount,
        max_requestable_amount,
        space_id,
        created_at,
    ) = row;
    FundingVault {
        id,
        name,
        description,
        creator_address,
        vault_address,
        funding_token_address,
        voting_token_address,
        tally_date,
        min_requestable_amount,
        max_requestable_amount,
        space_id,
        created_at,
    }
}

// =============================================================================
// CRUD
// =============================================================================

/// Record a deployed vault.
///
/// # Errors
///
/// Returns `SpaceNotFound` if the space does not exist, `DuplicateAddress` if
/// the vault address is already recorded, or a database error.
pub async fn create_vault(pool: &PgPool, vault: &NewVault) -> Result<FundingVault, VaultError> {
    let space_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM spaces WHERE id = $1)")
        .bind(vault.space_id)
        .fetch_one(pool)
        .await?;
    if !space_exists {
        return Err(VaultError::SpaceNotFound(vault.space_id));
    }

    let sql = format!(
        "INSERT INTO funding_vaults (name, description, creator_address, vault_address, funding_token_address, \
             voting_token_address, tally_date, min_requestable_amount, max_requestable_amount, space_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING {VAULT_COLUMNS}"
    );
    let vault_address = vault.vault_address.to_string();
    let row = sqlx::query_as::<_, VaultTuple>(&sql)
        .bind(&vault.name)
        .bind(&vault.description)
        .bind(vault.creator_address.to_string())
        .bind(&vault_address)
        .bind(vault.funding_token_address.to_string())
        .bind(vault.voting_token_address.to_string())
        .bind(vault.tally_date)
        .bind(&vault.min_requestable_amount)
        .bind(&vault.max_requestable_amount)
        .bind(vault.space_id)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                VaultError::DuplicateAddress(vault_address.clone())
            }
            other => VaultError::Database(other),
        })?;

    let created = from_tuple(row);
    info!(vault_id = created.id, vault_address = %created.vault_address, space_id = created.space_id, "recorded funding vault");
    Ok(created)
}

/// Fetch one vault by ID.
///
/// # Errors
///
/// Returns `NotFound` if no such vault exists, or a database error.
pub async fn get_vault(pool: &PgPool, vault_id: i32) -> Result<FundingVault, VaultError> {
    let sql = format!("SELECT {VAULT_COLUMNS} FROM funding_vaults WHERE id = $1");
    let row = sqlx::query_as::<_, VaultTuple>(&sql)
        .bind(vault_id)
        .fetch_optional(pool)
        .await?
        .ok_or(VaultError::NotFound(vault_id))?;
    Ok(from_tuple(row))
}

/// List the vaults of a space, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_vaults_for_space(pool: &PgPool, space_id: i32) -> Result<Vec<FundingVault>, VaultError> {
    let sql = format!("SELECT {VAULT_COLUMNS} FROM funding_vaults WHERE space_id = $1 ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, VaultTuple>(&sql)
        .bind(space_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(from_tuple).collect())
}

// =============================================================================
// ACTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultAction {
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultActions {
    pub create_proposal: VaultAction,
    pub deposit: VaultAction,
    pub register_to_vote: VaultAction,
    pub distribute_funds: VaultAction,
}

impl VaultActions {
    /// Gate actions on the tally date. At exactly the tally instant the vault
    /// is still open.
    #[must_use]
    pub fn at(vault_id: i32, tally_date: OffsetDateTime, now: OffsetDateTime) -> Self {
        let tallied = tally_date < now;
        Self {
            create_proposal: VaultAction {
                label: "Create Proposal",
                href: Some(format!("/proposal/new?vaultId={vault_id}")),
                enabled: !tallied,
            },
            deposit: VaultAction {
                label: "Deposit Funding Tokens",
                href: Some(format!("/vault/deposit?vaultId={vault_id}")),
                enabled: !tallied,
            },
            register_to_vote: VaultAction {
                label: "Register to Vote",
                href: Some(format!("/vault/register?vaultId={vault_id}")),
                enabled: !tallied,
            },
            distribute_funds: VaultAction { label: "Distribute Funds", href: None, enabled: tallied },
        }
    }
}

#[cfg(test)]
#[path = "vault_test.rs"]
mod tests;
