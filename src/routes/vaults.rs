//! Vault routes — details view, metadata fetch, and direct metadata insert.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::error;

use crate::chain::Address;
use crate::services::proposal::{self, ProposalRow};
use crate::services::vault::{self, FundingVault, NewVault, VaultActions, VaultError};
use crate::state::AppState;
use crate::wizard::schema::validate_all;
use crate::wizard::{ValidationRules, VaultFormValues};

/// Where the details view sends visitors when the vault is unknown.
pub const MISSING_VAULT_REDIRECT: &str = "/dashboard";

#[derive(Serialize)]
pub struct VaultDetailsResponse {
    pub vault: FundingVault,
    pub proposals: Vec<ProposalRow>,
    pub actions: VaultActions,
}

/// `GET /vault/:id` — vault metadata, its proposals, and gated actions.
///
/// A non-numeric or unknown ID redirects to the dashboard.
pub async fn vault_details_page(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(vault_id) = id.parse::<i32>() else {
        return Redirect::temporary(MISSING_VAULT_REDIRECT).into_response();
    };

    let vault = match vault::get_vault(&state.pool, vault_id).await {
        Ok(vault) => vault,
        Err(VaultError::NotFound(_)) => return Redirect::temporary(MISSING_VAULT_REDIRECT).into_response(),
        Err(e) => {
            error!(error = %e, vault_id, "vault details: load failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let proposals = match proposal::list_proposals_for_vault(&state.pool, vault_id).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, vault_id, "vault details: proposal list failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let actions = VaultActions::at(vault.id, vault.tally_date, OffsetDateTime::now_utc());
    Json(VaultDetailsResponse { vault, proposals, actions }).into_response()
}

/// `GET /api/vault/:id` — fetch one vault.
pub async fn get_vault(
    State(state): State<AppState>,
    Path(vault_id): Path<i32>,
) -> Result<Json<FundingVault>, StatusCode> {
    let vault = vault::get_vault(&state.pool, vault_id)
        .await
        .map_err(vault_error_to_status)?;
    Ok(Json(vault))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVaultBody {
    pub vault_name: String,
    pub description: String,
    pub creator_address: String,
    pub vault_address: String,
    pub funding_token_address: String,
    pub voting_token_address: String,
    #[serde(with = "time::serde::rfc3339")]
    pub tally_date: OffsetDateTime,
    pub minimum_requestable_amount: String,
    pub maximum_requestable_amount: String,
    pub space_id: i32,
}

impl NewVaultBody {
    fn form_values(&self) -> VaultFormValues {
        VaultFormValues {
            vault_name: self.vault_name.clone(),
            description: self.description.clone(),
            funding_token_address: self.funding_token_address.clone(),
            voting_token_address: self.voting_token_address.clone(),
            min_requestable_amount: self.minimum_requestable_amount.clone(),
            max_requestable_amount: self.maximum_requestable_amount.clone(),
            tally_date: Some(self.tally_date),
        }
    }
}

/// `POST /api/vault/new` — record metadata for a vault deployed elsewhere.
///
/// The vault already exists on chain, so a past tally date is accepted.
pub async fn create_vault_rest(State(state): State<AppState>, Json(body): Json<NewVaultBody>) -> Response {
    let rules = ValidationRules::at(OffsetDateTime::now_utc(), true);
    let errors = validate_all(&body.form_values(), &rules);
    if !errors.is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(serde_json::json!({ "errors": errors }))).into_response();
    }

    let Some(new_vault) = to_new_vault(&body) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    match vault::create_vault(&state.pool, &new_vault).await {
        Ok(vault) => (StatusCode::CREATED, Json(vault)).into_response(),
        Err(e) => vault_error_to_status(e).into_response(),
    }
}

fn to_new_vault(body: &NewVaultBody) -> Option<NewVault> {
    let parse = |s: &str| s.trim().parse::<Address>().ok();
    Some(NewVault {
        name: body.vault_name.clone(),
        description: body.description.clone(),
        creator_address: parse(&body.creator_address)?,
        vault_address: parse(&body.vault_address)?,
        funding_token_address: parse(&body.funding_token_address)?,
        voting_token_address: parse(&body.voting_token_address)?,
        tally_date: body.tally_date,
        min_requestable_amount: body.minimum_requestable_amount.trim().to_owned(),
        max_requestable_amount: body.maximum_requestable_amount.trim().to_owned(),
        space_id: body.space_id,
    })
}

pub(crate) fn vault_error_to_status(err: VaultError) -> StatusCode {
    match err {
        VaultError::NotFound(_) | VaultError::SpaceNotFound(_) => StatusCode::NOT_FOUND,
        VaultError::DuplicateAddress(_) => StatusCode::CONFLICT,
        VaultError::Database(e) => {
            error!(error = %e, "vault store: database failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
#[path = "vaults_test.rs"]
mod tests;
