//! Vault creation wizard routes.
//!
//! ERROR HANDLING
//! ==============
//! Validation failures come back as 422 with `{ "errors": { field: message } }`.
//! Submission failures past validation are logged by the draft service and
//! returned to the client as a generic `Failed to create vault.` message.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chain::Address;
use crate::services::deploy::DeployError;
use crate::services::draft::{self, DraftError, DraftView, SubmittedVault};
use crate::services::vault::VaultError;
use crate::state::AppState;
use crate::wizard::{NextOutcome, PrevOutcome, VaultFormPatch};

pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to create vault.";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDraftBody {
    pub creator_address: String,
    pub space_id: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectSpaceBody {
    pub space_id: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepOutcome {
    Moved,
    AtLastStep,
    ExitBack,
}

#[derive(Serialize)]
pub struct StepResponse {
    pub outcome: StepOutcome,
    pub draft: DraftView,
}

/// `POST /api/vault/drafts` — start a draft.
pub async fn create_draft(
    State(state): State<AppState>,
    Json(body): Json<CreateDraftBody>,
) -> Result<(StatusCode, Json<DraftView>), Response> {
    let creator: Address = body
        .creator_address
        .trim()
        .parse()
        .map_err(|_| StatusCode::BAD_REQUEST.into_response())?;
    let view = draft::create_draft(&state, creator, body.space_id)
        .await
        .map_err(draft_error_response)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /api/vault/drafts/:id`
pub async fn get_draft(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<DraftView>, Response> {
    let view = draft::get_draft(&state, id).await.map_err(draft_error_response)?;
    Ok(Json(view))
}

/// `PATCH /api/vault/drafts/:id` — merge form values.
pub async fn update_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<VaultFormPatch>,
) -> Result<Json<DraftView>, Response> {
    let view = draft::update_values(&state, id, patch)
        .await
        .map_err(draft_error_response)?;
    Ok(Json(view))
}

/// `DELETE /api/vault/drafts/:id`
pub async fn discard_draft(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, Response> {
    draft::discard_draft(&state, id).await.map_err(draft_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/vault/drafts/:id/space`
pub async fn select_space(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SelectSpaceBody>,
) -> Result<Json<DraftView>, Response> {
    let view = draft::select_space(&state, id, body.space_id)
        .await
        .map_err(draft_error_response)?;
    Ok(Json(view))
}

/// `POST /api/vault/drafts/:id/next` — validate the current step and advance.
pub async fn next_step(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let (outcome, view) = match draft::next_step(&state, id).await {
        Ok(result) => result,
        Err(e) => return draft_error_response(e),
    };
    match outcome {
        NextOutcome::Moved { .. } => Json(StepResponse { outcome: StepOutcome::Moved, draft: view }).into_response(),
        NextOutcome::AtLastStep => Json(StepResponse { outcome: StepOutcome::AtLastStep, draft: view }).into_response(),
        NextOutcome::Invalid(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "errors": errors, "draft": view })),
        )
            .into_response(),
    }
}

/// `POST /api/vault/drafts/:id/prev` — go back a step.
pub async fn prev_step(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<StepResponse>, Response> {
    let (outcome, view) = draft::prev_step(&state, id).await.map_err(draft_error_response)?;
    let outcome = match outcome {
        PrevOutcome::Moved { .. } => StepOutcome::Moved,
        PrevOutcome::ExitBack => StepOutcome::ExitBack,
    };
    Ok(Json(StepResponse { outcome, draft: view }))
}

/// `POST /api/vault/drafts/:id/submit` — deploy and record the vault.
pub async fn submit_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubmittedVault>), Response> {
    let submitted = draft::submit_draft(&state, id).await.map_err(draft_error_response)?;
    Ok((StatusCode::CREATED, Json(submitted)))
}

pub(crate) fn draft_error_to_status(err: &DraftError) -> StatusCode {
    match err {
        DraftError::NotFound(_) | DraftError::SpaceNotFound(_) => StatusCode::NOT_FOUND,
        DraftError::SubmitInProgress(_) => StatusCode::CONFLICT,
        DraftError::SpaceNotSelected | DraftError::NotOnReviewStep => StatusCode::BAD_REQUEST,
        DraftError::Invalid(_)
        | DraftError::Deploy(
            DeployError::Amount(_) | DeployError::MissingTallyDate | DeployError::TallyDateBeforeEpoch(_),
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        DraftError::Deploy(DeployError::Chain(_)) => StatusCode::BAD_GATEWAY,
        DraftError::Vault(VaultError::DuplicateAddress(_)) => StatusCode::CONFLICT,
        DraftError::Vault(VaultError::NotFound(_) | VaultError::SpaceNotFound(_)) => StatusCode::NOT_FOUND,
        DraftError::Vault(VaultError::Database(_)) | DraftError::Database(_) | DraftError::Interrupted(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Status plus body: per-field errors, the generic submit failure, or nothing.
pub(crate) fn draft_error_response(err: DraftError) -> Response {
    let status = draft_error_to_status(&err);
    match err {
        DraftError::Invalid(errors) => (status, Json(serde_json::json!({ "errors": errors }))).into_response(),
        DraftError::SpaceNotSelected | DraftError::Deploy(_) | DraftError::Vault(_) | DraftError::Interrupted(_) => {
            (status, Json(serde_json::json!({ "message": SUBMIT_FAILED_MESSAGE }))).into_response()
        }
        _ => status.into_response(),
    }
}

#[cfg(test)]
#[path = "drafts_test.rs"]
mod tests;
