//! Space routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use tracing::error;

use crate::routes::vaults::vault_error_to_status;
use crate::services::space::{self, SpaceError, SpaceRow};
use crate::services::vault::{self, FundingVault};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateSpaceBody {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// `GET /api/space` — list spaces.
pub async fn list_spaces(State(state): State<AppState>) -> Result<Json<Vec<SpaceRow>>, StatusCode> {
    let rows = space::list_spaces(&state.pool)
        .await
        .map_err(space_error_to_status)?;
    Ok(Json(rows))
}

/// `POST /api/space` — create a space.
pub async fn create_space(
    State(state): State<AppState>,
    Json(body): Json<CreateSpaceBody>,
) -> Result<(StatusCode, Json<SpaceRow>), StatusCode> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let row = space::create_space(&state.pool, name, body.description.trim())
        .await
        .map_err(space_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /api/space/:id/vaults` — vaults belonging to a space.
pub async fn list_space_vaults(
    State(state): State<AppState>,
    Path(space_id): Path<i32>,
) -> Result<Json<Vec<FundingVault>>, StatusCode> {
    space::get_space(&state.pool, space_id)
        .await
        .map_err(space_error_to_status)?;
    let rows = vault::list_vaults_for_space(&state.pool, space_id)
        .await
        .map_err(vault_error_to_status)?;
    Ok(Json(rows))
}

pub(crate) fn space_error_to_status(err: SpaceError) -> StatusCode {
    match err {
        SpaceError::NotFound(_) => StatusCode::NOT_FOUND,
        SpaceError::Database(e) => {
            error!(error = %e, "space store: database failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
#[path = "spaces_test.rs"]
mod tests;
