//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router carries the vault details view, the wizard draft API, and
//! the space/vault metadata API. Every request gets a `TraceLayer` span.

pub mod drafts;
pub mod spaces;
pub mod vaults;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/vault/{id}", get(vaults::vault_details_page))
        .route("/api/vault/new", post(vaults::create_vault_rest))
        .route("/api/vault/drafts", post(drafts::create_draft))
        .route(
            "/api/vault/drafts/{id}",
            get(drafts::get_draft)
                .patch(drafts::update_draft)
                .delete(drafts::discard_draft),
        )
        .route("/api/vault/drafts/{id}/space", put(drafts::select_space))
        .route("/api/vault/drafts/{id}/next", post(drafts::next_step))
        .route("/api/vault/drafts/{id}/prev", post(drafts::prev_step))
        .route("/api/vault/drafts/{id}/submit", post(drafts::submit_draft))
        .route("/api/vault/{id}", get(vaults::get_vault))
        .route("/api/space", get(spaces::list_spaces).post(spaces::create_space))
        .route("/api/space/{id}/vaults", get(spaces::list_space_vaults))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
