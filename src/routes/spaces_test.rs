use super::*;
use crate::state::test_helpers;

#[test]
fn space_error_to_status_maps_not_found() {
    assert_eq!(space_error_to_status(SpaceError::NotFound(4)), StatusCode::NOT_FOUND);
}

#[test]
fn space_error_to_status_maps_database() {
    let err = SpaceError::Database(sqlx::Error::PoolTimedOut);
    assert_eq!(space_error_to_status(err), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn create_space_rejects_blank_name() {
    let state = test_helpers::test_app_state();
    let body = CreateSpaceBody { name: "   ".into(), description: String::new() };
    let result = create_space(State(state), Json(body)).await;
    assert_eq!(result.unwrap_err(), StatusCode::BAD_REQUEST);
}

#[test]
fn create_space_body_defaults_description() {
    let body: CreateSpaceBody = serde_json::from_str(r#"{"name":"DAO"}"#).unwrap();
    assert_eq!(body.name, "DAO");
    assert!(body.description.is_empty());
}
