use super::*;
#[cfg(feature = "live-db-tests")]
use crate::state::test_helpers::integration_pool;
use time::macros::datetime;

#[test]
fn space_row_serializes_camel_case_with_rfc3339_date() {
    let row = SpaceRow {
        id: 3,
        name: "DAO".into(),
        description: "grants".into(),
        created_at: datetime!(2026-10-18 09:30 UTC),
    };
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["createdAt"], "2026-10-18T09:30:00Z");
    assert_eq!(json["name"], "DAO");
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn space_create_get_and_list_round_trip() {
    let pool = integration_pool().await;

    let first = create_space(&pool, "First Space", "older")
        .await
        .expect("create_space should succeed");
    let second = create_space(&pool, "Second Space", "")
        .await
        .expect("create_space should succeed");

    let fetched = get_space(&pool, first.id)
        .await
        .expect("get_space should succeed");
    assert_eq!(fetched.id, first.id);
    assert_eq!(fetched.name, "First Space");
    assert_eq!(fetched.description, "older");
    assert_eq!(fetched.created_at, first.created_at);

    let listed = list_spaces(&pool).await.expect("list_spaces should succeed");
    let ids: Vec<i32> = listed.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let missing = get_space(&pool, second.id + 100).await;
    assert!(matches!(missing, Err(SpaceError::NotFound(_))));
}
