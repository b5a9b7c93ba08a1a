use super::*;
#[cfg(feature = "live-db-tests")]
use crate::state::test_helpers::{self, integration_pool};
use time::macros::datetime;

#[test]
fn proposal_row_serializes_camel_case() {
    let row = ProposalRow {
        id: 1,
        description: "New tooling".into(),
        proposer_address: "0x00000000000000000000000000000000000000c0".into(),
        recipient_address: "0x00000000000000000000000000000000000000e0".into(),
        requested_amount: "2.5".into(),
        funding_vault_id: 7,
        created_at: datetime!(2026-01-01 00:00 UTC),
    };
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["fundingVaultId"], 7);
    assert_eq!(json["requestedAmount"], "2.5");
    assert_eq!(json["createdAt"], "2026-01-01T00:00:00Z");
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn proposals_list_oldest_first_for_one_vault() {
    let pool = integration_pool().await;
    let space = crate::services::space::create_space(&pool, "Proposal Space", "")
        .await
        .expect("create_space should succeed");
    let vault = test_helpers::seed_vault(&pool, space.id, 1, datetime!(2030-01-01 00:00 UTC)).await;
    let other = test_helpers::seed_vault(&pool, space.id, 2, datetime!(2030-01-01 00:00 UTC)).await;

    let later = test_helpers::insert_proposal(&pool, vault.id, "later", datetime!(2026-03-01 00:00 UTC)).await;
    let earlier = test_helpers::insert_proposal(&pool, vault.id, "earlier", datetime!(2026-01-01 00:00 UTC)).await;
    test_helpers::insert_proposal(&pool, other.id, "elsewhere", datetime!(2026-02-01 00:00 UTC)).await;

    let rows = list_proposals_for_vault(&pool, vault.id)
        .await
        .expect("list should succeed");
    let ids: Vec<i32> = rows.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![earlier, later]);
    assert!(rows.iter().all(|p| p.funding_vault_id == vault.id));
    assert_eq!(rows[0].requested_amount, "5");

    let empty = list_proposals_for_vault(&pool, vault.id + 100)
        .await
        .expect("list should succeed");
    assert!(empty.is_empty());
}
