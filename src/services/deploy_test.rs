use super::*;
use crate::state::test_helpers::{self, MockChain, MockStep};
use time::macros::datetime;

fn request() -> DeployRequest {
    DeployRequest {
        creator: test_helpers::creator(),
        funding_token: test_helpers::FUNDING_TOKEN.parse().unwrap(),
        voting_token: test_helpers::VOTING_TOKEN.parse().unwrap(),
        min_requestable_amount: "1.5".into(),
        max_requestable_amount: "100".into(),
        tally_date: datetime!(2027-01-01 00:00 UTC),
    }
}

#[tokio::test]
async fn deploy_runs_every_step_in_order() {
    let chain = MockChain::new(6);
    let deployed = deploy_vault(&chain, &request()).await.unwrap();

    assert_eq!(
        *chain.calls.lock().unwrap(),
        vec![MockStep::Decimals, MockStep::Simulate, MockStep::Send, MockStep::Receipt]
    );
    assert_eq!(deployed.vault_address.to_string(), test_helpers::VAULT);
    assert_eq!(deployed.tx_hash, MockChain::tx_hash());
    assert_eq!(deployed.block_number, 17);
}

#[tokio::test]
async fn deploy_scales_amounts_by_token_decimals() {
    let chain = MockChain::new(6);
    deploy_vault(&chain, &request()).await.unwrap();

    let call = chain.last_call.lock().unwrap().clone().unwrap();
    assert_eq!(call.min_requestable_amount, 1_500_000);
    assert_eq!(call.max_requestable_amount, 100_000_000);
    assert_eq!(call.tally_date, 1_798_761_600);
    assert_eq!(call.funding_token.to_string(), test_helpers::FUNDING_TOKEN);
    assert_eq!(call.voting_token.to_string(), test_helpers::VOTING_TOKEN);
}

#[tokio::test]
async fn deploy_stops_at_first_failing_step() {
    let chain = MockChain::failing_at(18, MockStep::Simulate);
    let err = deploy_vault(&chain, &request()).await.unwrap_err();

    assert!(matches!(err, DeployError::Chain(ChainError::Reverted(_))));
    assert_eq!(*chain.calls.lock().unwrap(), vec![MockStep::Decimals, MockStep::Simulate]);
}

#[tokio::test]
async fn deploy_receipt_failure_is_reported() {
    let chain = MockChain::failing_at(18, MockStep::Receipt);
    let err = deploy_vault(&chain, &request()).await.unwrap_err();
    assert!(matches!(err, DeployError::Chain(_)));
    assert_eq!(chain.calls.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn deploy_rejects_unscalable_amount_before_simulating() {
    let chain = MockChain::new(18);
    let mut req = request();
    req.max_requestable_amount = "9".repeat(30);

    let err = deploy_vault(&chain, &req).await.unwrap_err();
    assert!(matches!(err, DeployError::Amount(UnitsError::Overflow(_))));
    assert_eq!(*chain.calls.lock().unwrap(), vec![MockStep::Decimals]);
}

#[test]
fn request_from_values_parses_addresses_and_requires_date() {
    let draft = test_helpers::review_ready_draft(Some(1));
    let req = DeployRequest::from_values(test_helpers::creator(), &draft.wizard.values).unwrap();
    assert_eq!(req.funding_token.to_string(), test_helpers::FUNDING_TOKEN);
    assert_eq!(req.min_requestable_amount, "1.5");

    let mut values = draft.wizard.values.clone();
    values.tally_date = None;
    assert!(matches!(
        DeployRequest::from_values(test_helpers::creator(), &values),
        Err(DeployError::MissingTallyDate)
    ));

    values.funding_token_address = "nope".into();
    assert!(matches!(
        DeployRequest::from_values(test_helpers::creator(), &values),
        Err(DeployError::Chain(ChainError::InvalidAddress(_)))
    ));
}
