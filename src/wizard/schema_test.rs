use super::*;
use time::macros::datetime;

const TOKEN_A: &str = "0x1000000000000000000000000000000000000001";
const TOKEN_B: &str = "0x2000000000000000000000000000000000000002";

fn rules() -> ValidationRules {
    ValidationRules::at(datetime!(2026-10-18 12:00 UTC), false)
}

fn complete_values() -> VaultFormValues {
    VaultFormValues {
        vault_name: "Grants Round 1".into(),
        description: "Quarterly community grants".into(),
        funding_token_address: TOKEN_A.into(),
        voting_token_address: TOKEN_B.into(),
        min_requestable_amount: "10".into(),
        max_requestable_amount: "2500.5".into(),
        tally_date: Some(datetime!(2026-12-01 00:00 UTC)),
    }
}

#[test]
fn complete_form_has_no_errors() {
    assert!(validate_all(&complete_values(), &rules()).is_empty());
}

#[test]
fn empty_form_reports_every_required_message() {
    let errors = validate_all(&VaultFormValues::default(), &rules());
    assert_eq!(errors.len(), Field::ALL.len());
    assert_eq!(errors[&Field::VaultName], "Vault Name is required.");
    assert_eq!(errors[&Field::Description], "Description is required.");
    assert_eq!(errors[&Field::FundingTokenAddress], "Funding Token Address is required.");
    assert_eq!(errors[&Field::VotingTokenAddress], "Voting Token Address is required.");
    assert_eq!(errors[&Field::MinRequestableAmount], "Minimum Requestable Amount is required.");
    assert_eq!(errors[&Field::MaxRequestableAmount], "Maximum Requestable Amount is required.");
    assert_eq!(errors[&Field::TallyDate], "Tally Date is required.");
}

#[test]
fn amounts_must_be_positive_numbers() {
    let mut values = complete_values();
    for bad in ["0", "-3", "abc", "0.000"] {
        values.min_requestable_amount = bad.into();
        assert_eq!(
            validate_field(Field::MinRequestableAmount, &values, &rules()).as_deref(),
            Some("Must be a positive number"),
            "{bad:?}"
        );
    }
}

#[test]
fn token_addresses_must_parse() {
    let mut values = complete_values();
    values.voting_token_address = "vitalik.eth".into();
    assert_eq!(
        validate_field(Field::VotingTokenAddress, &values, &rules()).as_deref(),
        Some("Must be a valid address")
    );
}

#[test]
fn past_tally_date_rejected_unless_allowed() {
    let mut values = complete_values();
    values.tally_date = Some(datetime!(2026-01-01 00:00 UTC));

    assert_eq!(
        validate_field(Field::TallyDate, &values, &rules()).as_deref(),
        Some("Tally Date must be in the future.")
    );

    let dev = ValidationRules::at(datetime!(2026-10-18 12:00 UTC), true);
    assert!(validate_field(Field::TallyDate, &values, &dev).is_none());
}

#[test]
fn validate_fields_only_checks_requested_subset() {
    let mut values = complete_values();
    values.vault_name.clear();
    values.max_requestable_amount.clear();

    let errors = validate_fields(&[Field::VaultName, Field::Description], &values, &rules());
    assert_eq!(errors.len(), 1);
    assert!(errors.contains_key(&Field::VaultName));
}

#[test]
fn field_errors_serialize_with_camel_case_keys() {
    let mut errors = FieldErrors::new();
    errors.insert(Field::MinRequestableAmount, "Must be a positive number".into());
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json["minRequestableAmount"], "Must be a positive number");
}

#[test]
fn labels_split_camel_case() {
    assert_eq!(Field::VaultName.label(), "Vault Name");
    assert_eq!(Field::FundingTokenAddress.label(), "Funding Token Address");
    assert_eq!(Field::Description.label(), "Description");
}

#[test]
fn patch_updates_only_present_fields() {
    let mut values = complete_values();
    let patch: VaultFormPatch =
        serde_json::from_str(r#"{"vaultName":"Renamed","tallyDate":"2027-01-02T00:00:00Z"}"#).unwrap();
    values.apply(patch);

    assert_eq!(values.vault_name, "Renamed");
    assert_eq!(values.description, "Quarterly community grants");
    assert_eq!(values.tally_date, Some(datetime!(2027-01-02 00:00 UTC)));
}

#[test]
fn display_formats_tally_date_as_rfc3339() {
    let values = complete_values();
    assert_eq!(values.display(Field::TallyDate), "2026-12-01T00:00:00Z");
    assert_eq!(values.display(Field::MinRequestableAmount), "10");
    assert_eq!(VaultFormValues::default().display(Field::TallyDate), "");
}
