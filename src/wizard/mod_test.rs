use super::*;
use time::macros::datetime;

fn rules() -> ValidationRules {
    ValidationRules::at(datetime!(2026-10-18 12:00 UTC), false)
}

fn fill_step(wizard: &mut WizardState, step: usize) {
    let values = &mut wizard.values;
    match step {
        0 => {
            values.vault_name = "Builders Fund".into();
            values.description = "Funds tooling proposals".into();
        }
        1 => {
            values.funding_token_address = "0x1000000000000000000000000000000000000001".into();
            values.voting_token_address = "0x2000000000000000000000000000000000000002".into();
        }
        2 => {
            values.min_requestable_amount = "1".into();
            values.max_requestable_amount = "100".into();
            values.tally_date = Some(datetime!(2027-03-01 00:00 UTC));
        }
        _ => {}
    }
}

#[test]
fn new_wizard_starts_at_first_of_four_steps() {
    let wizard = WizardState::new();
    assert_eq!(wizard.current(), 0);
    assert_eq!(wizard.step_count(), 4);
    assert_eq!(wizard.step().fields, &[Field::VaultName, Field::Description]);
    assert!(!wizard.is_review_step());
}

#[test]
fn next_blocks_on_missing_required_fields() {
    let mut wizard = WizardState::new();
    wizard.values.vault_name = "Only a name".into();

    let NextOutcome::Invalid(errors) = wizard.next(&rules()) else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[&Field::Description], "Description is required.");
    assert_eq!(wizard.current(), 0);
}

#[test]
fn next_ignores_fields_of_later_steps() {
    let mut wizard = WizardState::new();
    fill_step(&mut wizard, 0);
    assert_eq!(wizard.next(&rules()), NextOutcome::Moved { step: 1 });
}

#[test]
fn walking_forward_reaches_review_and_stops() {
    let mut wizard = WizardState::new();
    for step in 0..3 {
        fill_step(&mut wizard, step);
        assert_eq!(wizard.next(&rules()), NextOutcome::Moved { step: step + 1 });
    }
    assert!(wizard.is_review_step());
    assert_eq!(wizard.next(&rules()), NextOutcome::AtLastStep);
    assert_eq!(wizard.current(), 3);
}

#[test]
fn non_positive_amount_blocks_distribution_step() {
    let mut wizard = WizardState::new();
    for step in 0..2 {
        fill_step(&mut wizard, step);
        wizard.next(&rules());
    }
    fill_step(&mut wizard, 2);
    wizard.values.max_requestable_amount = "0".into();

    let NextOutcome::Invalid(errors) = wizard.next(&rules()) else {
        panic!("expected validation failure");
    };
    assert_eq!(errors[&Field::MaxRequestableAmount], "Must be a positive number");
    assert_eq!(wizard.current(), 2);
}

#[test]
fn prev_moves_back_without_validation() {
    let mut wizard = WizardState::new();
    fill_step(&mut wizard, 0);
    wizard.next(&rules());
    wizard.values.vault_name.clear();

    assert_eq!(wizard.prev(), PrevOutcome::Moved { step: 0 });
    assert_eq!(wizard.current(), 0);
}

#[test]
fn prev_from_first_step_exits_without_moving() {
    let mut wizard = WizardState::new();
    assert_eq!(wizard.prev(), PrevOutcome::ExitBack);
    assert_eq!(wizard.current(), 0);
}

#[test]
fn step_index_stays_in_bounds_under_any_sequence() {
    let mut wizard = WizardState::new();
    for step in 0..3 {
        fill_step(&mut wizard, step);
    }
    for i in 0..40 {
        if i % 3 == 0 {
            wizard.prev();
        } else {
            wizard.next(&rules());
        }
        assert!(wizard.current() < wizard.step_count());
    }
}

#[test]
fn review_lists_every_field_with_label() {
    let mut wizard = WizardState::new();
    for step in 0..3 {
        fill_step(&mut wizard, step);
    }
    let review = wizard.review();
    assert_eq!(review.len(), Field::ALL.len());
    assert_eq!(review[0], ReviewEntry { label: "Vault Name".into(), value: "Builders Fund".into() });
    assert_eq!(review[6].label, "Tally Date");
    assert_eq!(review[6].value, "2027-03-01T00:00:00Z");
}
