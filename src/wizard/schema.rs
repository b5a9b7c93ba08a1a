//! Vault form fields and their validation rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::chain::Address;
use crate::chain::units::is_positive_amount;

// =============================================================================
// FIELDS
// =============================================================================

/// A field of the vault creation form. Ordering follows the form layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    VaultName,
    Description,
    FundingTokenAddress,
    VotingTokenAddress,
    MinRequestableAmount,
    MaxRequestableAmount,
    TallyDate,
}

impl Field {
    pub const ALL: [Self; 7] = [
        Self::VaultName,
        Self::Description,
        Self::FundingTokenAddress,
        Self::VotingTokenAddress,
        Self::MinRequestableAmount,
        Self::MaxRequestableAmount,
        Self::TallyDate,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VaultName => "vaultName",
            Self::Description => "description",
            Self::FundingTokenAddress => "fundingTokenAddress",
            Self::VotingTokenAddress => "votingTokenAddress",
            Self::MinRequestableAmount => "minRequestableAmount",
            Self::MaxRequestableAmount => "maxRequestableAmount",
            Self::TallyDate => "tallyDate",
        }
    }

    /// Human label: the camelCase name split into capitalized words.
    #[must_use]
    pub fn label(self) -> String {
        let mut label = String::new();
        for (i, ch) in self.as_str().chars().enumerate() {
            if i == 0 {
                label.push(ch.to_ascii_uppercase());
            } else if ch.is_ascii_uppercase() {
                label.push(' ');
                label.push(ch);
            } else {
                label.push(ch);
            }
        }
        label
    }

    fn required_message(self) -> &'static str {
        match self {
            Self::VaultName => "Vault Name is required.",
            Self::Description => "Description is required.",
            Self::FundingTokenAddress => "Funding Token Address is required.",
            Self::VotingTokenAddress => "Voting Token Address is required.",
            Self::MinRequestableAmount => "Minimum Requestable Amount is required.",
            Self::MaxRequestableAmount => "Maximum Requestable Amount is required.",
            Self::TallyDate => "Tally Date is required.",
        }
    }
}

// =============================================================================
// VALUES
// =============================================================================

/// Draft values as entered. Text fields start empty; the date starts unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultFormValues {
    pub vault_name: String,
    pub description: String,
    pub funding_token_address: String,
    pub voting_token_address: String,
    pub min_requestable_amount: String,
    pub max_requestable_amount: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub tally_date: Option<OffsetDateTime>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultFormPatch {
    pub vault_name: Option<String>,
    pub description: Option<String>,
    pub funding_token_address: Option<String>,
    pub voting_token_address: Option<String>,
    pub min_requestable_amount: Option<String>,
    pub max_requestable_amount: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub tally_date: Option<OffsetDateTime>,
}

impl VaultFormValues {
    pub fn apply(&mut self, patch: VaultFormPatch) {
        let VaultFormPatch {
            vault_name,
            description,
            funding_token_address,
            voting_token_address,
            min_requestable_amount,
            max_requestable_amount,
            tally_date,
        } = patch;

        for (slot, value) in [
            (&mut self.vault_name, vault_name),
            (&mut self.description, description),
            (&mut self.funding_token_address, funding_token_address),
            (&mut self.voting_token_address, voting_token_address),
            (&mut self.min_requestable_amount, min_requestable_amount),
            (&mut self.max_requestable_amount, max_requestable_amount),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if tally_date.is_some() {
            self.tally_date = tally_date;
        }
    }

    fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::VaultName => Some(&self.vault_name),
            Field::Description => Some(&self.description),
            Field::FundingTokenAddress => Some(&self.funding_token_address),
            Field::VotingTokenAddress => Some(&self.voting_token_address),
            Field::MinRequestableAmount => Some(&self.min_requestable_amount),
            Field::MaxRequestableAmount => Some(&self.max_requestable_amount),
            Field::TallyDate => None,
        }
    }

    /// Display value for the review step.
    #[must_use]
    pub fn display(&self, field: Field) -> String {
        match field {
            Field::TallyDate => self
                .tally_date
                .and_then(|d| d.format(&time::format_description::well_known::Rfc3339).ok())
                .unwrap_or_default(),
            other => self.text(other).unwrap_or_default().to_owned(),
        }
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Field name → first failing rule's message.
pub type FieldErrors = BTreeMap<Field, String>;

/// Context the rules depend on.
#[derive(Debug, Clone, Copy)]
pub struct ValidationRules {
    pub now: OffsetDateTime,
    pub allow_past_tally_date: bool,
}

impl ValidationRules {
    #[must_use]
    pub fn at(now: OffsetDateTime, allow_past_tally_date: bool) -> Self {
        Self { now, allow_past_tally_date }
    }
}

/// Validate one field. Returns the message of the first failing rule.
#[must_use]
pub fn validate_field(field: Field, values: &VaultFormValues, rules: &ValidationRules) -> Option<String> {
    if field == Field::TallyDate {
        let Some(tally_date) = values.tally_date else {
            return Some(field.required_message().to_owned());
        };
        if !rules.allow_past_tally_date && tally_date < rules.now {
            return Some("Tally Date must be in the future.".to_owned());
        }
        return None;
    }

    let value = values.text(field).unwrap_or_default();
    if value.is_empty() {
        return Some(field.required_message().to_owned());
    }

    match field {
        Field::FundingTokenAddress | Field::VotingTokenAddress if value.trim().parse::<Address>().is_err() => {
            Some("Must be a valid address".to_owned())
        }
        Field::MinRequestableAmount | Field::MaxRequestableAmount if !is_positive_amount(value) => {
            Some("Must be a positive number".to_owned())
        }
        _ => None,
    }
}

/// Validate a subset of fields, e.g. the fields of one wizard step.
#[must_use]
pub fn validate_fields(fields: &[Field], values: &VaultFormValues, rules: &ValidationRules) -> FieldErrors {
    fields
        .iter()
        .filter_map(|field| validate_field(*field, values, rules).map(|msg| (*field, msg)))
        .collect()
}

/// Validate the whole form.
#[must_use]
pub fn validate_all(values: &VaultFormValues, rules: &ValidationRules) -> FieldErrors {
    validate_fields(&Field::ALL, values, rules)
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
