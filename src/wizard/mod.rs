//! Vault creation wizard — steps, per-step validation, and the step cursor.
//!
//! DESIGN
//! ======
//! The wizard is a bounded cursor over a fixed list of steps. Advancing
//! validates only the current step's fields; going back never validates.
//! Going back from the first step leaves the wizard entirely (the caller
//! returns to space selection). The last step is the review step and has
//! no fields of its own.

pub mod schema;

use serde::Serialize;

pub use schema::{Field, FieldErrors, ValidationRules, VaultFormPatch, VaultFormValues};

// =============================================================================
// STEPS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub title: &'static str,
    pub description: &'static str,
    pub fields: &'static [Field],
}

/// The four steps of vault creation.
#[must_use]
pub fn default_steps() -> Vec<Step> {
    vec![
        Step {
            title: "Vault details",
            description: "Name the vault and describe what it funds.",
            fields: &[Field::VaultName, Field::Description],
        },
        Step {
            title: "Tokens",
            description: "Choose the funding token and the voting token.",
            fields: &[Field::FundingTokenAddress, Field::VotingTokenAddress],
        },
        Step {
            title: "Distribution",
            description: "Set requestable amounts and the tally date.",
            fields: &[Field::MinRequestableAmount, Field::MaxRequestableAmount, Field::TallyDate],
        },
        Step { title: "Review", description: "Review the vault before deploying it.", fields: &[] },
    ]
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    Moved { step: usize },
    /// Current step is valid but already the last one.
    AtLastStep,
    Invalid(FieldErrors),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrevOutcome {
    Moved { step: usize },
    /// Back from the first step: leave the wizard.
    ExitBack,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct WizardState {
    steps: Vec<Step>,
    current: usize,
    pub values: VaultFormValues,
}

impl WizardState {
    #[must_use]
    pub fn new() -> Self {
        Self { steps: default_steps(), current: 0, values: VaultFormValues::default() }
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn step(&self) -> &Step {
        &self.steps[self.current]
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_review_step(&self) -> bool {
        self.current == self.steps.len() - 1
    }

    /// Validate the current step and advance when it passes.
    pub fn next(&mut self, rules: &ValidationRules) -> NextOutcome {
        let errors = schema::validate_fields(self.step().fields, &self.values, rules);
        if !errors.is_empty() {
            return NextOutcome::Invalid(errors);
        }
        if self.current < self.steps.len() - 1 {
            self.current += 1;
            NextOutcome::Moved { step: self.current }
        } else {
            NextOutcome::AtLastStep
        }
    }

    pub fn prev(&mut self) -> PrevOutcome {
        if self.current > 0 {
            self.current -= 1;
            PrevOutcome::Moved { step: self.current }
        } else {
            PrevOutcome::ExitBack
        }
    }

    /// Every field with its label and display value, in form order.
    #[must_use]
    pub fn review(&self) -> Vec<ReviewEntry> {
        Field::ALL
            .iter()
            .map(|field| ReviewEntry { label: field.label(), value: self.values.display(*field) })
            .collect()
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
