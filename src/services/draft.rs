//! Draft service — vault creation wizard sessions and final submission.
//!
//! DESIGN
//! ======
//! Drafts are kept in `AppState.drafts` and addressed by a random ID. Every
//! operation takes the write lock briefly, mutates the wizard, and returns a
//! serializable snapshot. Space existence is checked against Postgres before
//! the lock is taken.
//!
//! Every access refreshes `last_touched`. A background sweeper drops drafts
//! left idle longer than `AppState.draft_ttl`.
//!
//! ERROR HANDLING
//! ==============
//! Submission marks the draft `submitting` under the lock, then runs the
//! chain calls and the insert on a spawned task without holding it. The task
//! outlives the request, so the flag is reset even when the client goes
//! away mid-submit. A second submit while the flag is set is refused. On
//! failure the flag is cleared and the draft is kept so the creator can
//! retry; on success the draft is dropped.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::chain::{Address, TxHash};
use crate::services::deploy::{self, DeployError, DeployRequest};
use crate::services::space::{self, SpaceError};
use crate::services::vault::{self, FundingVault, NewVault, VaultError};
use crate::state::{AppState, DraftState};
use crate::wizard::schema::validate_all;
use crate::wizard::{Field, FieldErrors, NextOutcome, PrevOutcome, ReviewEntry, VaultFormPatch, VaultFormValues};

pub const SUCCESS_MESSAGE: &str = "Vault created successfully.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("draft not found: {0}")]
    NotFound(Uuid),
    #[error("submission already in progress for draft {0}")]
    SubmitInProgress(Uuid),
    #[error("Space not selected")]
    SpaceNotSelected,
    #[error("space not found: {0}")]
    SpaceNotFound(i32),
    #[error("draft is not on the review step")]
    NotOnReviewStep,
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),
    #[error("deployment failed: {0}")]
    Deploy(#[from] DeployError),
    #[error("recording vault failed: {0}")]
    Vault(#[from] VaultError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("submission task aborted: {0}")]
    Interrupted(String),
}

impl From<SpaceError> for DraftError {
    fn from(err: SpaceError) -> Self {
        match err {
            SpaceError::NotFound(id) => Self::SpaceNotFound(id),
            SpaceError::Database(e) => Self::Database(e),
        }
    }
}

/// Client-facing snapshot of a draft.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub id: Uuid,
    pub step: usize,
    pub step_count: usize,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: &'static [Field],
    pub values: VaultFormValues,
    pub space_id: Option<i32>,
    pub creator_address: Address,
    pub submitting: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Vec<ReviewEntry>>,
}

impl DraftView {
    fn of(id: Uuid, draft: &DraftState) -> Self {
        let wizard = &draft.wizard;
        let step = wizard.step();
        Self {
            id,
            step: wizard.current(),
            step_count: wizard.step_count(),
            title: step.title,
            description: step.description,
            fields: step.fields,
            values: wizard.values.clone(),
            space_id: draft.space_id,
            creator_address: draft.creator_address,
            submitting: draft.submitting,
            review: wizard.is_review_step().then(|| wizard.review()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedVault {
    pub hash: TxHash,
    pub message: &'static str,
    pub block_number: u64,
    pub vault: FundingVault,
}

// =============================================================================
// LIFECYCLE
// =============================================================================

async fn ensure_space(state: &AppState, space_id: i32) -> Result<(), DraftError> {
    space::get_space(&state.pool, space_id).await?;
    Ok(())
}

/// Start a new draft for `creator`, optionally already bound to a space.
///
/// # Errors
///
/// Returns `SpaceNotFound` if the given space does not exist.
pub async fn create_draft(state: &AppState, creator: Address, space_id: Option<i32>) -> Result<DraftView, DraftError> {
    if let Some(space_id) = space_id {
        ensure_space(state, space_id).await?;
    }

    let id = Uuid::new_v4();
    let draft = DraftState::new(creator, space_id);
    let view = DraftView::of(id, &draft);
    state.drafts.write().await.insert(id, draft);

    info!(draft_id = %id, %creator, ?space_id, "vault draft created");
    Ok(view)
}

/// # Errors
///
/// Returns `NotFound` for an unknown draft.
pub async fn get_draft(state: &AppState, id: Uuid) -> Result<DraftView, DraftError> {
    let mut drafts = state.drafts.write().await;
    let draft = drafts.get_mut(&id).ok_or(DraftError::NotFound(id))?;
    draft.touch();
    Ok(DraftView::of(id, draft))
}

/// Apply a partial update to the form values.
///
/// # Errors
///
/// Returns `NotFound` for an unknown draft, `SubmitInProgress` while submitting.
pub async fn update_values(state: &AppState, id: Uuid, patch: VaultFormPatch) -> Result<DraftView, DraftError> {
    let mut drafts = state.drafts.write().await;
    let draft = editable(&mut drafts, id)?;
    draft.wizard.values.apply(patch);
    Ok(DraftView::of(id, draft))
}

/// Bind the draft to a space.
///
/// # Errors
///
/// Returns `SpaceNotFound`, `NotFound`, or `SubmitInProgress`.
pub async fn select_space(state: &AppState, id: Uuid, space_id: i32) -> Result<DraftView, DraftError> {
    ensure_space(state, space_id).await?;

    let mut drafts = state.drafts.write().await;
    let draft = editable(&mut drafts, id)?;
    draft.space_id = Some(space_id);
    Ok(DraftView::of(id, draft))
}

/// Validate the current step and advance.
///
/// # Errors
///
/// Returns `NotFound` or `SubmitInProgress`. Validation failures are an
/// outcome, not an error.
pub async fn next_step(state: &AppState, id: Uuid) -> Result<(NextOutcome, DraftView), DraftError> {
    let rules = state.validation_rules();
    let mut drafts = state.drafts.write().await;
    let draft = editable(&mut drafts, id)?;
    let outcome = draft.wizard.next(&rules);
    Ok((outcome, DraftView::of(id, draft)))
}

/// Go back one step, or report that the wizard should be left.
///
/// # Errors
///
/// Returns `NotFound` or `SubmitInProgress`.
pub async fn prev_step(state: &AppState, id: Uuid) -> Result<(PrevOutcome, DraftView), DraftError> {
    let mut drafts = state.drafts.write().await;
    let draft = editable(&mut drafts, id)?;
    let outcome = draft.wizard.prev();
    Ok((outcome, DraftView::of(id, draft)))
}

/// Drop a draft without submitting it.
///
/// # Errors
///
/// Returns `NotFound` or `SubmitInProgress`.
pub async fn discard_draft(state: &AppState, id: Uuid) -> Result<(), DraftError> {
    let mut drafts = state.drafts.write().await;
    editable(&mut drafts, id)?;
    drafts.remove(&id);
    info!(draft_id = %id, "vault draft discarded");
    Ok(())
}

fn editable(drafts: &mut HashMap<Uuid, DraftState>, id: Uuid) -> Result<&mut DraftState, DraftError> {
    let draft = drafts.get_mut(&id).ok_or(DraftError::NotFound(id))?;
    if draft.submitting {
        return Err(DraftError::SubmitInProgress(id));
    }
    draft.touch();
    Ok(draft)
}

// =============================================================================
// EVICTION
// =============================================================================

/// Drop drafts idle longer than the configured TTL. Returns how many went.
pub async fn evict_idle_drafts(state: &AppState, now: OffsetDateTime) -> usize {
    let ttl = state.draft_ttl;
    let mut drafts = state.drafts.write().await;
    let before = drafts.len();
    drafts.retain(|_, draft| !draft.is_idle(now, ttl));
    before - drafts.len()
}

/// Spawn the idle-draft sweeper. Returns a handle for shutdown.
pub fn spawn_draft_sweeper(state: AppState, interval: Duration) -> JoinHandle<()> {
    let interval = interval.max(Duration::from_secs(1));
    info!(interval_secs = interval.as_secs(), ttl_secs = state.draft_ttl.as_secs(), "draft sweeper configured");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = evict_idle_drafts(&state, OffsetDateTime::now_utc()).await;
            if evicted > 0 {
                info!(evicted, "idle vault drafts evicted");
            }
        }
    })
}

// =============================================================================
// SUBMIT
// =============================================================================

struct Submission {
    request: DeployRequest,
    space_id: i32,
    values: VaultFormValues,
}

/// Deploy the vault on chain and record it.
///
/// # Errors
///
/// Returns `SubmitInProgress` for a concurrent submit, `SpaceNotSelected`,
/// `NotOnReviewStep`, `Invalid` with per-field messages, the failing
/// deployment/persistence step, or `Interrupted` if the task panicked.
pub async fn submit_draft(state: &AppState, id: Uuid) -> Result<SubmittedVault, DraftError> {
    let submission = begin_submit(state, id).await?;
    info!(draft_id = %id, space_id = submission.space_id, "vault submission started");

    let task_state = state.clone();
    let task = tokio::spawn(async move {
        let result = run_submission(&task_state, &submission).await;
        finish_submit(&task_state, id, &result).await;
        result
    });

    match task.await {
        Ok(result) => result,
        Err(e) => {
            error!(draft_id = %id, error = %e, "vault submission task aborted");
            release_draft(state, id).await;
            Err(DraftError::Interrupted(e.to_string()))
        }
    }
}

async fn finish_submit(state: &AppState, id: Uuid, result: &Result<SubmittedVault, DraftError>) {
    match result {
        Ok(submitted) => {
            state.drafts.write().await.remove(&id);
            info!(draft_id = %id, vault_id = submitted.vault.id, tx_hash = %submitted.hash, "vault created");
        }
        Err(e) => {
            release_draft(state, id).await;
            warn!(draft_id = %id, error = %e, "vault submission failed");
        }
    }
}

async fn release_draft(state: &AppState, id: Uuid) {
    if let Some(draft) = state.drafts.write().await.get_mut(&id) {
        draft.submitting = false;
        draft.touch();
    }
}

async fn begin_submit(state: &AppState, id: Uuid) -> Result<Submission, DraftError> {
    let rules = state.validation_rules();
    let mut drafts = state.drafts.write().await;
    let draft = editable(&mut drafts, id)?;

    let space_id = draft.space_id.ok_or(DraftError::SpaceNotSelected)?;
    if !draft.wizard.is_review_step() {
        return Err(DraftError::NotOnReviewStep);
    }
    let errors = validate_all(&draft.wizard.values, &rules);
    if !errors.is_empty() {
        return Err(DraftError::Invalid(errors));
    }
    let request = DeployRequest::from_values(draft.creator_address, &draft.wizard.values)?;

    draft.submitting = true;
    Ok(Submission { request, space_id, values: draft.wizard.values.clone() })
}

async fn run_submission(state: &AppState, submission: &Submission) -> Result<SubmittedVault, DraftError> {
    let deployed = deploy::deploy_vault(state.chain.as_ref(), &submission.request).await?;

    let new_vault = NewVault {
        name: submission.values.vault_name.clone(),
        description: submission.values.description.clone(),
        creator_address: submission.request.creator,
        vault_address: deployed.vault_address,
        funding_token_address: submission.request.funding_token,
        voting_token_address: submission.request.voting_token,
        tally_date: submission.request.tally_date,
        min_requestable_amount: submission.request.min_requestable_amount.clone(),
        max_requestable_amount: submission.request.max_requestable_amount.clone(),
        space_id: submission.space_id,
    };
    let vault = vault::create_vault(&state.pool, &new_vault).await?;

    Ok(SubmittedVault { hash: deployed.tx_hash, message: SUCCESS_MESSAGE, block_number: deployed.block_number, vault })
}

#[cfg(test)]
#[path = "draft_test.rs"]
mod tests;
