//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool, the chain client, and the in-memory map of
//! vault creation drafts. Drafts never touch the database; they live until
//! they are submitted successfully, discarded, or left idle past the TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::chain::{Address, VaultChain};
use crate::config::DEFAULT_DRAFT_TTL_SECS;
use crate::wizard::{ValidationRules, WizardState};

// =============================================================================
// DRAFT STATE
// =============================================================================

/// One in-progress vault creation form.
pub struct DraftState {
    pub wizard: WizardState,
    /// Space the vault will belong to. Required before submit.
    pub space_id: Option<i32>,
    /// Account that signs the deployment transaction.
    pub creator_address: Address,
    /// Set while the deployment chain runs; blocks a second submit.
    pub submitting: bool,
    /// Last create/read/edit; drives idle eviction.
    pub last_touched: OffsetDateTime,
}

impl DraftState {
    #[must_use]
    pub fn new(creator_address: Address, space_id: Option<i32>) -> Self {
        Self {
            wizard: WizardState::new(),
            space_id,
            creator_address,
            submitting: false,
            last_touched: OffsetDateTime::now_utc(),
        }
    }

    pub fn touch(&mut self) {
        self.last_touched = OffsetDateTime::now_utc();
    }

    /// Idle past `ttl` and not mid-submission.
    #[must_use]
    pub fn is_idle(&self, now: OffsetDateTime, ttl: Duration) -> bool {
        !self.submitting && now - self.last_touched > ttl
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub chain: Arc<dyn VaultChain>,
    pub drafts: Arc<RwLock<HashMap<Uuid, DraftState>>>,
    /// Development mode: past tally dates pass validation.
    pub allow_past_tally_date: bool,
    pub draft_ttl: Duration,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, chain: Arc<dyn VaultChain>, allow_past_tally_date: bool) -> Self {
        Self {
            pool,
            chain,
            drafts: Arc::new(RwLock::new(HashMap::new())),
            allow_past_tally_date,
            draft_ttl: Duration::from_secs(DEFAULT_DRAFT_TTL_SECS),
        }
    }

    #[must_use]
    pub fn with_draft_ttl(mut self, ttl: Duration) -> Self {
        self.draft_ttl = ttl;
        self
    }

    /// Validation context as of now.
    #[must_use]
    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules::at(OffsetDateTime::now_utc(), self.allow_past_tally_date)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
