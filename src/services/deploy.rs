//! Deploy service — the on-chain half of vault creation.
//!
//! DESIGN
//! ======
//! A fixed, strictly sequential chain of calls:
//!
//! 1. read the funding token's `decimals()`
//! 2. scale the requestable amounts to base units
//! 3. simulate `deployFundingVault` to learn the vault address
//! 4. submit the same call as a transaction
//! 5. wait for the receipt
//!
//! ERROR HANDLING
//! ==============
//! Any failing step aborts the chain. Nothing is retried and nothing is
//! undone: a transaction that was sent but whose receipt never arrived is
//! reported as a timeout and left for the operator.

use time::OffsetDateTime;
use tracing::info;

use crate::chain::units::{UnitsError, format_units, parse_units};
use crate::chain::{Address, ChainError, DeployVaultCall, TxHash, VaultChain};
use crate::wizard::VaultFormValues;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("chain call failed: {0}")]
    Chain(#[from] ChainError),
    #[error("invalid amount: {0}")]
    Amount(#[from] UnitsError),
    #[error("tally date is required")]
    MissingTallyDate,
    #[error("tally date precedes the unix epoch: {0}")]
    TallyDateBeforeEpoch(OffsetDateTime),
}

/// Everything the chain needs to deploy one vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    pub creator: Address,
    pub funding_token: Address,
    pub voting_token: Address,
    pub min_requestable_amount: String,
    pub max_requestable_amount: String,
    pub tally_date: OffsetDateTime,
}

impl DeployRequest {
    /// Build a request from validated form values.
    ///
    /// # Errors
    ///
    /// Returns an error if a token address does not parse or the tally date is unset.
    pub fn from_values(creator: Address, values: &VaultFormValues) -> Result<Self, DeployError> {
        Ok(Self {
            creator,
            funding_token: values.funding_token_address.trim().parse()?,
            voting_token: values.voting_token_address.trim().parse()?,
            min_requestable_amount: values.min_requestable_amount.trim().to_owned(),
            max_requestable_amount: values.max_requestable_amount.trim().to_owned(),
            tally_date: values.tally_date.ok_or(DeployError::MissingTallyDate)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedVault {
    pub vault_address: Address,
    pub tx_hash: TxHash,
    pub block_number: u64,
}

/// Run the deployment call chain.
///
/// # Errors
///
/// Returns the first failing step's error.
pub async fn deploy_vault(chain: &dyn VaultChain, request: &DeployRequest) -> Result<DeployedVault, DeployError> {
    let decimals = chain.token_decimals(request.funding_token).await?;
    let call = DeployVaultCall {
        funding_token: request.funding_token,
        voting_token: request.voting_token,
        min_requestable_amount: parse_units(&request.min_requestable_amount, decimals)?,
        max_requestable_amount: parse_units(&request.max_requestable_amount, decimals)?,
        tally_date: u64::try_from(request.tally_date.unix_timestamp())
            .map_err(|_| DeployError::TallyDateBeforeEpoch(request.tally_date))?,
    };

    let vault_address = chain.simulate_deploy(request.creator, &call).await?;
    info!(
        %vault_address,
        creator = %request.creator,
        decimals,
        min = %format_units(call.min_requestable_amount, decimals),
        max = %format_units(call.max_requestable_amount, decimals),
        "vault deployment simulated"
    );

    let tx_hash = chain.send_deploy(request.creator, &call).await?;
    info!(%tx_hash, %vault_address, "vault deployment submitted");

    let receipt = chain.wait_for_receipt(tx_hash).await?;
    info!(%tx_hash, block_number = receipt.block_number, "vault deployment confirmed");

    Ok(DeployedVault { vault_address, tx_hash, block_number: receipt.block_number })
}

#[cfg(test)]
#[path = "deploy_test.rs"]
mod tests;
