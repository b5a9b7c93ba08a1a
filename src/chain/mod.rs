//! Chain — Ethereum JSON-RPC collaborator for vault deployment.
//!
//! DESIGN
//! ======
//! Services talk to the chain through the [`VaultChain`] trait so the
//! deployment call chain can be exercised against a mock. [`RpcChain`] is
//! the production implementation: raw JSON-RPC 2.0 over `reqwest`, with
//! the handful of ABI words the vault factory needs encoded by hand.
//!
//! Transactions are submitted with `eth_sendTransaction`; the configured
//! node (or signer proxy in front of it) owns the creator's key.

pub mod abi;
pub mod rpc;
pub mod types;
pub mod units;

pub use rpc::RpcChain;
pub use types::{Address, DeployVaultCall, TxHash, TxReceipt};

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
    #[error("RPC request failed: {0}")]
    Request(String),
    #[error("RPC endpoint returned status {status}")]
    HttpStatus { status: u16, body: String },
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("execution reverted: {0}")]
    Reverted(String),
    #[error("RPC response decode failed: {0}")]
    Decode(String),
    #[error("transaction {0} failed on chain")]
    TransactionFailed(TxHash),
    #[error("timed out waiting for receipt of {0}")]
    ReceiptTimeout(TxHash),
}

// =============================================================================
// TRAIT
// =============================================================================

/// The chain operations used by vault deployment. Enables mocking in tests.
#[async_trait::async_trait]
pub trait VaultChain: Send + Sync {
    /// Read `decimals()` from an ERC-20 token.
    async fn token_decimals(&self, token: Address) -> Result<u8, ChainError>;

    /// Dry-run `deployFundingVault` and return the address it would deploy.
    async fn simulate_deploy(&self, from: Address, call: &DeployVaultCall) -> Result<Address, ChainError>;

    /// Submit `deployFundingVault` and return the transaction hash.
    async fn send_deploy(&self, from: Address, call: &DeployVaultCall) -> Result<TxHash, ChainError>;

    /// Block until the transaction is mined. A reverted transaction is an error.
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt, ChainError>;
}
