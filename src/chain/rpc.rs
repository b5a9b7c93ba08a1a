//! JSON-RPC 2.0 client for an Ethereum node.
//!
//! Thin HTTP wrapper over `eth_call`, `eth_sendTransaction` and
//! `eth_getTransactionReceipt`. Pure parsing lives in free functions for
//! testability.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::{Value, json};
use tracing::debug;

use super::types::{Address, DeployVaultCall, TxHash, TxReceipt};
use super::{ChainError, VaultChain, abi};
use crate::config::ChainConfig;

// =============================================================================
// CLIENT
// =============================================================================

pub struct RpcChain {
    http: reqwest::Client,
    url: String,
    factory: Address,
    poll_interval: Duration,
    receipt_timeout: Duration,
    next_id: AtomicU64,
}

impl RpcChain {
    /// Build a client from typed chain config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ChainConfig) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ChainError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            url: config.rpc_url.clone(),
            factory: config.factory_address,
            poll_interval: Duration::from_millis(config.receipt_poll_interval_ms),
            receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
            next_id: AtomicU64::new(1),
        })
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest { jsonrpc: "2.0", id, method, params };

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ChainError::Request(e.to_string()))?;

        if status != 200 {
            return Err(ChainError::HttpStatus { status, body: text });
        }

        debug!(method, id, "rpc call completed");
        parse_rpc_response(&text)
    }

    async fn eth_call(&self, from: Option<Address>, to: Address, data: &[u8]) -> Result<Vec<u8>, ChainError> {
        let result = self
            .request("eth_call", json!([call_object(from, to, data), "latest"]))
            .await?;
        parse_hex_data(&result)
    }
}

#[async_trait::async_trait]
impl VaultChain for RpcChain {
    async fn token_decimals(&self, token: Address) -> Result<u8, ChainError> {
        let data = self.eth_call(None, token, &abi::decimals_calldata()).await?;
        let decimals = abi::decode_uint(&data)?;
        u8::try_from(decimals).map_err(|_| ChainError::Decode(format!("decimals out of range: {decimals}")))
    }

    async fn simulate_deploy(&self, from: Address, call: &DeployVaultCall) -> Result<Address, ChainError> {
        let data = self
            .eth_call(Some(from), self.factory, &abi::deploy_calldata(call))
            .await?;
        abi::decode_address(&data)
    }

    async fn send_deploy(&self, from: Address, call: &DeployVaultCall) -> Result<TxHash, ChainError> {
        let tx = call_object(Some(from), self.factory, &abi::deploy_calldata(call));
        let result = self.request("eth_sendTransaction", json!([tx])).await?;
        let raw = result
            .as_str()
            .ok_or_else(|| ChainError::Decode("transaction hash is not a string".into()))?;
        raw.parse()
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt, ChainError> {
        let deadline = tokio::time::Instant::now() + self.receipt_timeout;
        loop {
            let result = self
                .request("eth_getTransactionReceipt", json!([hash.to_string()]))
                .await?;
            if let Some(receipt) = parse_receipt(&result)? {
                if !receipt.success {
                    return Err(ChainError::TransactionFailed(hash));
                }
                return Ok(receipt);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ChainError::ReceiptTimeout(hash));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(serde::Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(serde::Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// JSON-RPC code used by geth and most nodes for reverted calls.
const EXECUTION_REVERTED: i64 = 3;

fn call_object(from: Option<Address>, to: Address, data: &[u8]) -> Value {
    let mut call = json!({
        "to": to.to_string(),
        "data": format!("0x{}", hex::encode(data)),
    });
    if let Some(from) = from {
        call["from"] = Value::String(from.to_string());
    }
    call
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_rpc_response(text: &str) -> Result<Value, ChainError> {
    let response: RpcResponse = serde_json::from_str(text).map_err(|e| ChainError::Decode(e.to_string()))?;

    if let Some(err) = response.error {
        if err.code == EXECUTION_REVERTED || err.message.contains("revert") {
            return Err(ChainError::Reverted(err.message));
        }
        return Err(ChainError::Rpc { code: err.code, message: err.message });
    }
    Ok(response.result.unwrap_or(Value::Null))
}

fn parse_hex_data(value: &Value) -> Result<Vec<u8>, ChainError> {
    let raw = value
        .as_str()
        .ok_or_else(|| ChainError::Decode(format!("expected hex string, got {value}")))?;
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(digits).map_err(|e| ChainError::Decode(e.to_string()))
}

fn parse_quantity(value: &Value) -> Result<u64, ChainError> {
    let raw = value
        .as_str()
        .ok_or_else(|| ChainError::Decode(format!("expected hex quantity, got {value}")))?;
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    u64::from_str_radix(digits, 16).map_err(|e| ChainError::Decode(format!("bad quantity {raw}: {e}")))
}

/// `null` means the transaction is still pending.
fn parse_receipt(value: &Value) -> Result<Option<TxReceipt>, ChainError> {
    if value.is_null() {
        return Ok(None);
    }
    let hash: TxHash = value
        .get("transactionHash")
        .and_then(Value::as_str)
        .ok_or_else(|| ChainError::Decode("receipt missing transactionHash".into()))?
        .parse()?;
    let block_number = parse_quantity(
        value
            .get("blockNumber")
            .ok_or_else(|| ChainError::Decode("receipt missing blockNumber".into()))?,
    )?;
    // Pre-Byzantium receipts carry no status; treat them as successful.
    let success = match value.get("status") {
        Some(status) if !status.is_null() => parse_quantity(status)? == 1,
        _ => true,
    };
    Ok(Some(TxReceipt { transaction_hash: hash, block_number, success }))
}

#[cfg(test)]
#[path = "rpc_test.rs"]
mod tests;
