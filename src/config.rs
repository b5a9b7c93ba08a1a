//! Service configuration parsed from environment variables.

use crate::chain::Address;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_RPC_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RPC_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_DRAFT_TTL_SECS: u64 = 3600;
pub const DEFAULT_DRAFT_SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub factory_address: Address,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub receipt_poll_interval_ms: u64,
    pub receipt_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub chain: ChainConfig,
    /// Development mode: accept tally dates in the past.
    pub allow_past_tally_date: bool,
    /// Drafts untouched for this long are discarded.
    pub draft_ttl_secs: u64,
    pub draft_sweep_interval_secs: u64,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    /// - `FAIRFUND_ADDRESS`: vault factory contract address
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `RPC_URL`: default `http://127.0.0.1:8545`
    /// - `RPC_REQUEST_TIMEOUT_SECS` / `RPC_CONNECT_TIMEOUT_SECS`: default 30 / 10
    /// - `RECEIPT_POLL_INTERVAL_MS` / `RECEIPT_TIMEOUT_SECS`: default 1000 / 120
    /// - `ALLOW_PAST_TALLY_DATE`: default false
    /// - `DRAFT_TTL_SECS` / `DRAFT_SWEEP_INTERVAL_SECS`: default 3600 / 60
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let raw_factory = std::env::var("FAIRFUND_ADDRESS").map_err(|_| ConfigError::Missing("FAIRFUND_ADDRESS"))?;
        let factory_address = raw_factory
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var: "FAIRFUND_ADDRESS", value: raw_factory.clone() })?;

        let chain = ChainConfig {
            rpc_url: std::env::var("RPC_URL")
                .unwrap_or_else(|_| DEFAULT_RPC_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            factory_address,
            request_timeout_secs: env_parse("RPC_REQUEST_TIMEOUT_SECS", DEFAULT_RPC_REQUEST_TIMEOUT_SECS)?,
            connect_timeout_secs: env_parse("RPC_CONNECT_TIMEOUT_SECS", DEFAULT_RPC_CONNECT_TIMEOUT_SECS)?,
            receipt_poll_interval_ms: env_parse("RECEIPT_POLL_INTERVAL_MS", DEFAULT_RECEIPT_POLL_INTERVAL_MS)?,
            receipt_timeout_secs: env_parse("RECEIPT_TIMEOUT_SECS", DEFAULT_RECEIPT_TIMEOUT_SECS)?,
        };

        Ok(Self {
            database_url,
            port: env_parse("PORT", DEFAULT_PORT)?,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            chain,
            allow_past_tally_date: env_bool("ALLOW_PAST_TALLY_DATE").unwrap_or(false),
            draft_ttl_secs: env_parse("DRAFT_TTL_SECS", DEFAULT_DRAFT_TTL_SECS)?,
            draft_sweep_interval_secs: env_parse("DRAFT_SWEEP_INTERVAL_SECS", DEFAULT_DRAFT_SWEEP_INTERVAL_SECS)?,
        })
    }
}

fn env_parse<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var: key, value: raw }),
        Err(_) => Ok(default),
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
