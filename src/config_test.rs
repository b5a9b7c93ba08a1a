use super::*;

const FACTORY: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// # Safety
/// Tests must run with `--test-threads=1` to avoid env races.
unsafe fn clear_env() {
    unsafe {
        for key in [
            "DATABASE_URL",
            "FAIRFUND_ADDRESS",
            "PORT",
            "DB_MAX_CONNECTIONS",
            "RPC_URL",
            "RPC_REQUEST_TIMEOUT_SECS",
            "RPC_CONNECT_TIMEOUT_SECS",
            "RECEIPT_POLL_INTERVAL_MS",
            "RECEIPT_TIMEOUT_SECS",
            "ALLOW_PAST_TALLY_DATE",
            "DRAFT_TTL_SECS",
            "DRAFT_SWEEP_INTERVAL_SECS",
        ] {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn from_env_applies_defaults() {
    unsafe {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://localhost/fairfund");
        std::env::set_var("FAIRFUND_ADDRESS", FACTORY);
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.database_url, "postgres://localhost/fairfund");
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert_eq!(cfg.chain.rpc_url, DEFAULT_RPC_URL);
    assert_eq!(cfg.chain.factory_address.to_string(), FACTORY.to_ascii_lowercase());
    assert_eq!(cfg.chain.request_timeout_secs, DEFAULT_RPC_REQUEST_TIMEOUT_SECS);
    assert_eq!(cfg.chain.receipt_poll_interval_ms, DEFAULT_RECEIPT_POLL_INTERVAL_MS);
    assert!(!cfg.allow_past_tally_date);
    assert_eq!(cfg.draft_ttl_secs, DEFAULT_DRAFT_TTL_SECS);
    assert_eq!(cfg.draft_sweep_interval_secs, DEFAULT_DRAFT_SWEEP_INTERVAL_SECS);

    unsafe { clear_env() };
}

#[test]
fn from_env_parses_overrides() {
    unsafe {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://db/fairfund");
        std::env::set_var("FAIRFUND_ADDRESS", FACTORY);
        std::env::set_var("PORT", "8080");
        std::env::set_var("RPC_URL", "https://rpc.example.test/");
        std::env::set_var("RECEIPT_TIMEOUT_SECS", "15");
        std::env::set_var("ALLOW_PAST_TALLY_DATE", "yes");
        std::env::set_var("DRAFT_TTL_SECS", "900");
    }

    let cfg = AppConfig::from_env().unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.chain.rpc_url, "https://rpc.example.test");
    assert_eq!(cfg.chain.receipt_timeout_secs, 15);
    assert!(cfg.allow_past_tally_date);
    assert_eq!(cfg.draft_ttl_secs, 900);

    unsafe { clear_env() };
}

#[test]
fn from_env_requires_factory_address() {
    unsafe {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://db/fairfund");
    }

    let err = AppConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Missing("FAIRFUND_ADDRESS")));

    unsafe { clear_env() };
}

#[test]
fn from_env_rejects_malformed_values() {
    unsafe {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://db/fairfund");
        std::env::set_var("FAIRFUND_ADDRESS", "0x1234");
    }
    let err = AppConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("FAIRFUND_ADDRESS"));

    unsafe {
        std::env::set_var("FAIRFUND_ADDRESS", FACTORY);
        std::env::set_var("PORT", "not-a-port");
    }
    let err = AppConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));

    unsafe { clear_env() };
}
