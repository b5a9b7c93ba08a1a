mod chain;
mod config;
mod db;
mod routes;
mod services;
mod state;
mod wizard;

use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    let chain = chain::RpcChain::new(&config.chain).expect("chain client init failed");
    tracing::info!(
        rpc_url = %config.chain.rpc_url,
        factory = %config.chain.factory_address,
        "chain client initialized"
    );
    if config.allow_past_tally_date {
        tracing::warn!("development mode: past tally dates are accepted");
    }

    let state = state::AppState::new(pool, Arc::new(chain), config.allow_past_tally_date)
        .with_draft_ttl(Duration::from_secs(config.draft_ttl_secs));

    // Spawn background idle-draft eviction.
    let _sweeper = services::draft::spawn_draft_sweeper(
        state.clone(),
        Duration::from_secs(config.draft_sweep_interval_secs),
    );

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "fairfund listening");
    axum::serve(listener, app).await.expect("server failed");
}
