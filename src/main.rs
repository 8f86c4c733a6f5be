use std::sync::Arc;

use fanzone_api::{
    app,
    service::config::{ConfigService, ConfigServiceImpl},
    state::AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Arc::new(ConfigServiceImpl::new());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.values().log_filter))
        .init();

    let state = match AppState::new(config.clone()).await {
        Ok(state) => state,
        Err(err) => {
            tracing::error!(error = %err, "database setup failed");
            std::process::exit(1);
        }
    };

    match state.accounts().bootstrap_superuser(config.values()).await {
        Ok(Some(account)) => tracing::info!(account_id = %account.id, "superuser created"),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "superuser bootstrap failed"),
    }

    let bind_addr = format!("0.0.0.0:{}", config.port());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|_| panic!("failed to bind to {}", bind_addr));
    tracing::info!(%bind_addr, "listening");

    axum::serve(listener, app(state))
        .await
        .expect("server error");
}
