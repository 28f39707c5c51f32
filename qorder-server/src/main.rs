//! qorder-server — multi-tenant restaurant and queue management backend
//!
//! Long-running service that:
//! - Runs the order lifecycle (submit, confirm, kitchen item tracking)
//! - Settles bills, including atomic split-bill payments
//! - Issues and calls queue tickets with live wait estimates
//! - Fans out real-time events per organization over WebSocket

mod api;
mod auth;
mod config;
mod db;
mod error;
mod live;
mod state;

use config::Config;
use state::AppState;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qorder_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting qorder-server (env: {})", config.environment);

    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("qorder-server listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
