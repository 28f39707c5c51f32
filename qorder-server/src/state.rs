//! Application state

use sqlx::PgPool;

use crate::config::Config;
use crate::live::EventHub;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT secret for staff authentication
    pub jwt_secret: String,
    /// Per-organization real-time event fan-out
    pub events: EventHub,
}

impl AppState {
    /// Create a new AppState: connect, run migrations, wire up the hub
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            events: EventHub::new(),
        })
    }
}
