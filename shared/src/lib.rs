//! Shared types for the qorder platform
//!
//! Domain models, state machines, event payloads and the unified error
//! system, used by the server and (via JSON) by the frontend clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.

pub mod error;
pub mod events;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
