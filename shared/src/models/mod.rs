//! Data models
//!
//! Shared between the server and frontend clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are snowflake-style `i64`; timestamps are UTC milliseconds.

pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod organization;
pub mod payment;
pub mod queue;
pub mod user;

// Re-exports
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use organization::*;
pub use payment::*;
pub use queue::*;
pub use user::*;
