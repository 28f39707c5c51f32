//! Database access layer
//!
//! Multi-step write paths open their own transaction and commit before
//! returning, so callers can publish events knowing the state is durable.

pub mod menu_items;
pub mod orders;
pub mod organizations;
pub mod payments;
pub mod queues;
pub mod tables;
pub mod users;
