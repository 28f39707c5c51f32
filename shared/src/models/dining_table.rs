//! Dining table model

use serde::{Deserialize, Serialize};

/// Physical table status
///
/// Transitions are driven by the order workflow (`free → occupied` on order
/// creation, `occupied → free` on settlement) or by manual staff override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "table_status", rename_all = "snake_case"))]
pub enum TableStatus {
    Free,
    Occupied,
    Reserved,
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub organization_id: i64,
    /// Display number, unique per organization
    pub number: i32,
    pub capacity: i32,
    pub status: TableStatus,
    /// Opaque token embedded in the table's printed QR code
    pub qr_token: String,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub number: i32,
    pub capacity: Option<i32>,
}
