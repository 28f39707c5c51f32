//! Menu item model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu catalog entry
///
/// `price` is the current menu price; orders snapshot it into the order item
/// at creation time and never re-read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuItem {
    pub id: i64,
    pub organization_id: i64,
    pub name: String,
    pub category: String,
    /// Price in currency unit
    pub price: Decimal,
    pub is_available: bool,
    /// Preparation estimate (minutes), kitchen timer display only
    pub prep_minutes: i32,
    /// Opaque URL, upload handling is out of scope
    pub image_url: Option<String>,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub prep_minutes: Option<i32>,
    pub image_url: Option<String>,
}

/// Update menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub is_available: Option<bool>,
    pub prep_minutes: Option<i32>,
    pub image_url: Option<String>,
}
