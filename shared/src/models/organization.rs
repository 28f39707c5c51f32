//! Organization (tenant) model

use serde::{Deserialize, Serialize};

/// Which workflows the organization runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "org_type", rename_all = "snake_case"))]
pub enum OrgType {
    Restaurant,
    QueueBusiness,
    Both,
}

/// Organization entity — the tenant boundary. Every other entity is
/// exclusively owned by exactly one organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Organization {
    pub id: i64,
    /// URL-safe unique identifier used at login
    pub slug: String,
    pub name: String,
    pub org_type: OrgType,
    /// Deactivated organizations are hidden from staff login but keep history
    pub is_active: bool,
    /// Branding
    pub display_name: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: i64,
}

/// Create organization payload (super-admin only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationCreate {
    pub slug: String,
    pub name: String,
    pub org_type: OrgType,
    pub display_name: Option<String>,
    /// Initial admin account, created in the same transaction
    pub admin_username: String,
    pub admin_password: String,
}
