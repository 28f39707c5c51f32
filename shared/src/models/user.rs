//! Staff user model

use serde::{Deserialize, Serialize};

/// Staff role, scoping which dashboards and operations a user may access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "staff_role", rename_all = "snake_case"))]
pub enum StaffRole {
    Waiter,
    Kitchen,
    Cashier,
    Admin,
    SuperAdmin,
}

impl StaffRole {
    /// Admin-level roles may manage tables, menu and queue settings
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }
}

/// Staff user entity. `password_hash` never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub organization_id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: StaffRole,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_roles() {
        assert!(StaffRole::Admin.is_admin());
        assert!(StaffRole::SuperAdmin.is_admin());
        assert!(!StaffRole::Waiter.is_admin());
        assert!(!StaffRole::Kitchen.is_admin());
        assert!(!StaffRole::Cashier.is_admin());
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&StaffRole::SuperAdmin).unwrap(),
            "\"super_admin\""
        );
    }
}
