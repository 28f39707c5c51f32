//! Staff user persistence

use shared::error::ErrorCode;
use shared::models::{StaffRole, User};
use shared::util::snowflake_id;
use sqlx::PgPool;

use crate::error::{ServiceResult, map_unique_violation};

pub async fn find_by_username(
    pool: &PgPool,
    organization_id: i64,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE organization_id = $1 AND username = $2")
        .bind(organization_id)
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    organization_id: i64,
    username: &str,
    password_hash: &str,
    role: StaffRole,
) -> ServiceResult<User> {
    sqlx::query_as(
        "INSERT INTO users (id, organization_id, username, password_hash, role)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(snowflake_id())
    .bind(organization_id)
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await
    .map_err(|e| map_unique_violation(e, ErrorCode::UsernameExists))
}

pub async fn list(pool: &PgPool, organization_id: i64) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE organization_id = $1 ORDER BY username")
        .bind(organization_id)
        .fetch_all(pool)
        .await
}
