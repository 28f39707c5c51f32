//! Organization persistence
//!
//! Organization creation also provisions the initial admin user inside the
//! same transaction — an org must never exist without an admin.

use shared::error::ErrorCode;
use shared::models::{Organization, OrganizationCreate, StaffRole, User};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use crate::error::{ServiceError, ServiceResult, map_unique_violation};

/// Create an organization together with its first admin user.
///
/// `admin_password_hash` is already hashed by the caller; raw passwords
/// never reach this layer.
pub async fn create(
    pool: &PgPool,
    data: &OrganizationCreate,
    admin_password_hash: &str,
) -> ServiceResult<(Organization, User)> {
    let mut tx = pool.begin().await?;

    let org_id = snowflake_id();
    let now = now_millis();

    let org: Organization = sqlx::query_as(
        "INSERT INTO organizations (id, slug, name, org_type, display_name, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(org_id)
    .bind(&data.slug)
    .bind(&data.name)
    .bind(data.org_type)
    .bind(&data.display_name)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| map_unique_violation(e, ErrorCode::OrganizationSlugExists))?;

    let admin: User = sqlx::query_as(
        "INSERT INTO users (id, organization_id, username, password_hash, role)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(snowflake_id())
    .bind(org_id)
    .bind(&data.admin_username)
    .bind(admin_password_hash)
    .bind(StaffRole::Admin)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((org, admin))
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Organization>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM organizations WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Organization>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM organizations WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Organization>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM organizations ORDER BY created_at")
        .fetch_all(pool)
        .await
}

pub async fn set_active(pool: &PgPool, id: i64, is_active: bool) -> ServiceResult<Organization> {
    sqlx::query_as("UPDATE organizations SET is_active = $1 WHERE id = $2 RETURNING *")
        .bind(is_active)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::App(ErrorCode::OrganizationNotFound.into()))
}
