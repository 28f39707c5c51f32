//! Menu catalog persistence

use shared::error::ErrorCode;
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use shared::util::snowflake_id;
use sqlx::PgPool;

use crate::error::{ServiceError, ServiceResult};

const DEFAULT_PREP_MINUTES: i32 = 15;

pub async fn create(
    pool: &PgPool,
    organization_id: i64,
    data: &MenuItemCreate,
) -> Result<MenuItem, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO menu_items (id, organization_id, name, category, price, prep_minutes, image_url)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(snowflake_id())
    .bind(organization_id)
    .bind(&data.name)
    .bind(&data.category)
    .bind(data.price)
    .bind(data.prep_minutes.unwrap_or(DEFAULT_PREP_MINUTES))
    .bind(&data.image_url)
    .fetch_one(pool)
    .await
}

/// Partial update: absent fields keep their stored value
pub async fn update(
    pool: &PgPool,
    organization_id: i64,
    item_id: i64,
    data: &MenuItemUpdate,
) -> ServiceResult<MenuItem> {
    sqlx::query_as(
        "UPDATE menu_items SET
            name = COALESCE($1, name),
            category = COALESCE($2, category),
            price = COALESCE($3, price),
            is_available = COALESCE($4, is_available),
            prep_minutes = COALESCE($5, prep_minutes),
            image_url = COALESCE($6, image_url)
         WHERE organization_id = $7 AND id = $8
         RETURNING *",
    )
    .bind(&data.name)
    .bind(&data.category)
    .bind(data.price)
    .bind(data.is_available)
    .bind(data.prep_minutes)
    .bind(&data.image_url)
    .bind(organization_id)
    .bind(item_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::App(ErrorCode::MenuItemNotFound.into()))
}

pub async fn list(pool: &PgPool, organization_id: i64) -> Result<Vec<MenuItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM menu_items WHERE organization_id = $1 ORDER BY category, name")
        .bind(organization_id)
        .fetch_all(pool)
        .await
}

/// Customer-facing menu: available items only
pub async fn list_available(
    pool: &PgPool,
    organization_id: i64,
) -> Result<Vec<MenuItem>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM menu_items
         WHERE organization_id = $1 AND is_available
         ORDER BY category, name",
    )
    .bind(organization_id)
    .fetch_all(pool)
    .await
}

/// Delete a menu item. Items referenced by past orders cannot be removed
/// (price snapshots keep the FK alive); mark them unavailable instead.
pub async fn delete(pool: &PgPool, organization_id: i64, item_id: i64) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM menu_items WHERE organization_id = $1 AND id = $2")
        .bind(organization_id)
        .bind(item_id)
        .execute(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return ServiceError::App(shared::error::AppError::with_message(
                    ErrorCode::InvalidRequest,
                    "Menu item is referenced by orders; mark it unavailable instead",
                ));
            }
            ServiceError::from(e)
        })?;
    if result.rows_affected() == 0 {
        return Err(ServiceError::App(ErrorCode::MenuItemNotFound.into()));
    }
    Ok(())
}
