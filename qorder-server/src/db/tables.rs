//! Dining table persistence

use shared::error::ErrorCode;
use shared::models::{DiningTable, DiningTableCreate, TableStatus};
use shared::util::{qr_token, snowflake_id};
use sqlx::PgPool;

use crate::error::{ServiceError, ServiceResult, map_unique_violation};

const DEFAULT_CAPACITY: i32 = 4;

pub async fn create(
    pool: &PgPool,
    organization_id: i64,
    data: &DiningTableCreate,
) -> ServiceResult<DiningTable> {
    sqlx::query_as(
        "INSERT INTO dining_tables (id, organization_id, number, capacity, qr_token)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(snowflake_id())
    .bind(organization_id)
    .bind(data.number)
    .bind(data.capacity.unwrap_or(DEFAULT_CAPACITY))
    .bind(qr_token())
    .fetch_one(pool)
    .await
    .map_err(|e| map_unique_violation(e, ErrorCode::TableNumberExists))
}

pub async fn list(pool: &PgPool, organization_id: i64) -> Result<Vec<DiningTable>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM dining_tables WHERE organization_id = $1 ORDER BY number")
        .bind(organization_id)
        .fetch_all(pool)
        .await
}

pub async fn find(
    pool: &PgPool,
    organization_id: i64,
    table_id: i64,
) -> ServiceResult<DiningTable> {
    sqlx::query_as("SELECT * FROM dining_tables WHERE organization_id = $1 AND id = $2")
        .bind(organization_id)
        .bind(table_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::App(ErrorCode::TableNotFound.into()))
}

/// Resolve a table from its QR token — the customer-facing entry point,
/// so no organization scope is required.
pub async fn find_by_qr_token(pool: &PgPool, token: &str) -> ServiceResult<DiningTable> {
    sqlx::query_as("SELECT * FROM dining_tables WHERE qr_token = $1")
        .bind(token)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::App(ErrorCode::TableNotFound.into()))
}

/// Manual staff override of a table's status
pub async fn set_status(
    pool: &PgPool,
    organization_id: i64,
    table_id: i64,
    status: TableStatus,
) -> ServiceResult<DiningTable> {
    sqlx::query_as(
        "UPDATE dining_tables SET status = $1
         WHERE organization_id = $2 AND id = $3
         RETURNING *",
    )
    .bind(status)
    .bind(organization_id)
    .bind(table_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::App(ErrorCode::TableNotFound.into()))
}
