//! Dining table endpoints

use axum::{Extension, Json, extract::Path, extract::State};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{DiningTable, DiningTableCreate, TableStatus};

use crate::auth::StaffIdentity;
use crate::db;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/tables
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
) -> ApiResult<Vec<DiningTable>> {
    let tables = db::tables::list(&state.pool, identity.organization_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error listing tables: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;
    Ok(Json(tables))
}

/// POST /api/tables
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Json(req): Json<DiningTableCreate>,
) -> ApiResult<DiningTable> {
    identity.require_admin()?;
    if req.number < 1 {
        return Err(AppError::validation("Table number must be positive"));
    }
    if req.capacity.is_some_and(|c| c < 1) {
        return Err(AppError::validation("Capacity must be positive"));
    }
    let table = db::tables::create(&state.pool, identity.organization_id, &req).await?;
    Ok(Json(table))
}

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: TableStatus,
}

/// PATCH /api/tables/{table_id}/status — manual staff override
pub async fn set_status(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(table_id): Path<i64>,
    Json(req): Json<SetStatusRequest>,
) -> ApiResult<DiningTable> {
    let table =
        db::tables::set_status(&state.pool, identity.organization_id, table_id, req.status).await?;
    Ok(Json(table))
}
