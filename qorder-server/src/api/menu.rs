//! Menu management endpoints

use axum::{Extension, Json, extract::Path, extract::State};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};

use crate::auth::StaffIdentity;
use crate::db;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/menu
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
) -> ApiResult<Vec<MenuItem>> {
    let items = db::menu_items::list(&state.pool, identity.organization_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error listing menu: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;
    Ok(Json(items))
}

/// POST /api/menu
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Json(req): Json<MenuItemCreate>,
) -> ApiResult<MenuItem> {
    identity.require_admin()?;
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }
    if req.price <= Decimal::ZERO {
        return Err(AppError::validation("Price must be positive"));
    }
    let item = db::menu_items::create(&state.pool, identity.organization_id, &req)
        .await
        .map_err(|e| {
            tracing::error!("DB error creating menu item: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;
    Ok(Json(item))
}

/// PATCH /api/menu/{item_id}
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(item_id): Path<i64>,
    Json(req): Json<MenuItemUpdate>,
) -> ApiResult<MenuItem> {
    identity.require_admin()?;
    if req.price.is_some_and(|p| p <= Decimal::ZERO) {
        return Err(AppError::validation("Price must be positive"));
    }
    let item =
        db::menu_items::update(&state.pool, identity.organization_id, item_id, &req).await?;
    Ok(Json(item))
}

/// DELETE /api/menu/{item_id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(item_id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    identity.require_admin()?;
    db::menu_items::delete(&state.pool, identity.organization_id, item_id).await?;
    Ok(Json(serde_json::json!({ "deleted": item_id })))
}
