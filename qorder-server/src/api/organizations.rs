//! Organization management endpoints (super-admin only)

use axum::{Extension, Json, extract::Path, extract::State};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Organization, OrganizationCreate};

use crate::auth::{StaffIdentity, hash_password};
use crate::db;
use crate::state::AppState;

use super::ApiResult;

/// POST /api/organizations — provision a tenant with its first admin
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Json(mut req): Json<OrganizationCreate>,
) -> ApiResult<Organization> {
    identity.require_super_admin()?;

    req.slug = req.slug.trim().to_lowercase();
    if req.slug.is_empty()
        || !req
            .slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(AppError::validation(
            "Slug must be lowercase letters, digits and dashes",
        ));
    }
    if req.name.trim().is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }
    if req.admin_username.trim().is_empty() {
        return Err(AppError::validation("Admin username must not be empty"));
    }
    if req.admin_password.len() < 8 {
        return Err(AppError::validation(
            "Admin password must be at least 8 characters",
        ));
    }

    let password_hash =
        hash_password(&req.admin_password).map_err(|_| AppError::new(ErrorCode::InternalError))?;

    let (org, _admin) = db::organizations::create(&state.pool, &req, &password_hash).await?;

    tracing::info!(org_id = org.id, slug = %org.slug, "Organization created");
    Ok(Json(org))
}

/// GET /api/organizations
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
) -> ApiResult<Vec<Organization>> {
    identity.require_super_admin()?;
    let orgs = db::organizations::list(&state.pool).await.map_err(|e| {
        tracing::error!("DB error listing organizations: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;
    Ok(Json(orgs))
}

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// PATCH /api/organizations/{org_id}/active
pub async fn set_active(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(org_id): Path<i64>,
    Json(req): Json<SetActiveRequest>,
) -> ApiResult<Organization> {
    identity.require_super_admin()?;
    let org = db::organizations::set_active(&state.pool, org_id, req.is_active).await?;
    Ok(Json(org))
}
