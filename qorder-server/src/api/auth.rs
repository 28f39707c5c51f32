//! Staff authentication endpoints: login, staff management

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{StaffRole, User};

use crate::auth::{StaffIdentity, create_token, hash_password, verify_password};
use crate::db;
use crate::state::AppState;

use super::ApiResult;

/// POST /api/auth/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub organization_slug: String,
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    pub organization_id: i64,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let slug = req.organization_slug.trim().to_lowercase();
    let org = db::organizations::find_by_slug(&state.pool, &slug)
        .await
        .map_err(|e| {
            tracing::error!("DB error during login: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    if !org.is_active {
        return Err(AppError::new(ErrorCode::OrganizationInactive));
    }

    let user = db::users::find_by_username(&state.pool, org.id, req.username.trim())
        .await
        .map_err(|e| {
            tracing::error!("DB error during login: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }
    if !user.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let token = create_token(user.id, org.id, user.role, &state.jwt_secret).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(LoginResponse {
        token,
        user,
        organization_id: org.id,
    }))
}

/// POST /api/staff — admin creates a staff account in their organization
#[derive(Deserialize)]
pub struct CreateStaffRequest {
    pub username: String,
    pub password: String,
    pub role: StaffRole,
}

pub async fn create_staff(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Json(req): Json<CreateStaffRequest>,
) -> ApiResult<User> {
    identity.require_admin()?;

    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::validation("Username must not be empty"));
    }
    if req.password.len() < 8 {
        return Err(AppError::validation(
            "Password must be at least 8 characters",
        ));
    }
    // Only a super-admin may mint another super-admin
    if req.role == StaffRole::SuperAdmin {
        identity.require_super_admin()?;
    }

    let password_hash =
        hash_password(&req.password).map_err(|_| AppError::new(ErrorCode::InternalError))?;

    let user = db::users::create(
        &state.pool,
        identity.organization_id,
        username,
        &password_hash,
        req.role,
    )
    .await?;

    Ok(Json(user))
}

/// GET /api/staff
pub async fn list_staff(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
) -> ApiResult<Vec<User>> {
    identity.require_admin()?;
    let users = db::users::list(&state.pool, identity.organization_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error listing staff: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;
    Ok(Json(users))
}
