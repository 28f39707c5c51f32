//! Staff JWT authentication and password hashing

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::StaffRole;

use crate::state::AppState;

/// JWT claims for staff authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct StaffClaims {
    /// User ID
    pub sub: i64,
    /// Organization scope the token is bound to
    pub org: i64,
    /// Staff role at issue time
    pub role: StaffRole,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated staff identity extracted from JWT.
///
/// Every staff-scoped query must filter by `organization_id`; handlers
/// never accept an organization id from the request body.
#[derive(Debug, Clone)]
pub struct StaffIdentity {
    pub user_id: i64,
    pub organization_id: i64,
    pub role: StaffRole,
}

impl StaffIdentity {
    /// Guard for admin-only operations (table/menu/queue management)
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::new(ErrorCode::AdminRequired))
        }
    }

    /// Guard for platform-level operations (organization management)
    pub fn require_super_admin(&self) -> Result<(), AppError> {
        if self.role == StaffRole::SuperAdmin {
            Ok(())
        } else {
            Err(AppError::new(ErrorCode::SuperAdminRequired))
        }
    }
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT token for a staff user
pub fn create_token(
    user_id: i64,
    organization_id: i64,
    role: StaffRole,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = StaffClaims {
        sub: user_id,
        org: organization_id,
        role,
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Middleware that extracts and verifies the staff JWT from the
/// Authorization header, inserting a [`StaffIdentity`] extension.
pub async fn staff_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format").into_response())?;

    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<StaffClaims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        AppError::invalid_token("Invalid or expired token").into_response()
    })?;

    let identity = StaffIdentity {
        user_id: token_data.claims.sub,
        organization_id: token_data.claims.org,
        role: token_data.claims.role,
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2secret").unwrap();
        assert!(verify_password("hunter2secret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn token_round_trip() {
        let token = create_token(11, 22, StaffRole::Cashier, "test-secret").unwrap();
        let decoded = jsonwebtoken::decode::<StaffClaims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.sub, 11);
        assert_eq!(decoded.claims.org, 22);
        assert_eq!(decoded.claims.role, StaffRole::Cashier);
    }

    #[test]
    fn role_guards() {
        let waiter = StaffIdentity {
            user_id: 1,
            organization_id: 1,
            role: StaffRole::Waiter,
        };
        assert!(waiter.require_admin().is_err());
        assert!(waiter.require_super_admin().is_err());

        let admin = StaffIdentity {
            user_id: 2,
            organization_id: 1,
            role: StaffRole::Admin,
        };
        assert!(admin.require_admin().is_ok());
        assert!(admin.require_super_admin().is_err());

        let root = StaffIdentity {
            user_id: 3,
            organization_id: 1,
            role: StaffRole::SuperAdmin,
        };
        assert!(root.require_admin().is_ok());
        assert!(root.require_super_admin().is_ok());
    }
}
