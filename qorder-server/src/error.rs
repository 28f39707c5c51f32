//! Unified service-layer error type
//!
//! `ServiceError` bridges the gap between DB-layer errors (`sqlx::Error`, `BoxError`)
//! and the API-layer error (`AppError`). It enables `?` propagation without manual
//! `.map_err(|e| { tracing::error!(...); AppError::new(...) })` boilerplate.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error — only two variants, keeps things simple.
///
/// - `Db`: Database/infrastructure errors (auto-logged, mapped to InternalError)
/// - `App`: Business-rule errors (transparent pass-through to client)
#[derive(Debug)]
pub enum ServiceError {
    /// Database or infrastructure error (sqlx, serde, etc.)
    Db(BoxError),
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                if is_retryable(&db_err) {
                    tracing::warn!(error = %db_err, "Retryable transaction failure");
                    return AppError::new(ErrorCode::TransactionFailed);
                }
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

/// Whether a DB error is transient and the request can be retried verbatim:
/// serialization failure (40001) or deadlock (40P01). Both roll the
/// transaction back without side effects, so clients get `TransactionFailed`
/// instead of a generic internal error.
fn is_retryable(e: &BoxError) -> bool {
    if let Some(sqlx::Error::Database(db_err)) = e.downcast_ref::<sqlx::Error>()
        && let Some(code) = db_err.code()
    {
        return code == "40001" || code == "40P01";
    }
    false
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Map a unique-constraint violation onto a domain conflict error,
/// passing every other error through unchanged.
pub fn map_unique_violation(e: sqlx::Error, conflict: ErrorCode) -> ServiceError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return ServiceError::App(AppError::new(conflict));
    }
    ServiceError::from(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct StubDbError(&'static str);

    impl fmt::Display for StubDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "database error {}", self.0)
        }
    }

    impl StdError for StubDbError {}

    impl sqlx::error::DatabaseError for StubDbError {
        fn message(&self) -> &str {
            "database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }
    }

    fn app_error_for(sqlstate: &'static str) -> AppError {
        let e = sqlx::Error::Database(Box::new(StubDbError(sqlstate)));
        AppError::from(ServiceError::from(e))
    }

    #[test]
    fn serialization_failure_is_retryable() {
        assert_eq!(app_error_for("40001").code, ErrorCode::TransactionFailed);
    }

    #[test]
    fn deadlock_is_retryable() {
        assert_eq!(app_error_for("40P01").code, ErrorCode::TransactionFailed);
    }

    #[test]
    fn other_db_errors_stay_internal() {
        assert_eq!(app_error_for("23503").code, ErrorCode::InternalError);
        let e = sqlx::Error::RowNotFound;
        assert_eq!(
            AppError::from(ServiceError::from(e)).code,
            ErrorCode::InternalError
        );
    }

    #[test]
    fn app_errors_pass_through() {
        let e = ServiceError::App(AppError::new(ErrorCode::OrderNotFound));
        assert_eq!(AppError::from(e).code, ErrorCode::OrderNotFound);
    }
}
