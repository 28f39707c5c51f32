//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::OrganizationNotFound
            | Self::OrderNotFound
            | Self::OrderItemNotFound
            | Self::ShareNotFound
            | Self::PaymentNotFound
            | Self::MenuItemNotFound
            | Self::TableNotFound
            | Self::QueueNotFound
            | Self::TicketNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::OrganizationSlugExists
            | Self::UsernameExists
            | Self::OrderAlreadyPaid
            | Self::OrderAlreadyCompleted
            | Self::OrderAlreadyCancelled
            | Self::TableNumberExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::AdminRequired
            | Self::SuperAdminRequired
            | Self::OrganizationInactive => StatusCode::FORBIDDEN,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::TransactionFailed => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/state errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(
            ErrorCode::OrderNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::QueueNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::TicketNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::PaymentNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(
            ErrorCode::OrderAlreadyPaid.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ErrorCode::OrganizationSlugExists.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_auth_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::SuperAdminRequired.http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_retryable_status() {
        assert_eq!(
            ErrorCode::TransactionFailed.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_state_errors_are_bad_request() {
        assert_eq!(
            ErrorCode::OrderNotPending.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ItemNotCancellable.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::QueueClosed.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorCode::ShareTotalMismatch.http_status(),
            StatusCode::BAD_REQUEST
        );
    }
}
