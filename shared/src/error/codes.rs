//! Unified error codes for the qorder platform
//!
//! Error codes are shared between the server and frontend clients and are
//! organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Organization errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu errors
//! - 7xxx: Table errors
//! - 8xxx: Queue and ticket errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,
    /// Value out of range
    ValueOutOfRange = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,
    /// Super-admin role required
    SuperAdminRequired = 2003,

    // ==================== 3xxx: Organization ====================
    /// Organization not found
    OrganizationNotFound = 3001,
    /// Organization is deactivated
    OrganizationInactive = 3002,
    /// Organization slug already exists
    OrganizationSlugExists = 3003,
    /// Username already exists in organization
    UsernameExists = 3004,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order is not in pending state
    OrderNotPending = 4002,
    /// Order is not in confirmed state
    OrderNotConfirmed = 4003,
    /// Order has already been completed
    OrderAlreadyCompleted = 4004,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4005,
    /// Order item not found
    OrderItemNotFound = 4006,
    /// Order is empty (no valid items)
    OrderEmpty = 4007,
    /// Item already in preparation or delivered
    ItemNotCancellable = 4008,
    /// Illegal order item status transition
    ItemTransitionInvalid = 4009,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed
    PaymentFailed = 5001,
    /// Order has already been paid
    OrderAlreadyPaid = 5002,
    /// Bill share not found
    ShareNotFound = 5003,
    /// At least one bill share is required
    SharesRequired = 5004,
    /// Bill share customer name is required
    ShareNameRequired = 5005,
    /// Bill share amount must be positive
    ShareInvalidAmount = 5006,
    /// Bill share amounts do not sum to the order total
    ShareTotalMismatch = 5007,
    /// Payment amount does not match the order total
    PaymentAmountMismatch = 5008,
    /// No payment recorded for the order
    PaymentNotFound = 5009,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item is unavailable
    MenuItemUnavailable = 6002,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table number already exists
    TableNumberExists = 7002,

    // ==================== 8xxx: Queue / Ticket ====================
    /// Queue not found
    QueueNotFound = 8001,
    /// Queue is closed
    QueueClosed = 8002,
    /// Queue is paused
    QueuePaused = 8003,
    /// No waiting tickets in queue
    QueueEmpty = 8004,
    /// Ticket not found
    TicketNotFound = 8101,
    /// Illegal ticket status transition
    TicketTransitionInvalid = 8102,
    /// Ticket can no longer be cancelled
    TicketNotCancellable = 8103,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
    /// Transaction could not commit (safe to retry)
    TransactionFailed = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::SuperAdminRequired => "Super-admin role is required",

            // Organization
            ErrorCode::OrganizationNotFound => "Organization not found",
            ErrorCode::OrganizationInactive => "Organization is deactivated",
            ErrorCode::OrganizationSlugExists => "Organization slug already exists",
            ErrorCode::UsernameExists => "Username already exists",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderNotPending => "Order is not pending",
            ErrorCode::OrderNotConfirmed => "Order is not confirmed",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::ItemNotCancellable => "Item already in preparation or delivered",
            ErrorCode::ItemTransitionInvalid => "Illegal item status transition",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::OrderAlreadyPaid => "Order has already been paid",
            ErrorCode::ShareNotFound => "Bill share not found",
            ErrorCode::SharesRequired => "At least one bill share is required",
            ErrorCode::ShareNameRequired => "Bill share customer name is required",
            ErrorCode::ShareInvalidAmount => "Bill share amount must be positive",
            ErrorCode::ShareTotalMismatch => "Bill shares do not sum to the order total",
            ErrorCode::PaymentAmountMismatch => "Payment amount does not match the order total",
            ErrorCode::PaymentNotFound => "No payment recorded for the order",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemUnavailable => "Menu item is unavailable",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableNumberExists => "Table number already exists",

            // Queue / Ticket
            ErrorCode::QueueNotFound => "Queue not found",
            ErrorCode::QueueClosed => "Queue is closed",
            ErrorCode::QueuePaused => "Queue is paused",
            ErrorCode::QueueEmpty => "No waiting tickets",
            ErrorCode::TicketNotFound => "Ticket not found",
            ErrorCode::TicketTransitionInvalid => "Illegal ticket status transition",
            ErrorCode::TicketNotCancellable => "Ticket can no longer be cancelled",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::TransactionFailed => "Transaction failed, please retry",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::RequiredField),
            7 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),
            2003 => Ok(ErrorCode::SuperAdminRequired),

            // Organization
            3001 => Ok(ErrorCode::OrganizationNotFound),
            3002 => Ok(ErrorCode::OrganizationInactive),
            3003 => Ok(ErrorCode::OrganizationSlugExists),
            3004 => Ok(ErrorCode::UsernameExists),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderNotPending),
            4003 => Ok(ErrorCode::OrderNotConfirmed),
            4004 => Ok(ErrorCode::OrderAlreadyCompleted),
            4005 => Ok(ErrorCode::OrderAlreadyCancelled),
            4006 => Ok(ErrorCode::OrderItemNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::ItemNotCancellable),
            4009 => Ok(ErrorCode::ItemTransitionInvalid),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::OrderAlreadyPaid),
            5003 => Ok(ErrorCode::ShareNotFound),
            5004 => Ok(ErrorCode::SharesRequired),
            5005 => Ok(ErrorCode::ShareNameRequired),
            5006 => Ok(ErrorCode::ShareInvalidAmount),
            5007 => Ok(ErrorCode::ShareTotalMismatch),
            5008 => Ok(ErrorCode::PaymentAmountMismatch),
            5009 => Ok(ErrorCode::PaymentNotFound),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemUnavailable),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableNumberExists),

            // Queue / Ticket
            8001 => Ok(ErrorCode::QueueNotFound),
            8002 => Ok(ErrorCode::QueueClosed),
            8003 => Ok(ErrorCode::QueuePaused),
            8004 => Ok(ErrorCode::QueueEmpty),
            8101 => Ok(ErrorCode::TicketNotFound),
            8102 => Ok(ErrorCode::TicketTransitionInvalid),
            8103 => Ok(ErrorCode::TicketNotCancellable),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),
            9004 => Ok(ErrorCode::TransactionFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::OrganizationNotFound.code(), 3001);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::ItemNotCancellable.code(), 4008);
        assert_eq!(ErrorCode::OrderAlreadyPaid.code(), 5002);
        assert_eq!(ErrorCode::ShareTotalMismatch.code(), 5007);
        assert_eq!(ErrorCode::MenuItemNotFound.code(), 6001);
        assert_eq!(ErrorCode::TableNotFound.code(), 7001);
        assert_eq!(ErrorCode::QueueNotFound.code(), 8001);
        assert_eq!(ErrorCode::TicketTransitionInvalid.code(), 8102);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::TransactionFailed.code(), 9004);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::OrderNotFound.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(4001), Ok(ErrorCode::OrderNotFound));
        assert_eq!(ErrorCode::try_from(5007), Ok(ErrorCode::ShareTotalMismatch));
        assert_eq!(ErrorCode::try_from(5009), Ok(ErrorCode::PaymentNotFound));
        assert_eq!(ErrorCode::try_from(8004), Ok(ErrorCode::QueueEmpty));
        assert_eq!(ErrorCode::try_from(9004), Ok(ErrorCode::TransactionFailed));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::OrderNotFound).unwrap(),
            "4001"
        );
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("8102").unwrap();
        assert_eq!(code, ErrorCode::TicketTransitionInvalid);

        let result: Result<ErrorCode, _> = serde_json::from_str("1234");
        assert!(result.is_err());
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::NotAuthenticated,
            ErrorCode::OrderNotPending,
            ErrorCode::ShareTotalMismatch,
            ErrorCode::QueuePaused,
            ErrorCode::TransactionFailed,
        ];

        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, parsed);
        }
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::OrderNotFound.message(), "Order not found");
        assert_eq!(
            ErrorCode::ItemNotCancellable.message(),
            "Item already in preparation or delivered"
        );
        assert_eq!(ErrorCode::QueueEmpty.message(), "No waiting tickets");
    }
}
