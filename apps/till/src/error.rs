//! # API Error Type
//!
//! Unified error type for till commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in AgroPOS                                │
//! │                                                                         │
//! │  agro-till checkout                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function  →  Result<T, ApiError>                        │  │
//! │  │         │                                                        │  │
//! │  │  Empty cart? ────── CoreError::EmptyCart ─────────┐              │  │
//! │  │  Store down? ────── DbError::ConnectionFailed ────┤              │  │
//! │  │  Printer gone? ──── PrintError::Unavailable ──────┼──► ApiError  │  │
//! │  │         │                                         │              │  │
//! │  │  Success ──────────────────────────────────────────────────────► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr:  [EMPTY_CART] Cart is empty. Add items first.                  │
//! │  --json:  {"code":"EMPTY_CART","message":"Cart is empty. Add items..."} │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Print failures during checkout never become an `ApiError`; the bill is
//! still saved and the failure is reported on the outcome instead.

use agro_core::CoreError;
use agro_db::DbError;
use serde::Serialize;

use crate::print::PrintError;

/// API error returned from till commands.
///
/// ## Serialization
/// ```json
/// { "code": "NOT_FOUND", "message": "Bill not found: bill_1760..." }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Menu item or bill not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Checkout with nothing billable in the cart
    EmptyCart,

    /// Storage operation failed
    DatabaseError,

    /// Receipt could not be printed (reprint only)
    PrintError,

    /// Configuration could not be resolved
    ConfigError,

    /// Internal error
    Internal,
}

impl ErrorCode {
    /// Process exit status for this code.
    pub fn exit_status(&self) -> u8 {
        match self {
            ErrorCode::NotFound | ErrorCode::ValidationError | ErrorCode::EmptyCart => 2,
            ErrorCode::PrintError => 3,
            ErrorCode::DatabaseError | ErrorCode::ConfigError | ErrorCode::Internal => 1,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ConfigError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Serialization(e) => {
                tracing::error!("Serialization failed: {}", e);
                ApiError::new(ErrorCode::Internal, "Could not encode value for storage")
            }
            DbError::Unavailable(e) => {
                ApiError::new(ErrorCode::DatabaseError, format!("Storage unavailable: {}", e))
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyCart => {
                ApiError::new(ErrorCode::EmptyCart, CoreError::EmptyCart.to_string())
            }
            CoreError::BillNotFound(id) => ApiError::not_found("Bill", &id),
            CoreError::ItemNotFound(id) => ApiError::not_found("Menu item", &id),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<PrintError> for ApiError {
    fn from(err: PrintError) -> Self {
        ApiError::new(ErrorCode::PrintError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = serde_json::to_value(self.code)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| format!("{:?}", self.code));
        write!(f, "[{}] {}", code, self.message)
    }
}

impl std::error::Error for ApiError {}
