//! # Error Types
//!
//! Domain-specific error types for agro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  agro-core errors (this file)                                          │
//! │  ├── CoreError        - Checkout / lookup rejections                   │
//! │  └── ValidationError  - Loaded menu data that cannot be used           │
//! │                                                                         │
//! │  agro-db errors (separate crate)                                       │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  till app errors                                                       │
//! │  └── ApiError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Operator               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Bad quantity input is never an error: it is clamped by
//! [`crate::validation::clamp_quantity`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was attempted with nothing billable in the cart.
    ///
    /// ## When This Occurs
    /// - The cart has no entries
    /// - Every entry references an id missing from the menu
    #[error("Cart is empty. Add items first.")]
    EmptyCart,

    /// A bill id was not found in the sales log.
    #[error("Bill not found: {0}")]
    BillNotFound(String),

    /// Menu item id does not exist.
    #[error("Menu item not found: {0}")]
    ItemNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Validation failures for data restored from storage or configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Duplicate value (e.g., two menu items sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Value is present but unusable (bad pattern, inconsistent totals).
    #[error("{field} is invalid: {reason}")]
    Invalid { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
