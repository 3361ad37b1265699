//! # Error Types
//!
//! Domain-specific error types for vendo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Error Types                                    │
//! │                                                                         │
//! │  vendo-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  vendo-db errors (separate crate)                                      │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── StoreError       - Operation boundary (Core | Db)                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → API layer            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (id, amounts, allowed sets)
//! 3. Errors are enum variants, never String
//! 4. Internal variants stay distinct even where the API boundary merges them

use thiserror::Error;

use crate::types::Role;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. The API boundary merges
/// some of them into a single user-facing message (see the store layer's
/// `user_message`), but they are kept distinct here for logging.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product absent — or out of stock, which the machine deliberately
    /// reports identically so callers cannot probe stock levels.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Buyer account absent. Should not occur after authentication, but the
    /// engine must handle it rather than trust the collaborator blindly.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// The buyer cannot cover the fulfillable cost.
    ///
    /// When this fires, NOTHING has been mutated: no inventory decrement,
    /// no balance debit, no ledger entry.
    #[error("Insufficient balance: need {required}, have {available}")]
    InsufficientBalance { required: i64, available: i64 },

    /// The caller's role is not in the operation's allowed set.
    #[error("Operation requires one of roles {required:?}")]
    Forbidden { required: Vec<Role> },

    /// No identity resolved for the request.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements. Always
/// recoverable; the message names the specific rule that failed.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Amount is not an accepted coin denomination.
    /// Carries the allowed set for user-facing messaging.
    #[error("Invalid denomination value. Allowed values are: {allowed:?}")]
    InvalidDenomination { allowed: &'static [i64] },

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (bad UUID, bad charset).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
