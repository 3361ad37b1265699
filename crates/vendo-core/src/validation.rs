//! # Validation Module
//!
//! Input validation for Vendo, the coin invariant first among equals.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Validation Layers                                 │
//! │                                                                         │
//! │  Layer 1: API layer (out of scope)                                     │
//! │  ├── Request shape, auth token                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  ├── Coin denominations, titles, quantities, pages                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (balance >= 0), CHECK (quantity >= 0)                       │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::COIN_DENOMINATIONS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// The Coin Invariant
// =============================================================================

/// Validates that an amount is an accepted coin denomination.
///
/// ## Rules
/// - Must be one of {0, 5, 10, 20, 50, 100}
/// - Everything else is rejected: negatives, non-multiples, 101, ...
/// - Zero passes: free products exist and a zero deposit is a no-op
///
/// Applied to product price on create/update and to every deposit. This is
/// the single place the machine decides what money looks like.
///
/// ## Example
/// ```rust
/// use vendo_core::validation::validate_denomination;
///
/// assert!(validate_denomination(50).is_ok());
/// assert!(validate_denomination(0).is_ok());
/// assert!(validate_denomination(7).is_err());
/// assert!(validate_denomination(-5).is_err());
/// ```
pub fn validate_denomination(amount: i64) -> ValidationResult<()> {
    if COIN_DENOMINATIONS.contains(&amount) {
        Ok(())
    } else {
        Err(ValidationError::InvalidDenomination {
            allowed: &COIN_DENOMINATIONS,
        })
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product title.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates an account handle.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Alphanumeric, hyphens and underscores only
pub fn validate_handle(handle: &str) -> ValidationResult<()> {
    let handle = handle.trim();

    if handle.is_empty() {
        return Err(ValidationError::Required {
            field: "handle".to_string(),
        });
    }

    if handle.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "handle".to_string(),
            max: 50,
        });
    }

    if !handle
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "handle".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a requested purchase quantity.
///
/// ## Rules
/// - Must be positive (> 0); a zero-quantity purchase is a caller bug
///
/// There is deliberately no upper bound: stock on hand caps the
/// *fulfillable* quantity, so a request of 1000 against 3 units ships 3.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock quantity supplied on product create/update.
///
/// Zero is fine (sold-out slot); negative stock never is.
pub fn validate_stock(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a listing page number (1-based).
pub fn validate_page(page: u32) -> ValidationResult<()> {
    if page == 0 {
        return Err(ValidationError::MustBePositive {
            field: "page".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
