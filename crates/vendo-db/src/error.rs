//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Error Propagation                                   │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (below) ← One taxonomy for engine and repositories         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  API layer shows user-friendly message, logs the real variant          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Registering a duplicate handle
    /// - A seller listing two products under one title
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Ledger entry referencing a vanished buyer or product
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Lock contention or a stale write snapshot.
    ///
    /// Retryable: the purchase engine re-runs its transaction on this, and
    /// callers seeing it after retries should back off and try again.
    #[error("Database busy: {0}")]
    Busy(String),

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Whether the caller can expect the same operation to succeed shortly.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DbError::Busy(_) | DbError::PoolExhausted)
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint/lock type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite messages of interest:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint:     "FOREIGN KEY constraint failed"
                // Lock contention:   "database is locked" (SQLITE_BUSY) or a
                //                    stale snapshot under WAL (SQLITE_BUSY_SNAPSHOT)
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("database is locked")
                    || msg.contains("database table is locked")
                    || msg.contains("snapshot")
                {
                    DbError::Busy(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Store Error (operation boundary)
// =============================================================================

use vendo_core::{CoreError, ValidationError};

/// Error type for the operations the machine exposes (purchase, deposit,
/// product management). Combines business rule violations with storage
/// failures so callers handle one taxonomy.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Business rule violation (not found, insufficient balance, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failure (constraint violation, lock contention, ...).
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Core(CoreError::Validation(err))
    }
}

impl StoreError {
    /// The message the API layer may show a caller.
    ///
    /// Deliberately merges ProductNotFound / AccountNotFound /
    /// InsufficientBalance into one sentence: the boundary must not reveal
    /// whether a product exists, is out of stock, or the buyer is short of
    /// coins. Validation messages stay specific (they name the broken rule);
    /// storage internals are never exposed.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Core(CoreError::ProductNotFound(_))
            | StoreError::Core(CoreError::AccountNotFound(_))
            | StoreError::Core(CoreError::InsufficientBalance { .. }) => {
                "Product not found or insufficient balance".to_string()
            }
            StoreError::Core(CoreError::Validation(v)) => v.to_string(),
            StoreError::Core(CoreError::Forbidden { .. })
            | StoreError::Core(CoreError::Unauthenticated) => "Not allowed".to_string(),
            StoreError::Db(DbError::UniqueViolation { .. }) => "Already exists".to_string(),
            StoreError::Db(e) if e.is_retryable() => {
                "The machine is busy, please try again".to_string()
            }
            StoreError::Db(_) => "Internal error".to_string(),
        }
    }

    /// Whether retrying the same call may succeed without any change.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Db(e) if e.is_retryable())
    }
}

/// Result type for exposed store/engine operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_failures_share_one_user_message() {
        let not_found: StoreError = CoreError::ProductNotFound("p1".to_string()).into();
        let no_account: StoreError = CoreError::AccountNotFound("a1".to_string()).into();
        let broke: StoreError = CoreError::InsufficientBalance {
            required: 60,
            available: 40,
        }
        .into();

        let msg = "Product not found or insufficient balance";
        assert_eq!(not_found.user_message(), msg);
        assert_eq!(no_account.user_message(), msg);
        assert_eq!(broke.user_message(), msg);
    }

    #[test]
    fn test_validation_messages_stay_specific() {
        let err: StoreError = ValidationError::InvalidDenomination {
            allowed: &vendo_core::COIN_DENOMINATIONS,
        }
        .into();
        assert!(err.user_message().contains("Allowed values"));
    }

    #[test]
    fn test_busy_is_retryable() {
        let err: StoreError = DbError::Busy("database is locked".to_string()).into();
        assert!(err.is_retryable());
        assert_eq!(err.user_message(), "The machine is busy, please try again");

        let err: StoreError = DbError::Internal("boom".to_string()).into();
        assert!(!err.is_retryable());
        assert_eq!(err.user_message(), "Internal error");
    }
}
