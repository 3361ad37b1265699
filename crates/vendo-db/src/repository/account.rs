//! # Account Repository
//!
//! Database operations for accounts. Balance *mutations* tied to the coin
//! invariant (deposit, reset, purchase debit) live in [`crate::engine`];
//! this repository owns identity-shaped CRUD.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult, StoreResult};
use vendo_core::validation::validate_handle;
use vendo_core::{Account, AccountPatch, CoreError, NewAccount, ValidationError};

/// Repository for account database operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Registers a new account with a zero balance.
    ///
    /// ## Errors
    /// - `Validation` on a malformed handle
    /// - `Db(UniqueViolation)` when the handle is taken
    pub async fn create(&self, new: NewAccount) -> StoreResult<Account> {
        validate_handle(&new.handle)?;

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4().to_string(),
            handle: new.handle,
            credential_hash: new.credential_hash,
            role: new.role,
            balance: 0,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %account.id, handle = %account.handle, "Creating account");

        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, handle, credential_hash, role, balance, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&account.id)
        .bind(&account.handle)
        .bind(&account.credential_hash)
        .bind(account.role)
        .bind(account.balance)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(account)
    }

    /// Gets an account by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, handle, credential_hash, role, balance, created_at, updated_at
            FROM accounts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Gets an account by its unique handle.
    ///
    /// Used by the external login collaborator to resolve credentials.
    pub async fn get_by_handle(&self, handle: &str) -> DbResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, handle, credential_hash, role, balance, created_at, updated_at
            FROM accounts
            WHERE handle = ?1
            "#,
        )
        .bind(handle)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Applies a presence-based partial update.
    ///
    /// Only supplied fields change. A supplied-but-empty value is a
    /// validation error, not an omission.
    pub async fn update(&self, id: &str, patch: AccountPatch) -> StoreResult<Account> {
        if patch.is_empty() {
            return Err(ValidationError::Required {
                field: "at least one field".to_string(),
            }
            .into());
        }

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let current = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, handle, credential_hash, role, balance, created_at, updated_at
            FROM accounts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DbError::from)?
        .ok_or_else(|| CoreError::AccountNotFound(id.to_string()))?;

        let mut updated = current;
        if let Some(handle) = patch.handle {
            validate_handle(&handle)?;
            updated.handle = handle;
        }
        if let Some(credential_hash) = patch.credential_hash {
            updated.credential_hash = credential_hash;
        }
        updated.updated_at = Utc::now();

        debug!(id = %id, "Updating account");

        sqlx::query(
            r#"
            UPDATE accounts SET
                handle = ?2,
                credential_hash = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&updated.id)
        .bind(&updated.handle)
        .bind(&updated.credential_hash)
        .bind(updated.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        Ok(updated)
    }

    /// Deletes an account.
    ///
    /// Foreign keys cascade: the account's products disappear, and with them
    /// (and with the account's own buyer history) all related ledger rows.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting account");

        let result = sqlx::query("DELETE FROM accounts WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Account", id));
        }

        Ok(())
    }

    /// Counts accounts (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
