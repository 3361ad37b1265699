//! # Purchase Ledger Repository
//!
//! Reads over the append-only purchase ledger, including the reporting
//! projector that builds a buyer's purchase summary.
//!
//! Ledger *writes* happen in exactly one place: inside the engine's purchase
//! transaction, together with the inventory decrement and balance debit.
//! This repository never inserts, updates, or deletes a ledger row.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult, StoreResult};
use vendo_core::{BuyerPurchaseSummary, CoreError, PurchaseLine, PurchaseRecord};

/// Repository for purchase ledger reads.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Raw ledger entries for a buyer, in insertion order.
    pub async fn records_for_buyer(&self, buyer_id: &str) -> DbResult<Vec<PurchaseRecord>> {
        let records = sqlx::query_as::<_, PurchaseRecord>(
            r#"
            SELECT id, buyer_id, product_id, quantity, created_at
            FROM purchase_records
            WHERE buyer_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// The reporting projector: a buyer's history rolled up per product.
    ///
    /// ## What It Computes
    /// For every product the buyer has ever purchased (ordered by product id
    /// ascending):
    /// - `total_spent`   = SUM(current price * ledger quantity)
    /// - `total_quantity` = SUM(ledger quantity)
    ///
    /// The join uses the product's **current** price, so a later price edit
    /// retroactively re-prices past purchases. Preserved source behavior —
    /// snapshotting the unit price into the ledger would change this.
    ///
    /// Products deleted since purchase drop out of the summary entirely
    /// (their ledger rows cascade-deleted with them).
    ///
    /// Reflects the latest committed state: call it right after a purchase
    /// commits and the new entry is included.
    pub async fn summary_for_buyer(&self, buyer_id: &str) -> StoreResult<BuyerPurchaseSummary> {
        debug!(buyer_id = %buyer_id, "Projecting purchase summary");

        let buyer = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT handle, balance
            FROM accounts
            WHERE id = ?1
            "#,
        )
        .bind(buyer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?
        .ok_or_else(|| CoreError::AccountNotFound(buyer_id.to_string()))?;

        let lines = sqlx::query_as::<_, PurchaseLine>(
            r#"
            SELECT
                p.id AS product_id,
                p.title AS title,
                p.price AS price,
                p.description AS description,
                SUM(p.price * pr.quantity) AS total_spent,
                SUM(pr.quantity) AS total_quantity
            FROM purchase_records pr
            JOIN products p ON p.id = pr.product_id
            WHERE pr.buyer_id = ?1
            GROUP BY p.id, p.title, p.price, p.description
            ORDER BY p.id
            "#,
        )
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(BuyerPurchaseSummary {
            buyer_id: buyer_id.to_string(),
            handle: buyer.0,
            balance: buyer.1,
            lines,
        })
    }

    /// Counts ledger entries (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchase_records")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
