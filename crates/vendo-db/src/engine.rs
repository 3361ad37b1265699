//! # Purchase Transaction Engine
//!
//! The one place where money moves. Every balance-affecting operation of the
//! machine lives here: the atomic purchase, coin deposits, and the balance
//! reset. Inventory, balance, and the ledger are only ever mutated together,
//! inside a single transaction.
//!
//! ## The Purchase Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   One Purchase Attempt (one SQL tx)                     │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── SELECT product        ── absent? ──► ProductNotFound (no writes)│
//! │    ├── SELECT buyer account  ── absent? ──► AccountNotFound (no writes)│
//! │    │                                                                    │
//! │    ├── plan = plan_purchase(product, buyer, requested)                 │
//! │    │     fulfillable = min(stock, requested)   cost = fulfillable×price│
//! │    │     balance < cost? ──► InsufficientBalance (tx dropped, 0 writes)│
//! │    │     fulfillable == 0? ─► ProductNotFound   (tx dropped, 0 writes) │
//! │    │                                                                    │
//! │    ├── UPDATE products  SET quantity -= f  WHERE quantity >= f  ─┐     │
//! │    ├── UPDATE accounts  SET balance  -= c  WHERE balance  >= c  ─┤     │
//! │    ├── INSERT purchase_records (buyer, product, f)               │     │
//! │  COMMIT                                  guard missed? rollback ─┘     │
//! │                                          and re-run from BEGIN         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! Optimistic retry-on-conflict. Two purchases racing for the last unit both
//! read stock 1; SQLite lets only one of them commit — the other hits either
//! a busy/stale-snapshot error or a guard UPDATE matching zero rows, rolls
//! back, and re-runs against fresh state (where it then sees stock 0 and
//! fails as not-found). Attempts are bounded; after that a retryable busy
//! error surfaces rather than blocking forever. The guard predicates also
//! make oversell and overdraft impossible outright: a decrement below zero
//! simply matches no row.

use std::time::Duration;

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, StoreError, StoreResult};
use vendo_core::purchase::plan_purchase;
use vendo_core::validation::{validate_denomination, validate_quantity};
use vendo_core::{Account, CoreError, Product, PurchaseReceipt};

/// How many conflicting transaction attempts a single purchase call makes
/// before surfacing a retryable busy error.
const MAX_PURCHASE_ATTEMPTS: u32 = 5;

/// Outcome of a single transaction attempt.
enum TxOutcome {
    /// Transaction committed; receipt is final.
    Committed(PurchaseReceipt),
    /// A guard UPDATE matched zero rows: concurrent state change.
    /// Rolled back; caller re-runs against fresh state.
    Conflict,
}

/// The purchase transaction engine.
///
/// ## Usage
/// ```rust,ignore
/// let engine = db.engine();
///
/// engine.deposit(&buyer_id, 50).await?;
/// let receipt = engine.purchase(&buyer_id, &product_id, 2).await?;
/// assert_eq!(receipt.balance, 50 - receipt.total_cost);
/// ```
#[derive(Debug, Clone)]
pub struct PurchaseEngine {
    pool: SqlitePool,
}

impl PurchaseEngine {
    /// Creates a new PurchaseEngine.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseEngine { pool }
    }

    /// Buys `requested` units of a product for a buyer.
    ///
    /// Partial fulfillment is allowed: requesting more than the stock on
    /// hand delivers what is in stock and charges only for that. The
    /// operation is all-or-nothing — either the inventory decrement, the
    /// balance debit, and the ledger append all commit, or nothing does.
    ///
    /// ## Errors
    /// - `Validation` when `requested` is not positive
    /// - `ProductNotFound` when the product is absent *or* out of stock
    /// - `AccountNotFound` when the buyer row vanished (auth raced a delete)
    /// - `InsufficientBalance` when the fulfillable cost exceeds the balance
    /// - `Db(Busy)` when contention outlasted every retry attempt
    pub async fn purchase(
        &self,
        buyer_id: &str,
        product_id: &str,
        requested: i64,
    ) -> StoreResult<PurchaseReceipt> {
        validate_quantity(requested)?;

        let mut attempt = 1;
        loop {
            match self.try_purchase(buyer_id, product_id, requested).await {
                Ok(TxOutcome::Committed(receipt)) => {
                    info!(
                        buyer_id = %buyer_id,
                        product_id = %product_id,
                        quantity = receipt.quantity,
                        cost = receipt.total_cost,
                        balance = receipt.balance,
                        "Purchase committed"
                    );
                    return Ok(receipt);
                }
                Ok(TxOutcome::Conflict) => {
                    warn!(
                        buyer_id = %buyer_id,
                        product_id = %product_id,
                        attempt,
                        "Purchase conflict, retrying"
                    );
                }
                Err(StoreError::Db(e)) if e.is_retryable() => {
                    warn!(
                        buyer_id = %buyer_id,
                        product_id = %product_id,
                        attempt,
                        error = %e,
                        "Purchase hit lock contention, retrying"
                    );
                }
                Err(other) => return Err(other),
            }

            if attempt >= MAX_PURCHASE_ATTEMPTS {
                return Err(StoreError::Db(DbError::Busy(format!(
                    "purchase aborted after {MAX_PURCHASE_ATTEMPTS} conflicting attempts"
                ))));
            }
            attempt += 1;
            tokio::time::sleep(Duration::from_millis(5 * attempt as u64)).await;
        }
    }

    /// One transaction attempt. Errors and `Conflict` both leave the store
    /// untouched: the transaction is dropped or rolled back before returning.
    async fn try_purchase(
        &self,
        buyer_id: &str,
        product_id: &str,
        requested: i64,
    ) -> StoreResult<TxOutcome> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let product = fetch_product(&mut tx, product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let buyer = fetch_account(&mut tx, buyer_id)
            .await?
            .ok_or_else(|| CoreError::AccountNotFound(buyer_id.to_string()))?;

        // The decision is pure; the plan is provisional until both guarded
        // writes land in this same transaction.
        let plan = plan_purchase(&product, &buyer, requested)?;

        debug!(
            buyer_id = %buyer_id,
            product_id = %product_id,
            requested,
            fulfillable = plan.fulfillable,
            cost = plan.cost,
            "Purchase planned"
        );

        let now = Utc::now();

        let decremented = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity - ?2, updated_at = ?3
            WHERE id = ?1 AND quantity >= ?2
            "#,
        )
        .bind(product_id)
        .bind(plan.fulfillable)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        if decremented.rows_affected() == 0 {
            tx.rollback().await.map_err(DbError::from)?;
            return Ok(TxOutcome::Conflict);
        }

        let debited = sqlx::query(
            r#"
            UPDATE accounts
            SET balance = balance - ?2, updated_at = ?3
            WHERE id = ?1 AND balance >= ?2
            "#,
        )
        .bind(buyer_id)
        .bind(plan.cost)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        if debited.rows_affected() == 0 {
            tx.rollback().await.map_err(DbError::from)?;
            return Ok(TxOutcome::Conflict);
        }

        sqlx::query(
            r#"
            INSERT INTO purchase_records (id, buyer_id, product_id, quantity, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(buyer_id)
        .bind(product_id)
        .bind(plan.fulfillable)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        Ok(TxOutcome::Committed(PurchaseReceipt {
            buyer_id: buyer_id.to_string(),
            product_id: product_id.to_string(),
            quantity: plan.fulfillable,
            unit_price: product.price,
            total_cost: plan.cost,
            balance: plan.balance_after,
        }))
    }

    /// Deposits a single coin into an account.
    ///
    /// The amount must be a valid denomination (a zero coin validates and
    /// is a no-op deposit). The credit is a single relative UPDATE with a
    /// RETURNING clause, so two simultaneous deposits both land and each
    /// caller sees exactly the balance its own credit produced.
    pub async fn deposit(&self, account_id: &str, amount: i64) -> StoreResult<i64> {
        validate_denomination(amount)?;

        let balance: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE accounts
            SET balance = balance + ?2, updated_at = ?3
            WHERE id = ?1
            RETURNING balance
            "#,
        )
        .bind(account_id)
        .bind(amount)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)?;

        let balance =
            balance.ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;

        info!(account_id = %account_id, amount, balance, "Deposit committed");
        Ok(balance)
    }

    /// Zeroes an account's balance unconditionally ("take the change out").
    pub async fn reset_balance(&self, account_id: &str) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET balance = 0, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(account_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::AccountNotFound(account_id.to_string()).into());
        }

        info!(account_id = %account_id, "Balance reset");
        Ok(())
    }
}

// =============================================================================
// Transaction-scoped reads
// =============================================================================

async fn fetch_product(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
) -> Result<Option<Product>, DbError> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT id, title, price, quantity, description, owner_id, created_at, updated_at
        FROM products
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(product)
}

async fn fetch_account(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
) -> Result<Option<Account>, DbError> {
    let account = sqlx::query_as::<_, Account>(
        r#"
        SELECT id, handle, credential_hash, role, balance, created_at, updated_at
        FROM accounts
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::pool::{Database, DbConfig};
    use vendo_core::{NewAccount, NewProduct, Role, ValidationError};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }

    async fn seed_buyer(db: &Database, handle: &str, balance: i64) -> String {
        let account = db
            .accounts()
            .create(NewAccount {
                handle: handle.to_string(),
                credential_hash: "hash".to_string(),
                role: Role::Buyer,
            })
            .await
            .expect("create buyer");
        if balance > 0 {
            sqlx::query("UPDATE accounts SET balance = ?2 WHERE id = ?1")
                .bind(&account.id)
                .bind(balance)
                .execute(db.pool())
                .await
                .expect("fund buyer");
        }
        account.id
    }

    async fn seed_product(db: &Database, title: &str, price: i64, quantity: i64) -> String {
        let seller = db
            .accounts()
            .create(NewAccount {
                handle: format!("seller-of-{title}"),
                credential_hash: "hash".to_string(),
                role: Role::Seller,
            })
            .await
            .expect("create seller");
        let product = db
            .products()
            .create(
                &seller.id,
                NewProduct {
                    title: title.to_string(),
                    price,
                    quantity,
                    description: None,
                },
            )
            .await
            .expect("create product");
        product.id
    }

    #[tokio::test]
    async fn purchase_debits_credits_and_appends_atomically() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "alice", 100).await;
        let product = seed_product(&db, "cola", 20, 10).await;

        let receipt = db.engine().purchase(&buyer, &product, 2).await.expect("purchase");

        assert_eq!(receipt.quantity, 2);
        assert_eq!(receipt.unit_price, 20);
        assert_eq!(receipt.total_cost, 40);
        assert_eq!(receipt.balance, 60);

        let account = db.accounts().get_by_id(&buyer).await.expect("get").expect("exists");
        assert_eq!(account.balance, 60);

        let stocked = db.products().get_by_id(&product).await.expect("get").expect("exists");
        assert_eq!(stocked.quantity, 8);

        let records = db.purchases().records_for_buyer(&buyer).await.expect("ledger");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].quantity, 2);
    }

    #[tokio::test]
    async fn purchase_fulfills_partially_when_stock_runs_short() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "bob", 100).await;
        let product = seed_product(&db, "chips", 20, 3).await;

        // Asks for 5, gets the 3 on hand, pays for 3.
        let receipt = db.engine().purchase(&buyer, &product, 5).await.expect("purchase");

        assert_eq!(receipt.quantity, 3);
        assert_eq!(receipt.total_cost, 60);
        assert_eq!(receipt.balance, 40);

        let stocked = db.products().get_by_id(&product).await.expect("get").expect("exists");
        assert_eq!(stocked.quantity, 0);

        let summary = db.purchases().summary_for_buyer(&buyer).await.expect("summary");
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.lines[0].total_spent, 60);
        assert_eq!(summary.lines[0].total_quantity, 3);
        assert_eq!(summary.balance, 40);
    }

    #[tokio::test]
    async fn oversized_request_delivers_the_stock_on_hand() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "quentin", 100).await;
        let product = seed_product(&db, "soup", 20, 3).await;

        // A request of 1000 is valid input; only stock caps it.
        let receipt = db.engine().purchase(&buyer, &product, 1000).await.expect("purchase");

        assert_eq!(receipt.quantity, 3);
        assert_eq!(receipt.total_cost, 60);
        assert_eq!(receipt.balance, 40);

        let stocked = db.products().get_by_id(&product).await.expect("get").expect("exists");
        assert_eq!(stocked.quantity, 0);
    }

    #[tokio::test]
    async fn purchase_with_insufficient_balance_writes_nothing() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "carol", 5).await;
        let product = seed_product(&db, "candy", 10, 10).await;

        let err = db.engine().purchase(&buyer, &product, 1).await.expect_err("must fail");
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientBalance { required: 10, available: 5 })
        ));

        // Nothing moved.
        let account = db.accounts().get_by_id(&buyer).await.expect("get").expect("exists");
        assert_eq!(account.balance, 5);
        let stocked = db.products().get_by_id(&product).await.expect("get").expect("exists");
        assert_eq!(stocked.quantity, 10);
        assert_eq!(db.purchases().count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn out_of_stock_product_reads_as_not_found() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "dave", 100).await;
        let product = seed_product(&db, "gum", 5, 0).await;

        let err = db.engine().purchase(&buyer, &product, 1).await.expect_err("must fail");
        assert!(matches!(err, StoreError::Core(CoreError::ProductNotFound(_))));
        assert_eq!(db.purchases().count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn missing_product_reads_as_not_found() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "erin", 100).await;

        let err = db
            .engine()
            .purchase(&buyer, "no-such-product", 1)
            .await
            .expect_err("must fail");
        assert!(matches!(err, StoreError::Core(CoreError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn missing_and_broke_surface_the_same_user_message() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "frank", 0).await;
        let product = seed_product(&db, "soda", 10, 5).await;

        let broke = db.engine().purchase(&buyer, &product, 1).await.expect_err("broke");
        let missing = db
            .engine()
            .purchase(&buyer, "no-such-product", 1)
            .await
            .expect_err("missing");

        assert_eq!(broke.user_message(), missing.user_message());
        assert_eq!(broke.user_message(), "Product not found or insufficient balance");
    }

    #[tokio::test]
    async fn repeat_purchases_accumulate_in_the_summary() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "grace", 100).await;
        let product = seed_product(&db, "water", 10, 10).await;

        db.engine().purchase(&buyer, &product, 1).await.expect("first");
        db.engine().purchase(&buyer, &product, 1).await.expect("second");

        let summary = db.purchases().summary_for_buyer(&buyer).await.expect("summary");
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.lines[0].total_quantity, 2);
        assert_eq!(summary.lines[0].total_spent, 20);

        let records = db.purchases().records_for_buyer(&buyer).await.expect("ledger");
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn summary_reprices_history_at_the_current_price() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "heidi", 100).await;
        let product = seed_product(&db, "juice", 10, 10).await;

        db.engine().purchase(&buyer, &product, 2).await.expect("purchase");

        db.products()
            .update(
                &product,
                vendo_core::ProductPatch {
                    price: Some(50),
                    ..Default::default()
                },
            )
            .await
            .expect("price edit");

        let summary = db.purchases().summary_for_buyer(&buyer).await.expect("summary");
        assert_eq!(summary.lines[0].total_spent, 100);
        // The balance still reflects what was actually charged.
        assert_eq!(summary.balance, 80);
    }

    #[tokio::test]
    async fn deposit_accepts_coins_and_rejects_everything_else() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "ivan", 0).await;
        let engine = db.engine();

        assert_eq!(engine.deposit(&buyer, 5).await.expect("5"), 5);
        assert_eq!(engine.deposit(&buyer, 50).await.expect("50"), 55);
        assert_eq!(engine.deposit(&buyer, 100).await.expect("100"), 155);
        // The zero coin validates and changes nothing.
        assert_eq!(engine.deposit(&buyer, 0).await.expect("0"), 155);

        for bad in [1, 3, 7, 25, 99, 101, -5] {
            let err = engine.deposit(&buyer, bad).await.expect_err("must reject");
            assert!(matches!(
                err,
                StoreError::Core(CoreError::Validation(ValidationError::InvalidDenomination { .. }))
            ));
        }

        let account = db.accounts().get_by_id(&buyer).await.expect("get").expect("exists");
        assert_eq!(account.balance, 155);
    }

    #[tokio::test]
    async fn deposit_into_missing_account_fails() {
        let db = test_db().await;
        let err = db.engine().deposit("no-such-account", 5).await.expect_err("must fail");
        assert!(matches!(err, StoreError::Core(CoreError::AccountNotFound(_))));
    }

    #[tokio::test]
    async fn reset_zeroes_the_balance() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "judy", 85).await;
        let engine = db.engine();

        engine.reset_balance(&buyer).await.expect("reset");

        let account = db.accounts().get_by_id(&buyer).await.expect("get").expect("exists");
        assert_eq!(account.balance, 0);

        // Idempotent.
        engine.reset_balance(&buyer).await.expect("reset again");
        let err = engine.reset_balance("no-such-account").await.expect_err("must fail");
        assert!(matches!(err, StoreError::Core(CoreError::AccountNotFound(_))));
    }

    #[tokio::test]
    async fn non_positive_request_is_rejected_before_touching_the_store() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "mallory", 100).await;
        let product = seed_product(&db, "tea", 10, 10).await;

        for bad in [0, -1, -100] {
            let err = db.engine().purchase(&buyer, &product, bad).await.expect_err("must fail");
            assert!(matches!(err, StoreError::Core(CoreError::Validation(_))));
        }
        assert_eq!(db.purchases().count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn deleting_a_buyer_cascades_its_ledger_entries() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "oscar", 100).await;
        let product = seed_product(&db, "coffee", 10, 10).await;

        db.engine().purchase(&buyer, &product, 1).await.expect("purchase");
        assert_eq!(db.purchases().count().await.expect("count"), 1);

        db.accounts().delete(&buyer).await.expect("delete buyer");
        assert_eq!(db.purchases().count().await.expect("count"), 0);

        // The product itself belongs to the seller and survives.
        assert!(db.products().get_by_id(&product).await.expect("get").is_some());
    }

    #[tokio::test]
    async fn deleting_a_seller_cascades_its_products_and_their_ledger_rows() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "rupert", 100).await;
        let seller = db
            .accounts()
            .create(NewAccount {
                handle: "closing-seller".to_string(),
                credential_hash: "hash".to_string(),
                role: Role::Seller,
            })
            .await
            .expect("create seller");
        let product = db
            .products()
            .create(
                &seller.id,
                NewProduct {
                    title: "cookies".to_string(),
                    price: 10,
                    quantity: 5,
                    description: None,
                },
            )
            .await
            .expect("create product");

        db.engine().purchase(&buyer, &product.id, 1).await.expect("purchase");
        assert_eq!(db.purchases().count().await.expect("count"), 1);

        db.accounts().delete(&seller.id).await.expect("delete seller");

        // Product and its ledger rows vanish with the seller.
        assert!(db.products().get_by_id(&product.id).await.expect("get").is_none());
        assert_eq!(db.purchases().count().await.expect("count"), 0);

        // The buyer keeps their account; spent coins stay spent.
        let account = db.accounts().get_by_id(&buyer).await.expect("get").expect("exists");
        assert_eq!(account.balance, 90);
    }

    #[tokio::test]
    async fn deleting_a_product_cascades_it_out_of_summaries() {
        let db = test_db().await;
        let buyer = seed_buyer(&db, "peggy", 100).await;
        let product = seed_product(&db, "cocoa", 10, 10).await;
        let other = seed_product(&db, "broth", 5, 10).await;

        db.engine().purchase(&buyer, &product, 1).await.expect("purchase");
        db.engine().purchase(&buyer, &other, 1).await.expect("purchase");

        db.products().delete(&product).await.expect("delete product");

        let summary = db.purchases().summary_for_buyer(&buyer).await.expect("summary");
        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.lines[0].product_id, other);
        // The charge stays charged even though the line is gone.
        assert_eq!(summary.balance, 85);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_buyers_cannot_oversell_the_last_unit() {
        // :memory: holds a single connection, so true concurrency needs a
        // file-backed database.
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vendo-race.db");
        let config = DbConfig::new(path.to_string_lossy().as_ref()).max_connections(4);
        let db = Database::new(config).await.expect("file database");

        let alice = seed_buyer(&db, "race-alice", 100).await;
        let bob = seed_buyer(&db, "race-bob", 100).await;
        let product = seed_product(&db, "last-unit", 20, 1).await;

        let engine_a = db.engine();
        let engine_b = db.engine();
        let (pa, pb) = {
            let product_a = product.clone();
            let product_b = product.clone();
            let alice = alice.clone();
            let bob = bob.clone();
            tokio::join!(
                tokio::spawn(async move { engine_a.purchase(&alice, &product_a, 1).await }),
                tokio::spawn(async move { engine_b.purchase(&bob, &product_b, 1).await }),
            )
        };
        let results = [pa.expect("task a"), pb.expect("task b")];

        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1, "exactly one buyer gets the last unit");

        let stocked = db.products().get_by_id(&product).await.expect("get").expect("exists");
        assert_eq!(stocked.quantity, 0);
        assert_eq!(db.purchases().count().await.expect("count"), 1);

        // Exactly one balance was debited.
        let a = db.accounts().get_by_id(&alice).await.expect("get").expect("exists");
        let b = db.accounts().get_by_id(&bob).await.expect("get").expect("exists");
        assert_eq!(a.balance + b.balance, 180);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_deposits_are_never_lost() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vendo-deposits.db");
        let config = DbConfig::new(path.to_string_lossy().as_ref()).max_connections(4);
        let db = Database::new(config).await.expect("file database");

        let buyer = seed_buyer(&db, "race-deposits", 0).await;

        let mut handles = Vec::new();
        for _ in 0..10 {
            let engine = db.engine();
            let id = buyer.clone();
            handles.push(tokio::spawn(async move { engine.deposit(&id, 10).await }));
        }
        for handle in handles {
            handle.await.expect("task").expect("deposit");
        }

        let account = db.accounts().get_by_id(&buyer).await.expect("get").expect("exists");
        assert_eq!(account.balance, 100);
    }
}
