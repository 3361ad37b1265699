//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD with the coin invariant on prices
//! - Paginated availability listing (buyers only see stocked slots)
//! - Presence-based partial updates
//!
//! Inventory *decrements* belong to the purchase transaction in
//! [`crate::engine`]; a product's quantity never goes down here.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult, StoreResult};
use vendo_core::validation::{validate_denomination, validate_page, validate_stock, validate_title};
use vendo_core::{CoreError, NewProduct, Product, ProductPatch, PRODUCT_PAGE_SIZE};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists a new product under the given seller account.
    ///
    /// The caller's role gate (seller-only) has already run; this validates
    /// the product itself: a real title, a coin-denomination price, and a
    /// non-negative stock level.
    ///
    /// ## Errors
    /// - `Validation` on a bad title/price/quantity
    /// - `Db(UniqueViolation)` when the seller already uses this title
    pub async fn create(&self, owner_id: &str, new: NewProduct) -> StoreResult<Product> {
        validate_title(&new.title)?;
        validate_denomination(new.price)?;
        validate_stock(new.quantity)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            price: new.price,
            quantity: new.quantity,
            description: new.description,
            owner_id: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, title = %product.title, owner = %owner_id, "Creating product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, title, price, quantity, description, owner_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.title)
        .bind(product.price)
        .bind(product.quantity)
        .bind(&product.description)
        .bind(&product.owner_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(product)
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, title, price, quantity, description, owner_id, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists in-stock products, paginated.
    ///
    /// ## Rules
    /// - `page` is 1-based
    /// - Page size is fixed at [`PRODUCT_PAGE_SIZE`] (20)
    /// - Sold-out slots (`quantity = 0`) never appear
    /// - Ordered by title then id for stable paging
    pub async fn list_available(&self, page: u32) -> StoreResult<Vec<Product>> {
        validate_page(page)?;

        let limit = PRODUCT_PAGE_SIZE as i64;
        let offset = (page as i64 - 1) * limit;

        debug!(page = %page, "Listing available products");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, title, price, quantity, description, owner_id, created_at, updated_at
            FROM products
            WHERE quantity > 0
            ORDER BY title, id
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)?;

        debug!(count = products.len(), "Listing returned products");
        Ok(products)
    }

    /// Applies a presence-based partial update.
    ///
    /// Only supplied fields change; `Some(0)` for price or quantity is a real
    /// update (validated like any other), never an omission. A supplied price
    /// re-passes the denomination validator.
    pub async fn update(&self, id: &str, patch: ProductPatch) -> StoreResult<Product> {
        if patch.is_empty() {
            return Err(vendo_core::ValidationError::Required {
                field: "at least one field".to_string(),
            }
            .into());
        }

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let current = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, title, price, quantity, description, owner_id, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DbError::from)?
        .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        let mut updated = current;
        if let Some(title) = patch.title {
            validate_title(&title)?;
            updated.title = title;
        }
        if let Some(price) = patch.price {
            validate_denomination(price)?;
            updated.price = price;
        }
        if let Some(quantity) = patch.quantity {
            validate_stock(quantity)?;
            updated.quantity = quantity;
        }
        if let Some(description) = patch.description {
            updated.description = Some(description);
        }
        updated.updated_at = Utc::now();

        debug!(id = %id, "Updating product");

        sqlx::query(
            r#"
            UPDATE products SET
                title = ?2,
                price = ?3,
                quantity = ?4,
                description = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&updated.id)
        .bind(&updated.title)
        .bind(updated.price)
        .bind(updated.quantity)
        .bind(&updated.description)
        .bind(updated.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        Ok(updated)
    }

    /// Deletes a product.
    ///
    /// Its ledger entries cascade away with it: a deleted product vanishes
    /// from future listings and future summaries.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::pool::{Database, DbConfig};
    use vendo_core::{NewAccount, Role};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }

    async fn seed_seller(db: &Database, handle: &str) -> String {
        db.accounts()
            .create(NewAccount {
                handle: handle.to_string(),
                credential_hash: "hash".to_string(),
                role: Role::Seller,
            })
            .await
            .expect("create seller")
            .id
    }

    fn new_product(title: &str, price: i64, quantity: i64) -> NewProduct {
        NewProduct {
            title: title.to_string(),
            price,
            quantity,
            description: None,
        }
    }

    #[tokio::test]
    async fn duplicate_title_per_seller_is_a_unique_violation() {
        let db = test_db().await;
        let seller = seed_seller(&db, "seller-a").await;
        let other = seed_seller(&db, "seller-b").await;
        let repo = db.products();

        repo.create(&seller, new_product("Cola", 20, 5)).await.expect("first listing");
        let err = repo
            .create(&seller, new_product("Cola", 50, 1))
            .await
            .expect_err("same seller, same title must fail");
        assert!(matches!(err, StoreError::Db(DbError::UniqueViolation { .. })));

        // A different seller may reuse the title.
        repo.create(&other, new_product("Cola", 20, 5)).await.expect("other seller ok");
    }

    #[tokio::test]
    async fn listing_hides_sold_out_and_pages_at_twenty() {
        let db = test_db().await;
        let seller = seed_seller(&db, "stocker").await;
        let repo = db.products();

        // 25 stocked slots plus one sold-out slot.
        for i in 0..25 {
            repo.create(&seller, new_product(&format!("slot-{i:02}"), 10, 1 + i))
                .await
                .expect("create");
        }
        repo.create(&seller, new_product("empty-slot", 10, 0)).await.expect("create");

        let page_1 = repo.list_available(1).await.expect("page 1");
        assert_eq!(page_1.len(), 20);

        let page_2 = repo.list_available(2).await.expect("page 2");
        assert_eq!(page_2.len(), 5);

        assert!(page_1.iter().chain(page_2.iter()).all(|p| p.quantity > 0));
        assert!(page_1.iter().chain(page_2.iter()).all(|p| p.title != "empty-slot"));

        // Stable title ordering across pages.
        assert_eq!(page_1[0].title, "slot-00");
        assert_eq!(page_2[4].title, "slot-24");
    }

    #[tokio::test]
    async fn patch_applies_zero_values() {
        let db = test_db().await;
        let seller = seed_seller(&db, "patcher").await;
        let created = db
            .products()
            .create(&seller, new_product("Gum", 20, 5))
            .await
            .expect("create");

        // Some(0) is a real update, not an omission.
        let updated = db
            .products()
            .update(
                &created.id,
                ProductPatch {
                    price: Some(0),
                    quantity: Some(0),
                    ..Default::default()
                },
            )
            .await
            .expect("patch");
        assert_eq!(updated.price, 0);
        assert_eq!(updated.quantity, 0);
        assert_eq!(updated.title, "Gum");
    }
}
