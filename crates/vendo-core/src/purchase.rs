//! # Purchase Planning
//!
//! The pure decision half of the purchase transaction: given the current
//! product and buyer rows, decide how many units ship and what they cost.
//! The db-side engine executes the resulting plan atomically.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Purchase Decision                                 │
//! │                                                                         │
//! │  requested ──┐                                                          │
//! │              ▼                                                          │
//! │  fulfillable = min(stock, requested)     (partial fulfillment allowed) │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  cost = fulfillable * price                                            │
//! │              │                                                          │
//! │              ├── balance < cost?   → InsufficientBalance, NO writes    │
//! │              ├── fulfillable == 0? → ProductNotFound (hides stock)     │
//! │              │                                                          │
//! │              ▼                                                          │
//! │  PurchasePlan { fulfillable, cost, balance_after, quantity_after }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::types::{Account, Product};
use crate::validation::validate_quantity;

/// The computed outcome of a purchase, before any write happens.
///
/// A plan is provisional: the engine re-derives it on every transaction
/// attempt so that concurrent commits can never turn a stale plan into an
/// oversell or an overdraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchasePlan {
    /// Units that will ship (min of stock and request, never zero).
    pub fulfillable: i64,
    /// Total coins to debit (`fulfillable * unit price`).
    pub cost: i64,
    /// Buyer balance once the debit commits.
    pub balance_after: i64,
    /// Product stock once the decrement commits.
    pub quantity_after: i64,
}

/// Decides a purchase against a consistent snapshot of product and buyer.
///
/// ## Errors
/// - `Validation` when `requested` is not positive
/// - `InsufficientBalance` when the buyer cannot cover the fulfillable cost;
///   by contract the caller must not have written anything yet
/// - `ProductNotFound` when nothing is fulfillable (stock exhausted) —
///   deliberately indistinguishable from an absent product
///
/// ## Example
/// ```rust
/// # use vendo_core::purchase::plan_purchase;
/// # use vendo_core::{Account, Product, Role};
/// # use chrono::Utc;
/// # let now = Utc::now();
/// # let product = Product {
/// #     id: "p".into(), title: "Cola".into(), price: 20, quantity: 3,
/// #     description: None, owner_id: "s".into(), created_at: now, updated_at: now,
/// # };
/// # let buyer = Account {
/// #     id: "b".into(), handle: "jo".into(), credential_hash: "x".into(),
/// #     role: Role::Buyer, balance: 100, created_at: now, updated_at: now,
/// # };
/// let plan = plan_purchase(&product, &buyer, 5).unwrap();
/// assert_eq!(plan.fulfillable, 3); // only 3 in stock
/// assert_eq!(plan.cost, 60);
/// assert_eq!(plan.balance_after, 40);
/// ```
pub fn plan_purchase(product: &Product, buyer: &Account, requested: i64) -> CoreResult<PurchasePlan> {
    validate_quantity(requested)?;

    let fulfillable = product.fulfillable(requested);
    let cost = fulfillable * product.price;

    // Balance check comes before the stock-exhaustion check and before any
    // write: an unaffordable purchase must leave inventory untouched even
    // though the fulfillable quantity was already computed.
    if buyer.balance < cost {
        return Err(CoreError::InsufficientBalance {
            required: cost,
            available: buyer.balance,
        });
    }

    if fulfillable == 0 {
        // Out of stock reads exactly like "no such product" at the boundary.
        return Err(CoreError::ProductNotFound(product.id.clone()));
    }

    Ok(PurchasePlan {
        fulfillable,
        cost,
        balance_after: buyer.balance - cost,
        quantity_after: product.quantity - fulfillable,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
