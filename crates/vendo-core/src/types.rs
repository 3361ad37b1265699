//! # Domain Types
//!
//! Core domain types used throughout Vendo.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Account      │   │    Product      │   │ PurchaseRecord  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  handle (uniq)  │   │  title          │   │  buyer_id (FK)  │       │
//! │  │  role           │   │  price (coins)  │   │  product_id(FK) │       │
//! │  │  balance        │   │  quantity       │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  PurchaseRecord is the append-only ledger: it is never updated and     │
//! │  only disappears when its buyer or product cascades away.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key: `handle` for accounts, `(owner_id, title)` for products

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

/// The role an account holds.
///
/// Buyers deposit coins and purchase; sellers own and manage products.
/// The role gate lives in [`crate::auth`]; the stores trust it already ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Deposits coins, purchases products.
    Buyer,
    /// Lists and manages products.
    Seller,
}

impl Default for Role {
    fn default() -> Self {
        Role::Buyer
    }
}

// =============================================================================
// Account
// =============================================================================

/// A machine user with a coin balance.
///
/// The balance is an i64 in the smallest denomination unit and is only ever
/// incremented by validated denominations or decremented by exact purchase
/// costs, so it stays non-negative (also enforced by a CHECK constraint).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Account {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Unique login handle.
    pub handle: String,

    /// Opaque credential hash. Hashing itself happens in the (out-of-scope)
    /// identity collaborator; this crate only stores what it is given.
    pub credential_hash: String,

    /// Buyer or seller.
    pub role: Role,

    /// Current coin balance in smallest-denomination units.
    pub balance: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    pub handle: String,
    pub credential_hash: String,
    pub role: Role,
}

/// Presence-based partial update for an account.
///
/// `None` means "leave the column untouched". A supplied value is applied
/// even when it is empty, so a legitimately-empty field is distinguishable
/// from an omitted one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountPatch {
    pub handle: Option<String>,
    pub credential_hash: Option<String>,
}

impl AccountPatch {
    /// True when no field is supplied; such a patch is rejected up front.
    pub fn is_empty(&self) -> bool {
        self.handle.is_none() && self.credential_hash.is_none()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product slot in the machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display title, unique per owner.
    pub title: String,

    /// Unit price in smallest-denomination units.
    /// Must be a valid coin denomination (zero = free item).
    pub price: i64,

    /// Units in stock. Never negative.
    pub quantity: i64,

    /// Optional description shown in listings.
    pub description: Option<String>,

    /// The seller account that owns this slot.
    pub owner_id: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether any stock remains.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// The quantity actually deliverable for a request, bounded by stock.
    ///
    /// ## Example
    /// ```rust
    /// # use vendo_core::Product;
    /// # use chrono::Utc;
    /// # let now = Utc::now();
    /// # let product = Product {
    /// #     id: "p".into(), title: "Cola".into(), price: 20, quantity: 3,
    /// #     description: None, owner_id: "s".into(), created_at: now, updated_at: now,
    /// # };
    /// assert_eq!(product.fulfillable(5), 3); // partial fulfillment
    /// assert_eq!(product.fulfillable(2), 2);
    /// ```
    #[inline]
    pub fn fulfillable(&self, requested: i64) -> i64 {
        self.quantity.min(requested)
    }
}

/// Fields required to list a new product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub price: i64,
    pub quantity: i64,
    pub description: Option<String>,
}

/// Presence-based partial update for a product.
///
/// `None` means "leave the column untouched"; `Some(0)` and `Some("")` are
/// real updates. This deliberately replaces the original machine's behavior
/// of treating falsy supplied fields as omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub price: Option<i64>,
    pub quantity: Option<i64>,
    pub description: Option<String>,
}

impl ProductPatch {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.description.is_none()
    }
}

// =============================================================================
// Purchase Ledger
// =============================================================================

/// One entry in the append-only purchase ledger.
///
/// Never updated or deleted on its own; all "total spent" / "total bought"
/// aggregates derive from these rows rather than denormalized counters, so
/// historical purchase facts survive price edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseRecord {
    pub id: String,
    pub buyer_id: String,
    pub product_id: String,
    /// Units delivered (the fulfillable quantity, always positive).
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Receipt & Reporting
// =============================================================================

/// What the transaction engine hands back after a committed purchase.
///
/// Sufficient for the reporting projector to build the purchase-confirmation
/// response: who bought, what, how many units, and the balance left over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub buyer_id: String,
    pub product_id: String,
    /// Units actually delivered (may be less than requested).
    pub quantity: i64,
    /// Unit price charged.
    pub unit_price: i64,
    /// Total debited from the buyer (`quantity * unit_price`).
    pub total_cost: i64,
    /// Buyer balance after the debit.
    pub balance: i64,
}

/// Per-product aggregate in a buyer's purchase summary.
///
/// `total_spent` uses the product's **current** price, so editing a price
/// retroactively re-prices past purchases. Preserved source behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseLine {
    pub product_id: String,
    pub title: String,
    pub price: i64,
    pub description: Option<String>,
    /// SUM(current price * quantity) over all ledger entries.
    pub total_spent: i64,
    /// SUM(quantity) over all ledger entries.
    pub total_quantity: i64,
}

/// A buyer's purchase history rolled up per product, ordered by product id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyerPurchaseSummary {
    pub buyer_id: String,
    pub handle: String,
    pub balance: i64,
    pub lines: Vec<PurchaseLine>,
}

// =============================================================================
// Unit Tests
// =============================================================================
