//! # vendo-core: Pure Business Logic for Vendo
//!
//! This crate is the **heart** of the vending machine. It contains all
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Vendo Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               API layer (outside this workspace)                │   │
//! │  │    register ──► deposit ──► buy ──► purchase summary            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vendo-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │validation │  │   error   │  │   auth    │  │   │
//! │  │   │  Account  │  │  coins    │  │ CoreError │  │ Identity  │  │   │
//! │  │   │  Product  │  │  titles   │  │Validation │  │ role gate │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   vendo-db (Database Layer)                     │   │
//! │  │        SQLite repositories + purchase transaction engine        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Account, Product, PurchaseRecord, receipts)
//! - [`error`] - Domain error types
//! - [`validation`] - Coin denominations and input validation
//! - [`purchase`] - Pure purchase planning (fulfillable/cost arithmetic)
//! - [`auth`] - Identity and role-gate contract the engine trusts
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: balances and prices are i64 in the smallest coin unit
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod error;
pub mod purchase;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vendo_core::Account` instead of
// `use vendo_core::types::Account`

pub use auth::Identity;
pub use error::{CoreError, CoreResult, ValidationError};
pub use purchase::{plan_purchase, PurchasePlan};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The coin denominations the machine accepts, in ascending order.
///
/// Every balance-affecting amount (deposit, product price) must be a member
/// of this set. Zero is a member: free products and no-op deposits pass
/// validation, matching the machine's original behavior.
pub const COIN_DENOMINATIONS: [i64; 6] = [0, 5, 10, 20, 50, 100];

/// Page size for the available-products listing.
pub const PRODUCT_PAGE_SIZE: u32 = 20;
