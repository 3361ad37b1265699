//! # vendo-db: Storage and Transaction Layer for Vendo
//!
//! This crate provides database access for the Vendo vending machine service.
//! It uses SQLite for storage with sqlx for async operations, and owns the
//! one transaction that makes the machine trustworthy: the atomic purchase.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Vendo Data Flow                                 │
//! │                                                                         │
//! │  API handler (buy / deposit / list / summary)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     vendo-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌──────────────┐    │   │
//! │  │   │   Database    │   │  Repositories │   │ PurchaseEngine│   │   │
//! │  │   │   (pool.rs)   │   │ account.rs    │   │  (engine.rs)  │   │   │
//! │  │   │               │   │ product.rs    │   │               │   │   │
//! │  │   │ SqlitePool    │◄──│ purchase.rs   │   │ buy / deposit │   │   │
//! │  │   │ WAL + FKs     │   │ (reads, CRUD) │   │ reset         │   │   │
//! │  │   └───────────────┘   └───────────────┘   └──────────────┘    │   │
//! │  │          ▲                                        │            │   │
//! │  │          └────────────────────────────────────────┘            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (accounts, products, purchase_records)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and store error types
//! - [`repository`] - Repository implementations (account, product, purchase)
//! - [`engine`] - The atomic purchase transaction, deposits, balance reset
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vendo_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/vendo.db")).await?;
//!
//! // Money in, product out
//! db.engine().deposit(&buyer_id, 50).await?;
//! let receipt = db.engine().purchase(&buyer_id, &product_id, 2).await?;
//!
//! // What did I buy, and at what (current) price?
//! let summary = db.purchases().summary_for_buyer(&buyer_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use engine::PurchaseEngine;
pub use error::{DbError, DbResult, StoreError, StoreResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::account::AccountRepository;
pub use repository::product::ProductRepository;
pub use repository::purchase::PurchaseRepository;
