//! # Repository Module
//!
//! Database repository implementations for Vendo.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  API layer / engine                                                    │
//! │       │                                                                 │
//! │       │  db.products().list_available(1)                               │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── create(&self, owner_id, new)                                      │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── list_available(&self, page)                                       │
//! │  └── update(&self, id, patch)                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  The one operation that spans repositories - the purchase - does NOT   │
//! │  live here; it is the engine's transaction (see crate::engine).        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`account::AccountRepository`] - Account CRUD
//! - [`product::ProductRepository`] - Product CRUD and availability listing
//! - [`purchase::PurchaseRepository`] - Ledger reads and the summary projector

pub mod account;
pub mod product;
pub mod purchase;
