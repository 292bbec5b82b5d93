//! # Repository Module
//!
//! Database repository implementations for Brew POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                  Repository Pattern Explained                       │
//! │                                                                     │
//! │  The Repository pattern abstracts database access behind a clean    │
//! │  API; SQL is isolated in one place per aggregate.                   │
//! │                                                                     │
//! │  Caller                                                             │
//! │     │  db.inventory().remove_stock(id, 3, "sale", None)             │
//! │     ▼                                                               │
//! │  InventoryRepository                                                │
//! │     │  guarded UPDATE + movement INSERT (one transaction)           │
//! │     ▼                                                               │
//! │  SQLite Database                                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product catalog CRUD and search
//! - [`inventory::InventoryRepository`] - Stock ledger and movement audit
//! - [`sale::SaleRepository`] - Sale persistence and voiding
//! - [`user::UserRepository`] - User directory and authentication

pub mod inventory;
pub mod product;
pub mod sale;
pub mod user;
