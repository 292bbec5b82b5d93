//! # brew-db: Database Layer for Brew POS
//!
//! This crate provides database access for the Brew POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Brew POS Data Flow                           │
//! │                                                                     │
//! │  Caller (frontend command, CLI, test)                               │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                    brew-db (THIS CRATE)                       │  │
//! │  │                                                               │  │
//! │  │  ┌─────────────┐   ┌───────────────┐   ┌──────────────────┐   │  │
//! │  │  │  Database   │   │ Repositories  │   │    Migrations    │   │  │
//! │  │  │  (pool.rs)  │◄──│ product       │   │    (embedded)    │   │  │
//! │  │  │             │   │ inventory     │   │ 001_initial_...  │   │  │
//! │  │  │ SqlitePool  │   │ sale          │   └──────────────────┘   │  │
//! │  │  │ WAL mode    │   │ user          │   ┌──────────────────┐   │  │
//! │  │  └─────────────┘   └───────────────┘   │  auth (argon2)   │   │  │
//! │  │                    ┌───────────────┐   └──────────────────┘   │  │
//! │  │                    │   checkout    │                          │  │
//! │  │                    └───────────────┘                          │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite Database (local file, embedded)                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and cross-layer error types
//! - [`repository`] - Repository implementations per aggregate
//! - [`auth`] - Password hashing and verification
//! - [`checkout`] - Cart → persisted sale orchestration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brew_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/brew.db")).await?;
//!
//! let low = db.inventory().low_stock().await?;
//! let user = db.users().authenticate("maria", "secret").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, StoreError, StoreResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::inventory::InventoryRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::user::UserRepository;
