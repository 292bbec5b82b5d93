//! # brew-core: Pure Business Logic for Brew POS
//!
//! This crate is the **heart** of Brew POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Brew POS Architecture                         │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                 Frontend (external, out of scope)             │  │
//! │  └───────────────────────────────┬───────────────────────────────┘  │
//! │                                  │                                  │
//! │  ┌───────────────────────────────▼───────────────────────────────┐  │
//! │  │                ★ brew-core (THIS CRATE) ★                     │  │
//! │  │                                                               │  │
//! │  │  ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌───────┐ ┌─────────┐  │  │
//! │  │  │  money  │ │  types  │ │ inventory │ │ cart  │ │  users  │  │  │
//! │  │  │  Money  │ │ Product │ │ ItemTypes │ │ Cart  │ │  Roles  │  │  │
//! │  │  │ TaxCalc │ │  Sale   │ │  Status   │ │ Lines │ │  Perms  │  │  │
//! │  │  └─────────┘ └─────────┘ └───────────┘ └───────┘ └─────────┘  │  │
//! │  │                                                               │  │
//! │  │  NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │  │
//! │  └───────────────────────────────┬───────────────────────────────┘  │
//! │                                  │                                  │
//! │  ┌───────────────────────────────▼───────────────────────────────┐  │
//! │  │                  brew-db (Database Layer)                     │  │
//! │  │        SQLite queries, migrations, repositories, auth         │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog and sale types (Product, Sale, SaleItem, TaxRate)
//! - [`inventory`] - Stock types and derivations (InventoryItem, movements)
//! - [`users`] - Users, roles, permission rules
//! - [`cart`] - Open-sale builder with consistent totals
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod inventory;
pub mod money;
pub mod types;
pub mod users;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use brew_core::Money` instead of
// `use brew_core::money::Money`

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::{InventoryItem, MovementType, StockMovement, StockStatus};
pub use money::Money;
pub use types::{PaymentMethod, Product, Sale, SaleItem, TaxRate};
pub use users::{Action, Role, User};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tax rate in basis points (12% VAT).
///
/// The shop applies one fixed rate at the register; per-product rates would
/// go on `Product` if that ever changes.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1200;

/// Maximum distinct lines allowed in a single cart.
///
/// Prevents runaway carts and keeps transaction sizes reasonable.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in a cart.
///
/// Prevents accidental over-ordering (e.g. typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
