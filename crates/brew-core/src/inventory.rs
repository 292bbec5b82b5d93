//! # Inventory Types
//!
//! The stock-ledger side of the domain: per-product stock levels with alert
//! thresholds, and the append-only movement records that audit every change.
//!
//! ## Status Derivation
//! ```text
//! current_stock <= critical_stock_threshold  →  CRITICAL
//! current_stock <= low_stock_threshold       →  LOW
//! otherwise                                  →  ADEQUATE
//! ```
//!
//! The guarded mutations themselves (atomic check-and-decrement) live in
//! brew-db's inventory repository; this module only holds the types and the
//! pure derivations so they are testable without a database.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Stock Status
// =============================================================================

/// Derived stock level classification, used for reorder alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// At or below the critical threshold.
    Critical,
    /// At or below the low threshold (but above critical).
    Low,
    /// Above both thresholds.
    Adequate,
}

impl StockStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Critical => "Critical stock level",
            StockStatus::Low => "Low stock level",
            StockStatus::Adequate => "Adequate stock level",
        }
    }
}

// =============================================================================
// Movement Type
// =============================================================================

/// The direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    /// Stock received (restock, delivery).
    In,
    /// Stock removed (sale, spoilage).
    Out,
    /// Manual correction after a physical count.
    Adjustment,
}

// =============================================================================
// Inventory Item
// =============================================================================

/// Stock record for a single product.
///
/// One-to-one with an active [`crate::types::Product`]. Never destroyed,
/// only deactivated. `current_stock <= maximum_stock` is a soft target used
/// for reorder math, not an enforced invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryItem {
    pub id: String,
    pub product_id: String,

    pub current_stock: i64,
    pub minimum_stock: i64,
    pub maximum_stock: i64,

    /// Purchase cost per unit, for margin reporting.
    pub cost_price_cents: Option<i64>,

    pub expiration_date: Option<NaiveDate>,
    pub supplier: Option<String>,

    /// Shelf location, kept as plain text for staff guidance.
    pub location: Option<String>,

    pub last_restocked: Option<NaiveDate>,

    pub low_stock_threshold: i64,
    pub critical_stock_threshold: i64,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Default low-stock threshold for new items.
    pub const DEFAULT_LOW_THRESHOLD: i64 = 10;
    /// Default critical-stock threshold for new items.
    pub const DEFAULT_CRITICAL_THRESHOLD: i64 = 5;

    /// Creates a new active inventory record with default thresholds.
    pub fn new(product_id: impl Into<String>, current_stock: i64, minimum_stock: i64) -> Self {
        let now = Utc::now();
        InventoryItem {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            current_stock,
            minimum_stock,
            maximum_stock: 1000,
            cost_price_cents: None,
            expiration_date: None,
            supplier: None,
            location: None,
            last_restocked: None,
            low_stock_threshold: Self::DEFAULT_LOW_THRESHOLD,
            critical_stock_threshold: Self::DEFAULT_CRITICAL_THRESHOLD,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Derives the stock status from the current level and thresholds.
    pub fn stock_status(&self) -> StockStatus {
        if self.current_stock <= self.critical_stock_threshold {
            StockStatus::Critical
        } else if self.current_stock <= self.low_stock_threshold {
            StockStatus::Low
        } else {
            StockStatus::Adequate
        }
    }

    /// Checks whether the item is past its expiration date.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        matches!(self.expiration_date, Some(exp) if exp < today)
    }

    /// Checks whether the item expires within the next 7 days.
    pub fn is_expiring_soon(&self, today: NaiveDate) -> bool {
        match self.expiration_date {
            Some(exp) => exp > today && exp < today + Duration::days(7),
            None => false,
        }
    }

    /// Units needed to bring stock back to the maximum level.
    ///
    /// May be negative when overstocked; callers clamp to zero before
    /// placing an order.
    #[inline]
    pub fn reorder_quantity(&self) -> i64 {
        self.maximum_stock - self.current_stock
    }

    /// Returns the cost price as Money, if recorded.
    pub fn cost_price(&self) -> Option<Money> {
        self.cost_price_cents.map(Money::from_cents)
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// An immutable audit record of one quantity change.
///
/// Append-only: movements are inserted alongside the stock mutation and
/// never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: String,
    pub inventory_item_id: String,
    pub movement_type: MovementType,

    /// Signed quantity: positive units moved in the stated direction.
    pub quantity: i64,

    pub reason: Option<String>,

    /// The acting user, when known.
    pub user_id: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// Builds a movement record for an item.
    pub fn new(
        inventory_item_id: impl Into<String>,
        movement_type: MovementType,
        quantity: i64,
        reason: Option<String>,
        user_id: Option<String>,
    ) -> Self {
        StockMovement {
            id: Uuid::new_v4().to_string(),
            inventory_item_id: inventory_item_id.into(),
            movement_type,
            quantity,
            reason,
            user_id,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
