//! # Cart Module
//!
//! Builds a single sale transaction and keeps its totals consistent at
//! every observation point.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Cart → Sale Lifecycle                         │
//! │                                                                     │
//! │  Cart::new()                                                        │
//! │      │                                                              │
//! │      ├── add_item(product, qty)     merges by product identity      │
//! │      ├── decrement_item(id)         qty-1, removes at zero          │
//! │      ├── remove_item(id)            drops the whole line            │
//! │      ├── set_tax_rate(rate)         tax = subtotal × rate           │
//! │      ├── apply_discount(amount)                                     │
//! │      │                                                              │
//! │      ▼                                                              │
//! │  finalize(payment, cashier) ──► (Sale, Vec<SaleItem>)               │
//! │                                                                     │
//! │  finalize() consumes the cart: a finalized sale cannot be mutated   │
//! │  again through this API (closed state by construction).             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! `total = subtotal + tax - discount` with
//! `subtotal = Σ(line.quantity × line.unit_price)`, recomputed
//! synchronously on every read — there is no cached total to go stale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{PaymentMethod, Product, Sale, SaleItem, TaxRate};
use crate::validation::validate_quantity;
use crate::{DEFAULT_TAX_RATE_BPS, MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One line of an open sale.
///
/// The price is frozen when the product is first added: if the catalog price
/// changes while the cart is open, this line keeps the original price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (UUID).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity in cart, always >= 1.
    pub quantity: i64,

    /// When this line was first added.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// An open sale transaction.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product again
///   increments that line's quantity, never duplicates the line)
/// - Quantity per line is 1..=MAX_ITEM_QUANTITY
/// - Maximum distinct lines: MAX_CART_ITEMS
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,

    /// Tax rate applied to the subtotal. Defaults to the shop's fixed 12%.
    pub tax_rate: TaxRate,

    /// Flat discount amount in cents.
    pub discount_cents: i64,

    /// When the cart was opened.
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart with the default tax rate.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            tax_rate: TaxRate::from_bps(DEFAULT_TAX_RATE_BPS),
            discount_cents: 0,
            created_at: Utc::now(),
        }
    }

    /// Adds a product to the cart, or increments its line if already present.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.id)
        {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Decrements a line by one; removes the line when it reaches zero.
    pub fn decrement_item(&mut self, product_id: &str) -> CoreResult<()> {
        let Some(pos) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return Err(CoreError::ItemNotInCart {
                product_id: product_id.to_string(),
            });
        };

        if self.lines[pos].quantity > 1 {
            self.lines[pos].quantity -= 1;
        } else {
            self.lines.remove(pos);
        }
        Ok(())
    }

    /// Removes a whole line from the cart by product ID.
    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == initial_len {
            return Err(CoreError::ItemNotInCart {
                product_id: product_id.to_string(),
            });
        }
        Ok(())
    }

    /// Replaces the tax rate. Tax is derived, so totals update immediately.
    pub fn set_tax_rate(&mut self, rate: TaxRate) {
        self.tax_rate = rate;
    }

    /// Applies a flat discount amount.
    pub fn apply_discount(&mut self, discount: Money) -> CoreResult<()> {
        if discount.is_negative() {
            return Err(crate::error::ValidationError::MustBePositive {
                field: "discount".to_string(),
            }
            .into());
        }
        self.discount_cents = discount.cents();
        Ok(())
    }

    /// Clears all lines and resets the discount.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.discount_cents = 0;
        self.created_at = Utc::now();
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Subtotal: Σ(quantity × unit price).
    pub fn subtotal_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.line_total_cents()).sum()
    }

    /// Tax on the subtotal at the cart's rate.
    pub fn tax_cents(&self) -> i64 {
        Money::from_cents(self.subtotal_cents())
            .calculate_tax(self.tax_rate)
            .cents()
    }

    /// Grand total: subtotal + tax − discount.
    pub fn total_cents(&self) -> i64 {
        self.subtotal_cents() + self.tax_cents() - self.discount_cents
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Finalizes the cart into an immutable [`Sale`] and its items.
    ///
    /// Consumes the cart: once finalized, no further mutation is possible
    /// through this value. Fails with [`CoreError::EmptyCart`] when there
    /// are no lines.
    pub fn finalize(
        self,
        payment_method: PaymentMethod,
        cashier_id: Option<String>,
    ) -> CoreResult<(Sale, Vec<SaleItem>)> {
        if self.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let sale_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let sale = Sale {
            id: sale_id.clone(),
            transaction_number: generate_transaction_number(),
            subtotal_cents: self.subtotal_cents(),
            tax_cents: self.tax_cents(),
            discount_cents: self.discount_cents,
            total_cents: self.total_cents(),
            payment_method: Some(payment_method),
            customer_info: None,
            cashier_id,
            notes: None,
            is_voided: false,
            sale_date: now,
            created_at: now,
            updated_at: now,
        };

        let items = self
            .lines
            .into_iter()
            .map(|line| SaleItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale_id.clone(),
                product_id: line.product_id,
                name_snapshot: line.name,
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                total_price_cents: line.unit_price_cents * line.quantity,
                created_at: now,
            })
            .collect();

        Ok((sale, items))
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates a collision-resistant transaction number.
///
/// Replaces the original wall-clock-milliseconds scheme, whose uniqueness
/// was only probabilistic.
fn generate_transaction_number() -> String {
    format!("TXN-{}", Uuid::new_v4().simple())
}

// =============================================================================
// Unit Tests
// =============================================================================
