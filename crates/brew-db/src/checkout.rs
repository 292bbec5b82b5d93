//! # Checkout
//!
//! Turns an open cart into a persisted sale and deducts stock.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Checkout Flow                                │
//! │                                                                     │
//! │  Cart (open, in memory)                                             │
//! │      │                                                              │
//! │      ▼  finalize(payment, cashier)     EmptyCart? → error           │
//! │  (Sale, Vec<SaleItem>)                                              │
//! │      │                                                              │
//! │      ▼  per line: guarded remove_stock   Insufficient? → error      │
//! │  inventory levels deducted + OUT movements recorded                 │
//! │      │                                                              │
//! │      ▼  insert_sale (one transaction)                               │
//! │  sale + items persisted                                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each stock deduction is its own guarded statement; there is no
//! cross-entity transaction wrapping the whole checkout. A removal that
//! fails mid-cart leaves earlier deductions in place and the sale
//! unpersisted — the caller surfaces the error and the cashier re-rings.
//! Products without an inventory record are sold without stock tracking.

use tracing::{info, warn};

use crate::error::StoreResult;
use crate::pool::Database;
use brew_core::{Cart, PaymentMethod, Sale};

/// Finalizes `cart` into a sale, deducts stock, and persists the result.
///
/// ## Arguments
/// * `cashier_id` - the authenticated cashier, recorded on the sale and on
///   every OUT movement
///
/// ## Errors
/// * `CoreError::EmptyCart` - no lines to sell
/// * `CoreError::InsufficientStock` - a tracked line exceeds available stock
/// * `DbError::*` - persistence failure
pub async fn checkout(
    db: &Database,
    cart: Cart,
    payment_method: PaymentMethod,
    cashier_id: Option<String>,
) -> StoreResult<Sale> {
    let (sale, items) = cart.finalize(payment_method, cashier_id.clone())?;

    let inventory = db.inventory();
    for item in &items {
        match inventory.get_by_product(&item.product_id).await? {
            Some(inv) => {
                inventory
                    .remove_stock(&inv.id, item.quantity, Some("sale"), cashier_id.as_deref())
                    .await?;
            }
            None => {
                // Untracked product (e.g. made-to-order drink)
                warn!(product_id = %item.product_id, "No inventory record; selling untracked");
            }
        }
    }

    db.sales().insert_sale(&sale, &items).await?;

    info!(
        sale_id = %sale.id,
        transaction_number = %sale.transaction_number,
        total_cents = %sale.total_cents,
        lines = items.len(),
        "Checkout complete"
    );

    Ok(sale)
}

/// Voids a previously persisted sale.
///
/// Inventory deducted at checkout is NOT reversed automatically; if the
/// drinks went back on the shelf, staff records a manual adjustment.
pub async fn void_sale(db: &Database, sale_id: &str) -> StoreResult<Sale> {
    db.sales().void_sale(sale_id).await?;

    let sale = db
        .sales()
        .get_by_id(sale_id)
        .await?
        .ok_or_else(|| crate::error::DbError::not_found("Sale", sale_id))?;

    Ok(sale)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::pool::{Database, DbConfig};
    use brew_core::{CoreError, InventoryItem, Money, Product};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn tracked_product(db: &Database, name: &str, price_cents: i64, stock: i64) -> Product {
        let product = Product::new(name, Money::from_cents(price_cents));
        db.products().insert(&product).await.unwrap();
        let item = InventoryItem::new(&product.id, stock, 5);
        db.inventory().insert(&item).await.unwrap();
        product
    }

    #[tokio::test]
    async fn test_checkout_persists_sale_and_deducts_stock() {
        let db = test_db().await;
        let cashier = db
            .users()
            .create("ana", "pw", "Ana", "Santos", brew_core::Role::Staff)
            .await
            .unwrap();
        let a = tracked_product(&db, "Classic Milk Tea", 4500, 20).await;
        let b = tracked_product(&db, "Taro Milk Tea", 5500, 20).await;

        let mut cart = Cart::new();
        cart.add_item(&a, 2).unwrap();
        cart.add_item(&b, 1).unwrap();

        let sale = checkout(&db, cart, PaymentMethod::Cash, Some(cashier.id.clone()))
            .await
            .unwrap();

        assert_eq!(sale.subtotal_cents, 14500);
        assert_eq!(sale.tax_cents, 1740);
        assert_eq!(sale.total_cents, 16240);
        assert!(sale.totals_consistent());

        // Persisted with items
        let loaded = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(loaded, sale);
        assert_eq!(db.sales().get_items(&sale.id).await.unwrap().len(), 2);

        // Stock deducted, with OUT movements attributed to the cashier
        let inv_a = db.inventory().get_by_product(&a.id).await.unwrap().unwrap();
        assert_eq!(inv_a.current_stock, 18);
        let inv_b = db.inventory().get_by_product(&b.id).await.unwrap().unwrap();
        assert_eq!(inv_b.current_stock, 19);

        let movements = db.inventory().movements(&inv_a.id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].reason.as_deref(), Some("sale"));
        assert_eq!(movements[0].user_id.as_deref(), Some(cashier.id.as_str()));
        assert_eq!(sale.cashier_id.as_deref(), Some(cashier.id.as_str()));
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_fails() {
        let db = test_db().await;
        let err = checkout(&db, Cart::new(), PaymentMethod::Cash, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::EmptyCart)));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_checkout_insufficient_stock_leaves_sale_unpersisted() {
        let db = test_db().await;
        let a = tracked_product(&db, "Classic Milk Tea", 4500, 1).await;

        let mut cart = Cart::new();
        cart.add_item(&a, 3).unwrap();

        let err = checkout(&db, cart, PaymentMethod::Cash, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientStock { .. })
        ));

        // No sale recorded, stock untouched
        assert_eq!(db.sales().count().await.unwrap(), 0);
        let inv = db.inventory().get_by_product(&a.id).await.unwrap().unwrap();
        assert_eq!(inv.current_stock, 1);
    }

    #[tokio::test]
    async fn test_checkout_untracked_product_sells_without_deduction() {
        let db = test_db().await;
        let product = Product::new("Custom Blend", Money::from_cents(6000));
        db.products().insert(&product).await.unwrap();

        let mut cart = Cart::new();
        cart.add_item(&product, 1).unwrap();

        let sale = checkout(&db, cart, PaymentMethod::MobileWallet, None)
            .await
            .unwrap();
        assert_eq!(db.sales().count().await.unwrap(), 1);
        assert!(sale.totals_consistent());
    }

    #[tokio::test]
    async fn test_void_does_not_restore_stock() {
        let db = test_db().await;
        let a = tracked_product(&db, "Classic Milk Tea", 4500, 10).await;

        let mut cart = Cart::new();
        cart.add_item(&a, 4).unwrap();
        let sale = checkout(&db, cart, PaymentMethod::Card, None).await.unwrap();

        let voided = void_sale(&db, &sale.id).await.unwrap();
        assert!(voided.is_voided);

        // Deduction stands; reconciliation is a manual adjustment
        let inv = db.inventory().get_by_product(&a.id).await.unwrap().unwrap();
        assert_eq!(inv.current_stock, 6);
    }
}
