//! # Inventory Repository
//!
//! The stock ledger: guarded mutation of stock levels plus the append-only
//! movement audit trail.
//!
//! ## The One Real Correctness Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │               Guarded Check-and-Decrement                           │
//! │                                                                     │
//! │  ❌ WRONG: read-then-write (racy)                                   │
//! │     SELECT current_stock ...        ← two callers both see 5        │
//! │     UPDATE ... SET current_stock = 5 - 3                            │
//! │                                                                     │
//! │  ✅ CORRECT: single guarded statement                               │
//! │     UPDATE inventory_items                                          │
//! │     SET current_stock = current_stock - ?                           │
//! │     WHERE id = ? AND current_stock >= ?                             │
//! │                                                                     │
//! │  The sufficiency check and the decrement are one atomic statement;  │
//! │  two concurrent removals can never jointly overdraw stock.          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every successful mutation records a [`StockMovement`] in the same
//! transaction, so the audit trail never disagrees with the levels.

use chrono::{Duration, NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::error::{DbError, DbResult, StoreError, StoreResult};
use brew_core::validation::{validate_quantity, validate_stock_level, validate_thresholds};
use brew_core::{CoreError, InventoryItem, MovementType, StockMovement};

const ITEM_COLUMNS: &str = "id, product_id, current_stock, minimum_stock, maximum_stock, \
     cost_price_cents, expiration_date, supplier, location, last_restocked, \
     low_stock_threshold, critical_stock_threshold, is_active, created_at, updated_at";

const MOVEMENT_COLUMNS: &str =
    "id, inventory_item_id, movement_type, quantity, reason, user_id, created_at";

/// Repository for the inventory ledger.
///
/// ## Usage
/// ```rust,ignore
/// let inv = db.inventory();
///
/// inv.add_stock(&item_id, 50, Some("weekly delivery"), None).await?;
/// inv.remove_stock(&item_id, 3, Some("sale"), Some(&cashier_id)).await?;
/// let alerts = inv.low_stock().await?;
/// ```
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// Inserts a new inventory record.
    ///
    /// Validates stock levels and threshold ordering at write time: a
    /// critical threshold above the low threshold is rejected instead of
    /// silently making the LOW band unreachable.
    pub async fn insert(&self, item: &InventoryItem) -> StoreResult<()> {
        validate_stock_level("current_stock", item.current_stock)?;
        validate_stock_level("minimum_stock", item.minimum_stock)?;
        validate_stock_level("maximum_stock", item.maximum_stock)?;
        validate_thresholds(item.critical_stock_threshold, item.low_stock_threshold)?;

        debug!(id = %item.id, product_id = %item.product_id, "Inserting inventory item");

        sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id, product_id, current_stock, minimum_stock, maximum_stock,
                cost_price_cents, expiration_date, supplier, location,
                last_restocked, low_stock_threshold, critical_stock_threshold,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(&item.id)
        .bind(&item.product_id)
        .bind(item.current_stock)
        .bind(item.minimum_stock)
        .bind(item.maximum_stock)
        .bind(item.cost_price_cents)
        .bind(item.expiration_date)
        .bind(&item.supplier)
        .bind(&item.location)
        .bind(item.last_restocked)
        .bind(item.low_stock_threshold)
        .bind(item.critical_stock_threshold)
        .bind(item.is_active)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(())
    }

    /// Gets an active inventory item by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = ?1 AND is_active = 1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets an active inventory item by its product ID.
    pub async fn get_by_product(&self, product_id: &str) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE product_id = ?1 AND is_active = 1"
        ))
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists all active inventory items in insertion order.
    pub async fn list(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE is_active = 1 ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Updates an inventory record's descriptive fields and thresholds.
    ///
    /// Threshold ordering is validated here as well; stock level changes
    /// should go through `add_stock`/`remove_stock`/`adjust_stock` so the
    /// audit trail stays complete.
    pub async fn update(&self, item: &InventoryItem) -> StoreResult<()> {
        validate_stock_level("minimum_stock", item.minimum_stock)?;
        validate_stock_level("maximum_stock", item.maximum_stock)?;
        validate_thresholds(item.critical_stock_threshold, item.low_stock_threshold)?;

        debug!(id = %item.id, "Updating inventory item");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE inventory_items SET
                minimum_stock = ?2,
                maximum_stock = ?3,
                cost_price_cents = ?4,
                expiration_date = ?5,
                supplier = ?6,
                location = ?7,
                low_stock_threshold = ?8,
                critical_stock_threshold = ?9,
                updated_at = ?10
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(&item.id)
        .bind(item.minimum_stock)
        .bind(item.maximum_stock)
        .bind(item.cost_price_cents)
        .bind(item.expiration_date)
        .bind(&item.supplier)
        .bind(&item.location)
        .bind(item.low_stock_threshold)
        .bind(item.critical_stock_threshold)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("InventoryItem", &item.id).into());
        }

        Ok(())
    }

    /// Deactivates an inventory record (soft delete).
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating inventory item");

        let now = Utc::now();

        let result =
            sqlx::query("UPDATE inventory_items SET is_active = 0, updated_at = ?2 WHERE id = ?1")
                .bind(id)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("InventoryItem", id));
        }

        Ok(())
    }

    // =========================================================================
    // Stock Mutations
    // =========================================================================

    /// Increases stock and records an IN movement.
    ///
    /// Sets `last_restocked` to today. Always succeeds if the item exists
    /// and is active; quantity must be positive.
    pub async fn add_stock(
        &self,
        item_id: &str,
        quantity: i64,
        reason: Option<&str>,
        user_id: Option<&str>,
    ) -> StoreResult<()> {
        validate_quantity(quantity)?;

        let now = Utc::now();
        let today = now.date_naive();

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let result = sqlx::query(
            r#"
            UPDATE inventory_items
            SET current_stock = current_stock + ?2,
                last_restocked = ?3,
                updated_at = ?4
            WHERE id = ?1 AND is_active = 1
            "#,
        )
        .bind(item_id)
        .bind(quantity)
        .bind(today)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("InventoryItem", item_id).into());
        }

        record_movement(
            &mut tx,
            &StockMovement::new(
                item_id,
                MovementType::In,
                quantity,
                reason.map(str::to_string),
                user_id.map(str::to_string),
            ),
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(item_id = %item_id, quantity = %quantity, "Stock added");
        Ok(())
    }

    /// Decreases stock only if sufficient units are available, recording an
    /// OUT movement on success.
    ///
    /// The sufficiency check and the decrement are one guarded UPDATE, so
    /// concurrent removals cannot jointly overdraw stock. On failure nothing
    /// is mutated and no movement is recorded.
    ///
    /// ## Returns
    /// * `Err(StoreError::Db(NotFound))` - missing or inactive item
    /// * `Err(StoreError::Core(InsufficientStock))` - quantity exceeds stock
    pub async fn remove_stock(
        &self,
        item_id: &str,
        quantity: i64,
        reason: Option<&str>,
        user_id: Option<&str>,
    ) -> StoreResult<()> {
        validate_quantity(quantity)?;

        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let result = sqlx::query(
            r#"
            UPDATE inventory_items
            SET current_stock = current_stock - ?2,
                updated_at = ?3
            WHERE id = ?1 AND is_active = 1 AND current_stock >= ?2
            "#,
        )
        .bind(item_id)
        .bind(quantity)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            // Distinguish a missing item from an insufficient level
            let available: Option<i64> = sqlx::query_scalar(
                "SELECT current_stock FROM inventory_items WHERE id = ?1 AND is_active = 1",
            )
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DbError::from)?;

            return match available {
                Some(available) => Err(StoreError::Core(CoreError::InsufficientStock {
                    item_id: item_id.to_string(),
                    available,
                    requested: quantity,
                })),
                None => Err(DbError::not_found("InventoryItem", item_id).into()),
            };
        }

        record_movement(
            &mut tx,
            &StockMovement::new(
                item_id,
                MovementType::Out,
                quantity,
                reason.map(str::to_string),
                user_id.map(str::to_string),
            ),
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(item_id = %item_id, quantity = %quantity, "Stock removed");
        Ok(())
    }

    /// Applies a signed correction after a physical count, recording an
    /// ADJUSTMENT movement.
    ///
    /// Negative deltas carry the same guard as `remove_stock`: the level
    /// can never be driven below zero.
    pub async fn adjust_stock(
        &self,
        item_id: &str,
        delta: i64,
        reason: Option<&str>,
        user_id: Option<&str>,
    ) -> StoreResult<()> {
        if delta == 0 {
            return Err(brew_core::ValidationError::MustBePositive {
                field: "delta".to_string(),
            }
            .into());
        }

        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let result = sqlx::query(
            r#"
            UPDATE inventory_items
            SET current_stock = current_stock + ?2,
                updated_at = ?3
            WHERE id = ?1 AND is_active = 1 AND current_stock + ?2 >= 0
            "#,
        )
        .bind(item_id)
        .bind(delta)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            let available: Option<i64> = sqlx::query_scalar(
                "SELECT current_stock FROM inventory_items WHERE id = ?1 AND is_active = 1",
            )
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DbError::from)?;

            return match available {
                Some(available) => Err(StoreError::Core(CoreError::InsufficientStock {
                    item_id: item_id.to_string(),
                    available,
                    requested: -delta,
                })),
                None => Err(DbError::not_found("InventoryItem", item_id).into()),
            };
        }

        record_movement(
            &mut tx,
            &StockMovement::new(
                item_id,
                MovementType::Adjustment,
                delta,
                reason.map(str::to_string),
                user_id.map(str::to_string),
            ),
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(item_id = %item_id, delta = %delta, "Stock adjusted");
        Ok(())
    }

    // =========================================================================
    // Alert Queries
    // =========================================================================

    /// Active items at or below their low threshold, lowest stock first
    /// (ties broken by insertion order).
    pub async fn low_stock(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM inventory_items
            WHERE current_stock <= low_stock_threshold AND is_active = 1
            ORDER BY current_stock ASC, rowid ASC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Active items at or below their critical threshold, lowest stock first.
    pub async fn critical_stock(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM inventory_items
            WHERE current_stock <= critical_stock_threshold AND is_active = 1
            ORDER BY current_stock ASC, rowid ASC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Active items holding stock whose expiration date is strictly before
    /// `today`, earliest expiration first.
    pub async fn expired(&self, today: NaiveDate) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM inventory_items
            WHERE expiration_date < ?1 AND is_active = 1 AND current_stock > 0
            ORDER BY expiration_date ASC
            "#
        ))
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Active items holding stock that expire within the next 7 days.
    pub async fn expiring_soon(&self, today: NaiveDate) -> DbResult<Vec<InventoryItem>> {
        let horizon = today + Duration::days(7);

        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM inventory_items
            WHERE expiration_date > ?1 AND expiration_date < ?2
              AND is_active = 1 AND current_stock > 0
            ORDER BY expiration_date ASC
            "#
        ))
        .bind(today)
        .bind(horizon)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    // =========================================================================
    // Audit Trail
    // =========================================================================

    /// Movement history for an item, newest first.
    pub async fn movements(&self, item_id: &str) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(&format!(
            r#"
            SELECT {MOVEMENT_COLUMNS}
            FROM stock_movements
            WHERE inventory_item_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#
        ))
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }
}

/// Appends a movement record within the caller's transaction.
async fn record_movement(
    tx: &mut Transaction<'_, Sqlite>,
    movement: &StockMovement,
) -> StoreResult<()> {
    sqlx::query(
        r#"
        INSERT INTO stock_movements (
            id, inventory_item_id, movement_type, quantity, reason, user_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&movement.id)
    .bind(&movement.inventory_item_id)
    .bind(movement.movement_type)
    .bind(movement.quantity)
    .bind(&movement.reason)
    .bind(&movement.user_id)
    .bind(movement.created_at)
    .execute(&mut **tx)
    .await
    .map_err(DbError::from)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use brew_core::{Money, Product};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Inserts a product + inventory item, returns the item id.
    async fn seeded_item(db: &Database, stock: i64) -> String {
        let product = Product::new("Pearl Sachet", Money::from_cents(1500));
        db.products().insert(&product).await.unwrap();

        let item = InventoryItem::new(&product.id, stock, 10);
        db.inventory().insert(&item).await.unwrap();
        item.id
    }

    #[tokio::test]
    async fn test_insert_and_round_trip() {
        let db = test_db().await;
        let product = Product::new("Tapioca", Money::from_cents(1200));
        db.products().insert(&product).await.unwrap();

        let mut item = InventoryItem::new(&product.id, 40, 10);
        item.cost_price_cents = Some(900);
        item.supplier = Some("Golden Pearl Trading".to_string());
        item.location = Some("Shelf B2".to_string());
        item.expiration_date = NaiveDate::from_ymd_opt(2026, 12, 1);
        db.inventory().insert(&item).await.unwrap();

        let loaded = db.inventory().get_by_id(&item.id).await.unwrap().unwrap();
        assert_eq!(loaded, item);

        let by_product = db
            .inventory()
            .get_by_product(&product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_product.id, item.id);
    }

    #[tokio::test]
    async fn test_inverted_thresholds_rejected_at_write_time() {
        let db = test_db().await;
        let product = Product::new("Syrup", Money::from_cents(2000));
        db.products().insert(&product).await.unwrap();

        let mut item = InventoryItem::new(&product.id, 40, 10);
        item.low_stock_threshold = 10;
        item.critical_stock_threshold = 20; // inverted

        let err = db.inventory().insert(&item).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::Validation(
                brew_core::ValidationError::ThresholdsInverted { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_add_stock_records_movement_and_restock_date() {
        let db = test_db().await;
        let item_id = seeded_item(&db, 10).await;

        db.inventory()
            .add_stock(&item_id, 25, Some("weekly delivery"), None)
            .await
            .unwrap();

        let item = db.inventory().get_by_id(&item_id).await.unwrap().unwrap();
        assert_eq!(item.current_stock, 35);
        assert_eq!(item.last_restocked, Some(Utc::now().date_naive()));

        let movements = db.inventory().movements(&item_id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].movement_type, MovementType::In);
        assert_eq!(movements[0].quantity, 25);
        assert_eq!(movements[0].reason.as_deref(), Some("weekly delivery"));
    }

    #[tokio::test]
    async fn test_add_stock_rejects_non_positive_quantity() {
        let db = test_db().await;
        let item_id = seeded_item(&db, 10).await;

        assert!(db.inventory().add_stock(&item_id, 0, None, None).await.is_err());
        assert!(db.inventory().add_stock(&item_id, -5, None, None).await.is_err());

        // No mutation, no movement
        let item = db.inventory().get_by_id(&item_id).await.unwrap().unwrap();
        assert_eq!(item.current_stock, 10);
        assert!(db.inventory().movements(&item_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_stock_boundary() {
        let db = test_db().await;
        let item_id = seeded_item(&db, 10).await;

        // Removing exactly the current stock succeeds and lands on zero
        db.inventory()
            .remove_stock(&item_id, 10, Some("sale"), None)
            .await
            .unwrap();
        let item = db.inventory().get_by_id(&item_id).await.unwrap().unwrap();
        assert_eq!(item.current_stock, 0);

        // One more unit fails with InsufficientStock and mutates nothing
        let err = db
            .inventory()
            .remove_stock(&item_id, 1, Some("sale"), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientStock {
                available: 0,
                requested: 1,
                ..
            })
        ));

        let item = db.inventory().get_by_id(&item_id).await.unwrap().unwrap();
        assert_eq!(item.current_stock, 0);

        // Only the successful removal left a movement
        let movements = db.inventory().movements(&item_id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].movement_type, MovementType::Out);
    }

    #[tokio::test]
    async fn test_remove_stock_insufficient_reports_available() {
        let db = test_db().await;
        let item_id = seeded_item(&db, 3).await;

        let err = db
            .inventory()
            .remove_stock(&item_id, 5, None, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InsufficientStock {
                available: 3,
                requested: 5,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_remove_stock_missing_item_is_not_found() {
        let db = test_db().await;
        let err = db
            .inventory()
            .remove_stock("no-such-item", 1, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Db(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_adjust_stock_signed() {
        let db = test_db().await;
        let item_id = seeded_item(&db, 10).await;

        db.inventory()
            .adjust_stock(&item_id, -4, Some("spoilage count"), None)
            .await
            .unwrap();
        db.inventory()
            .adjust_stock(&item_id, 2, Some("found in back room"), None)
            .await
            .unwrap();

        let item = db.inventory().get_by_id(&item_id).await.unwrap().unwrap();
        assert_eq!(item.current_stock, 8);

        // Cannot adjust below zero
        assert!(db
            .inventory()
            .adjust_stock(&item_id, -9, None, None)
            .await
            .is_err());

        let movements = db.inventory().movements(&item_id).await.unwrap();
        assert_eq!(movements.len(), 2);
        assert!(movements
            .iter()
            .all(|m| m.movement_type == MovementType::Adjustment));
    }

    #[tokio::test]
    async fn test_status_walkthrough_through_ledger() {
        use brew_core::StockStatus;

        let db = test_db().await;
        let item_id = seeded_item(&db, 100).await; // thresholds 10 / 5

        let status = |item: &InventoryItem| item.stock_status();

        let item = db.inventory().get_by_id(&item_id).await.unwrap().unwrap();
        assert_eq!(status(&item), StockStatus::Adequate);

        db.inventory()
            .remove_stock(&item_id, 91, Some("sale"), None)
            .await
            .unwrap();
        let item = db.inventory().get_by_id(&item_id).await.unwrap().unwrap();
        assert_eq!(item.current_stock, 9);
        assert_eq!(status(&item), StockStatus::Low);

        db.inventory()
            .remove_stock(&item_id, 5, Some("sale"), None)
            .await
            .unwrap();
        let item = db.inventory().get_by_id(&item_id).await.unwrap().unwrap();
        assert_eq!(item.current_stock, 4);
        assert_eq!(status(&item), StockStatus::Critical);
    }

    #[tokio::test]
    async fn test_low_stock_query_ordering_and_idempotence() {
        let db = test_db().await;
        let a = seeded_item(&db, 8).await;
        let b = seeded_item(&db, 3).await;
        let _c = seeded_item(&db, 50).await; // adequate, excluded

        let low = db.inventory().low_stock().await.unwrap();
        let ids: Vec<&str> = low.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec![b.as_str(), a.as_str()]); // ascending by stock

        // Idempotent without mutation
        let again = db.inventory().low_stock().await.unwrap();
        assert_eq!(low, again);

        let critical = db.inventory().critical_stock().await.unwrap();
        let ids: Vec<&str> = critical.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec![b.as_str()]);
    }

    #[tokio::test]
    async fn test_expired_and_expiring_soon() {
        async fn make(db: &Database, today: NaiveDate, days: i64, stock: i64) -> String {
            let product = Product::new(format!("P{days}"), Money::from_cents(1000));
            db.products().insert(&product).await.unwrap();
            let mut item = InventoryItem::new(&product.id, stock, 5);
            item.expiration_date = Some(today + Duration::days(days));
            db.inventory().insert(&item).await.unwrap();
            item.id
        }

        let db = test_db().await;
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();

        let long_gone = make(&db, today, -10, 4).await;
        let yesterday = make(&db, today, -1, 4).await;
        let _empty_expired = make(&db, today, -3, 0).await; // zero stock, excluded
        let soon = make(&db, today, 3, 4).await;
        let _today_exact = make(&db, today, 0, 4).await; // not strictly before today
        let _far_future = make(&db, today, 30, 4).await;

        let expired = db.inventory().expired(today).await.unwrap();
        let ids: Vec<&str> = expired.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec![long_gone.as_str(), yesterday.as_str()]);

        let expiring = db.inventory().expiring_soon(today).await.unwrap();
        let ids: Vec<&str> = expiring.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec![soon.as_str()]);
    }

    #[tokio::test]
    async fn test_deactivated_item_is_invisible() {
        let db = test_db().await;
        let item_id = seeded_item(&db, 2).await;

        db.inventory().deactivate(&item_id).await.unwrap();

        assert!(db.inventory().get_by_id(&item_id).await.unwrap().is_none());
        assert!(db.inventory().low_stock().await.unwrap().is_empty());

        let err = db
            .inventory()
            .add_stock(&item_id, 5, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Db(DbError::NotFound { .. })));
    }
}
