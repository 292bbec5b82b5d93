//! # Sale Repository
//!
//! Persistence for finalized sales and their line items.
//!
//! Sales are append-only: a finalized sale is inserted once, with its items,
//! in a single transaction, and afterwards only the void flag can change.
//! Voided sales retain their data and are excluded from active reporting.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use brew_core::{Sale, SaleItem};

const SALE_COLUMNS: &str = "id, transaction_number, subtotal_cents, tax_cents, discount_cents, \
     total_cents, payment_method, customer_info, cashier_id, notes, is_voided, \
     sale_date, created_at, updated_at";

const SALE_ITEM_COLUMNS: &str =
    "id, sale_id, product_id, name_snapshot, quantity, unit_price_cents, \
     total_price_cents, created_at";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a finalized sale together with its items, atomically.
    pub async fn insert_sale(&self, sale: &Sale, items: &[SaleItem]) -> DbResult<()> {
        debug!(id = %sale.id, transaction_number = %sale.transaction_number, "Inserting sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, transaction_number, subtotal_cents, tax_cents, discount_cents,
                total_cents, payment_method, customer_info, cashier_id, notes,
                is_voided, sale_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.transaction_number)
        .bind(sale.subtotal_cents)
        .bind(sale.tax_cents)
        .bind(sale.discount_cents)
        .bind(sale.total_cents)
        .bind(sale.payment_method)
        .bind(&sale.customer_info)
        .bind(&sale.cashier_id)
        .bind(&sale.notes)
        .bind(sale.is_voided)
        .bind(sale.sale_date)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, product_id, name_snapshot, quantity,
                    unit_price_cents, total_price_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.product_id)
            .bind(&item.name_snapshot)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.total_price_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %sale.id, total_cents = %sale.total_cents, items = items.len(), "Sale recorded");
        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets a sale by its transaction number.
    pub async fn get_by_transaction_number(&self, number: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE transaction_number = ?1"
        ))
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all items for a sale, in the order they were rung up.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(&format!(
            r#"
            SELECT {SALE_ITEM_COLUMNS}
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY rowid
            "#
        ))
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists recent sales, newest first.
    ///
    /// Voided sales are excluded unless `include_voided` is set; they stay
    /// queryable by ID either way.
    pub async fn list_recent(&self, limit: u32, include_voided: bool) -> DbResult<Vec<Sale>> {
        let sql = if include_voided {
            format!("SELECT {SALE_COLUMNS} FROM sales ORDER BY sale_date DESC LIMIT ?1")
        } else {
            format!(
                "SELECT {SALE_COLUMNS} FROM sales WHERE is_voided = 0 \
                 ORDER BY sale_date DESC LIMIT ?1"
            )
        };

        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Marks a sale voided.
    ///
    /// The sale keeps its data and items. Inventory deducted at checkout is
    /// NOT reversed; reconciliation is a manual `adjust_stock` if wanted.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no such sale, or it is already voided
    pub async fn void_sale(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Voiding sale");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE sales SET is_voided = 1, updated_at = ?2 WHERE id = ?1 AND is_voided = 0",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        info!(id = %id, "Sale voided");
        Ok(())
    }

    /// Counts non-voided sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE is_voided = 0")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
