//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - CRUD with soft delete (is_active flag, never physical removal)
//! - Case-insensitive substring search across name/description/barcode
//! - Barcode uniqueness enforced by the UNIQUE index

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult, StoreError, StoreResult};
use brew_core::validation::{
    validate_barcode, validate_price_cents, validate_product_name, validate_search_query,
};
use brew_core::Product;

const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, category, barcode, unit, \
     is_active, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let results = repo.search("milk tea").await?;
/// let product = repo.get_by_barcode("4800016641503").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// Name, price, and barcode formats are validated before the statement
    /// runs; barcode uniqueness is the database's UNIQUE index.
    ///
    /// ## Returns
    /// * `Err(StoreError::Db(UniqueViolation))` - barcode already exists
    pub async fn insert(&self, product: &Product) -> StoreResult<()> {
        validate_product_name(&product.name)?;
        validate_price_cents(product.price_cents)?;
        if let Some(barcode) = &product.barcode {
            validate_barcode(barcode)?;
        }

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, category, barcode, unit,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.category)
        .bind(&product.barcode)
        .bind(&product.unit)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by its ID (active or not).
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets an active product by its barcode.
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1 AND is_active = 1"
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists products, sorted by name.
    ///
    /// ## Arguments
    /// * `active_only` - when true (the normal case), soft-deleted products
    ///   are filtered out
    pub async fn list(&self, active_only: bool) -> DbResult<Vec<Product>> {
        let sql = if active_only {
            format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1 ORDER BY name")
        } else {
            format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name")
        };

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Searches active products by case-insensitive substring match
    /// across name, description, and barcode.
    ///
    /// An empty query returns the full active listing.
    pub async fn search(&self, query: &str) -> StoreResult<Vec<Product>> {
        let query = validate_search_query(query)?;

        debug!(query = %query, "Searching products");

        if query.is_empty() {
            return Ok(self.list(true).await?);
        }

        // SQLite LIKE is case-insensitive for ASCII by default
        let pattern = format!("%{}%", query);

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE (name LIKE ?1 OR description LIKE ?1 OR barcode LIKE ?1)
              AND is_active = 1
            ORDER BY name
            "#
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists active products in a category, sorted by name.
    pub async fn by_category(&self, category: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE category = ?1 AND is_active = 1
            ORDER BY name
            "#
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists the distinct categories of active products.
    pub async fn categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT category
            FROM products
            WHERE is_active = 1 AND category IS NOT NULL
            ORDER BY category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Updates an existing product.
    ///
    /// ## Returns
    /// * `Err(StoreError::Db(NotFound))` - product doesn't exist
    pub async fn update(&self, product: &Product) -> StoreResult<()> {
        validate_product_name(&product.name)?;
        validate_price_cents(product.price_cents)?;
        if let Some(barcode) = &product.barcode {
            validate_barcode(barcode)?;
        }

        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                price_cents = ?4,
                category = ?5,
                barcode = ?6,
                unit = ?7,
                is_active = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.category)
        .bind(&product.barcode)
        .bind(&product.unit)
        .bind(product.is_active)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id).into());
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// Historical sales still reference this product; it can be restored
    /// by an update, and queries skip it by default.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result =
            sqlx::query("UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1")
                .bind(id)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use brew_core::Money;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sample_product(name: &str, barcode: Option<&str>) -> Product {
        let mut p = Product::new(name, Money::from_cents(4500));
        p.description = Some(format!("{} description", name));
        p.category = Some("Milk Tea".to_string());
        p.barcode = barcode.map(str::to_string);
        p
    }

    #[tokio::test]
    async fn test_insert_and_round_trip() {
        let db = test_db().await;
        let product = sample_product("Classic Milk Tea", Some("4800016641503"));

        db.products().insert(&product).await.unwrap();

        let loaded = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded, product);
    }

    #[tokio::test]
    async fn test_duplicate_barcode_rejected() {
        let db = test_db().await;
        db.products()
            .insert(&sample_product("A", Some("123")))
            .await
            .unwrap();

        let err = db
            .products()
            .insert(&sample_product("B", Some("123")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Db(DbError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_insert_validates_fields() {
        let db = test_db().await;

        let mut bad_name = sample_product("ok", None);
        bad_name.name = "  ".to_string();
        assert!(matches!(
            db.products().insert(&bad_name).await.unwrap_err(),
            StoreError::Core(_)
        ));

        let mut bad_price = sample_product("ok", None);
        bad_price.price_cents = -100;
        assert!(db.products().insert(&bad_price).await.is_err());

        let bad_barcode = sample_product("ok", Some("not a barcode!"));
        assert!(db.products().insert(&bad_barcode).await.is_err());

        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let db = test_db().await;
        db.products()
            .insert(&sample_product("Wintermelon Milk Tea", None))
            .await
            .unwrap();
        db.products()
            .insert(&sample_product("Iced Coffee", None))
            .await
            .unwrap();

        let hits = db.products().search("WINTERMELON").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Wintermelon Milk Tea");

        // Substring inside description matches too
        let hits = db.products().search("iced coffee desc").await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_queries() {
        let db = test_db().await;
        let product = sample_product("Brown Sugar Boba", Some("999"));
        db.products().insert(&product).await.unwrap();

        db.products().soft_delete(&product.id).await.unwrap();

        // Hidden from active listing, search, and barcode lookup
        assert!(db.products().list(true).await.unwrap().is_empty());
        assert!(db.products().search("boba").await.unwrap().is_empty());
        assert!(db
            .products()
            .get_by_barcode("999")
            .await
            .unwrap()
            .is_none());

        // Still physically present
        assert_eq!(db.products().list(false).await.unwrap().len(), 1);
        let loaded = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert!(!loaded.is_active);
    }

    #[tokio::test]
    async fn test_categories_listing() {
        let db = test_db().await;
        let mut a = sample_product("A", None);
        a.category = Some("Coffee".to_string());
        let mut b = sample_product("B", None);
        b.category = Some("Milk Tea".to_string());
        let mut c = sample_product("C", None);
        c.category = Some("Coffee".to_string());

        for p in [&a, &b, &c] {
            db.products().insert(p).await.unwrap();
        }

        let cats = db.products().categories().await.unwrap();
        assert_eq!(cats, vec!["Coffee".to_string(), "Milk Tea".to_string()]);

        let coffee = db.products().by_category("Coffee").await.unwrap();
        assert_eq!(coffee.len(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let db = test_db().await;
        let ghost = sample_product("Ghost", None);
        let err = db.products().update(&ghost).await.unwrap_err();
        assert!(matches!(err, StoreError::Db(DbError::NotFound { .. })));
    }
}
