//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Catalog read in stored (name) order - the order the matcher scans
//! - Explicit catalog writes (manual product management)
//! - Delta-based stock updates
//!
//! Stock mutations tied to a sale batch do NOT go through this
//! repository; they happen inside the committer's transaction so the
//! whole batch stays all-or-nothing.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use khata_core::validation::validate_new_product;
use khata_core::{NewProduct, Product, ValidationError};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let catalog = repo.list().await?;
/// let product = repo.get_by_id("uuid-here").await?;
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

    /// Lists the whole catalog in name order.
    ///
    /// This IS the catalog's natural order: the matcher scans the
    /// returned slice front to back and the first hit wins, so the
    /// ordering here is part of matching behavior, not presentation.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, cost_price_paise, selling_price_paise,
                   stock, created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - product found
    /// * `Ok(None)` - product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, cost_price_paise, selling_price_paise,
                   stock, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new catalog product (explicit catalog write).
    ///
    /// Validates the input first (non-blank name, non-negative prices
    /// and stock), then generates the id and timestamps; returns the
    /// stored product. The schema cannot enforce non-negative stock
    /// (the committer relies on transient dips), so this gate is where
    /// the invariant holds for catalog writes.
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        validate_new_product(new)?;

        debug!(name = %new.name, "inserting product");

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            category: new.category.clone(),
            cost_price_paise: new.cost_price_paise,
            selling_price_paise: new.selling_price_paise,
            stock: new.stock,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category, cost_price_paise, selling_price_paise,
                stock, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.cost_price_paise)
        .bind(product.selling_price_paise)
        .bind(product.stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates product stock by a delta (restocking, corrections).
    ///
    /// ## Why a delta, not an absolute value?
    /// `stock = stock + delta` composes with concurrent sales; an
    /// absolute write would overwrite a decrement that landed between
    /// our read and our write.
    ///
    /// A delta that would land below zero is rejected atomically (the
    /// WHERE clause guards the floor in the same statement that
    /// applies the delta), keeping stored stock non-negative.
    pub async fn update_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "updating stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + ?2, updated_at = ?3
            WHERE id = ?1 AND stock + ?2 >= 0
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Either the product is missing or the delta was rejected.
            if self.get_by_id(id).await?.is_none() {
                return Err(DbError::not_found("Product", id));
            }
            return Err(ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }

        Ok(())
    }

    /// Counts catalog products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
