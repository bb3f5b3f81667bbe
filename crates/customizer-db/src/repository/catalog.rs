//! # Catalog Repository
//!
//! Minimal product/variant access: the engine only needs enough catalog to
//! verify that a submitted product and variant exist, are active, and belong
//! to the cart's store. Catalog management itself lives elsewhere.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;

/// A product row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRecord {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product variant row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VariantRecord {
    pub id: String,
    pub product_id: String,
    pub sku: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for catalog lookups.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Gets an active product scoped to a store.
    ///
    /// Store scoping in the query (not after the fact) means a product id
    /// from another store behaves exactly like a missing product.
    pub async fn get_product(
        &self,
        store_id: &str,
        product_id: &str,
    ) -> DbResult<Option<ProductRecord>> {
        let product: Option<ProductRecord> = sqlx::query_as(
            r#"
            SELECT id, store_id, name, is_active, created_at, updated_at
            FROM products
            WHERE id = ?1 AND store_id = ?2 AND is_active = 1
            "#,
        )
        .bind(product_id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets an active variant of a product.
    pub async fn get_variant(
        &self,
        product_id: &str,
        variant_id: &str,
    ) -> DbResult<Option<VariantRecord>> {
        let variant: Option<VariantRecord> = sqlx::query_as(
            r#"
            SELECT id, product_id, sku, is_active, created_at, updated_at
            FROM product_variants
            WHERE id = ?1 AND product_id = ?2 AND is_active = 1
            "#,
        )
        .bind(variant_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(variant)
    }

    /// Inserts a product (seeding / tests).
    pub async fn insert_product(&self, store_id: &str, name: &str) -> DbResult<ProductRecord> {
        let now = Utc::now();
        let product = ProductRecord {
            id: Uuid::new_v4().to_string(),
            store_id: store_id.to_string(),
            name: name.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (id, store_id, name, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&product.id)
        .bind(&product.store_id)
        .bind(&product.name)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a variant (seeding / tests).
    pub async fn insert_variant(
        &self,
        product_id: &str,
        sku: Option<&str>,
    ) -> DbResult<VariantRecord> {
        let now = Utc::now();
        let variant = VariantRecord {
            id: Uuid::new_v4().to_string(),
            product_id: product_id.to_string(),
            sku: sku.map(str::to_string),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %variant.id, product_id = %product_id, "Inserting variant");

        sqlx::query(
            r#"
            INSERT INTO product_variants (id, product_id, sku, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&variant.id)
        .bind(&variant.product_id)
        .bind(&variant.sku)
        .bind(variant.is_active)
        .bind(variant.created_at)
        .bind(variant.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(variant)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
