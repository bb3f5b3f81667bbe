//! # Cart Repository
//!
//! Carts, cart items, and the atomic attach transaction.
//!
//! ## Attach Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    attach_item (single transaction)                     │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├─► INSERT design           (immutable audit record)                 │
//! │    ├─► INSERT customization    (status = in_cart)                       │
//! │    ├─► INSERT cart_item        (frozen pricing snapshot + line total)   │
//! │    ├─► SELECT SUM(line_total_cents) over the cart's items               │
//! │    ├─► UPDATE carts SET total_cents = sum                               │
//! │    └─► SELECT the updated cart row + its item list                      │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure rolls everything back: no orphan designs or               │
//! │  customizations can exist without their cart item. SQLite's            │
//! │  single-writer lock serializes concurrent attaches against the same    │
//! │  cart, so the recomputed total always reflects every committed item.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart total is always recomputed from the persisted items inside the
//! same transaction, never read-modify-written from a value fetched earlier.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use customizer_core::CustomizationStatus;

// =============================================================================
// Records
// =============================================================================

/// A cart row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartRecord {
    pub id: String,
    pub store_id: String,
    pub token: String,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line item. `pricing_snapshot` and `decoration_locations` are JSON
/// columns, stored verbatim as frozen at attach time.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartItemRecord {
    pub id: String,
    pub cart_id: String,
    pub customization_id: String,
    pub design_id: String,
    pub preview_file_id: String,
    pub pricing_snapshot: String,
    pub quantity: i64,
    pub decoration_locations: String,
    pub line_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Attach Input
// =============================================================================

/// A new immutable design record.
#[derive(Debug, Clone)]
pub struct NewDesign {
    pub id: String,
    pub store_id: String,
    pub owner_id: String,
    /// Normalized customization JSON.
    pub content: String,
}

/// A new customization record.
#[derive(Debug, Clone)]
pub struct NewCustomization {
    pub id: String,
    pub store_id: String,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub profile_id: String,
    pub design_id: String,
    pub preview_file_id: String,
    /// Normalized customization JSON.
    pub payload: String,
    /// Evaluator pricing snapshot JSON, verbatim.
    pub pricing_snapshot: String,
    pub status: CustomizationStatus,
}

/// A new cart line item.
#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub id: String,
    pub customization_id: String,
    pub design_id: String,
    pub preview_file_id: String,
    pub pricing_snapshot: String,
    pub quantity: i64,
    /// JSON array of decoration location keys.
    pub decoration_locations: String,
    pub line_total_cents: i64,
}

/// Everything the attach transaction persists, built by the caller before
/// the transaction opens so the write path holds the lock only for SQL.
#[derive(Debug, Clone)]
pub struct CartAttachment {
    pub design: NewDesign,
    pub customization: NewCustomization,
    pub item: NewCartItem,
}

/// The cart and its item list as they stood at commit time.
///
/// Both are read inside the attach transaction, so the total always equals
/// the sum of the returned items even under concurrent attaches.
#[derive(Debug, Clone)]
pub struct AttachedCart {
    pub cart: CartRecord,
    pub items: Vec<CartItemRecord>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for cart operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Creates an empty cart for a store.
    pub async fn create(&self, store_id: &str, token: &str) -> DbResult<CartRecord> {
        let now = Utc::now();
        let cart = CartRecord {
            id: Uuid::new_v4().to_string(),
            store_id: store_id.to_string(),
            token: token.to_string(),
            total_cents: 0,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %cart.id, store_id = %store_id, "Creating cart");

        sqlx::query(
            r#"
            INSERT INTO carts (id, store_id, token, total_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&cart.id)
        .bind(&cart.store_id)
        .bind(&cart.token)
        .bind(cart.total_cents)
        .bind(cart.created_at)
        .bind(cart.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(cart)
    }

    /// Gets a cart by its shopper-facing token.
    pub async fn get_by_token(&self, token: &str) -> DbResult<Option<CartRecord>> {
        let cart: Option<CartRecord> = sqlx::query_as(
            r#"
            SELECT id, store_id, token, total_cents, created_at, updated_at
            FROM carts
            WHERE token = ?1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cart)
    }

    /// Gets a cart by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<CartRecord>> {
        let cart: Option<CartRecord> = sqlx::query_as(
            r#"
            SELECT id, store_id, token, total_cents, created_at, updated_at
            FROM carts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cart)
    }

    /// Lists a cart's items in insertion order.
    pub async fn list_items(&self, cart_id: &str) -> DbResult<Vec<CartItemRecord>> {
        let items: Vec<CartItemRecord> = sqlx::query_as(
            r#"
            SELECT id, cart_id, customization_id, design_id, preview_file_id,
                   pricing_snapshot, quantity, decoration_locations,
                   line_total_cents, created_at
            FROM cart_items
            WHERE cart_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Atomically attaches a customized item to a cart.
    ///
    /// Inserts the design, customization, and cart item, then recomputes
    /// the cart total from the persisted items — all in one transaction.
    /// Returns the updated cart and its item list as read inside that
    /// transaction. On any failure nothing is persisted.
    pub async fn attach_item(
        &self,
        cart_id: &str,
        attachment: &CartAttachment,
    ) -> DbResult<AttachedCart> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        insert_design(&mut tx, &attachment.design).await?;
        insert_customization(&mut tx, &attachment.customization).await?;
        insert_cart_item(&mut tx, cart_id, &attachment.item).await?;

        // Recompute from what is actually persisted, inside the same
        // transaction as the inserts.
        let total_cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(line_total_cents), 0) FROM cart_items WHERE cart_id = ?1",
        )
        .bind(cart_id)
        .fetch_one(&mut *tx)
        .await?;

        let now = Utc::now();
        sqlx::query("UPDATE carts SET total_cents = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(total_cents)
            .bind(now)
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        let cart: CartRecord = sqlx::query_as(
            r#"
            SELECT id, store_id, token, total_cents, created_at, updated_at
            FROM carts
            WHERE id = ?1
            "#,
        )
        .bind(cart_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Cart", cart_id))?;

        // Read the item list in the same transaction, so the returned view
        // can never pair this total with a different set of items.
        let items: Vec<CartItemRecord> = sqlx::query_as(
            r#"
            SELECT id, cart_id, customization_id, design_id, preview_file_id,
                   pricing_snapshot, quantity, decoration_locations,
                   line_total_cents, created_at
            FROM cart_items
            WHERE cart_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            cart_id = %cart_id,
            item_id = %attachment.item.id,
            total_cents,
            "Attached customized item to cart"
        );

        Ok(AttachedCart { cart, items })
    }
}

// =============================================================================
// Transaction Steps
// =============================================================================

async fn insert_design(tx: &mut Transaction<'_, Sqlite>, design: &NewDesign) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO designs (id, store_id, owner_id, content, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&design.id)
    .bind(&design.store_id)
    .bind(&design.owner_id)
    .bind(&design.content)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_customization(
    tx: &mut Transaction<'_, Sqlite>,
    customization: &NewCustomization,
) -> DbResult<()> {
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO customizations (
            id, store_id, product_id, variant_id, profile_id,
            design_id, preview_file_id, payload, pricing_snapshot,
            status, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
        "#,
    )
    .bind(&customization.id)
    .bind(&customization.store_id)
    .bind(&customization.product_id)
    .bind(&customization.variant_id)
    .bind(&customization.profile_id)
    .bind(&customization.design_id)
    .bind(&customization.preview_file_id)
    .bind(&customization.payload)
    .bind(&customization.pricing_snapshot)
    .bind(customization.status)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_cart_item(
    tx: &mut Transaction<'_, Sqlite>,
    cart_id: &str,
    item: &NewCartItem,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO cart_items (
            id, cart_id, customization_id, design_id, preview_file_id,
            pricing_snapshot, quantity, decoration_locations,
            line_total_cents, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(&item.id)
    .bind(cart_id)
    .bind(&item.customization_id)
    .bind(&item.design_id)
    .bind(&item.preview_file_id)
    .bind(&item.pricing_snapshot)
    .bind(item.quantity)
    .bind(&item.decoration_locations)
    .bind(item.line_total_cents)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::preview::PreviewFileRecord;
    use customizer_core::{AreaBounds, CustomizationProfile, DecorationAreaSpec};

    struct Fixture {
        db: Database,
        cart: CartRecord,
        product_id: String,
        profile_id: String,
        preview_id: String,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let product = db
            .catalog()
            .insert_product("store-1", "Custom Tee")
            .await
            .unwrap();

        let profile = CustomizationProfile {
            id: "prof-1".to_string(),
            store_id: "store-1".to_string(),
            product_id: product.id.clone(),
            enabled: true,
            locations: vec![DecorationAreaSpec {
                key: "front".to_string(),
                bounds: Some(AreaBounds {
                    max_width: 900.0,
                    max_height: 900.0,
                }),
                allowed_layer_types: vec![],
            }],
            rules: serde_json::Value::Null,
        };
        db.profiles().insert(&profile).await.unwrap();

        let preview = PreviewFileRecord {
            id: "pv-1".to_string(),
            store_id: "store-1".to_string(),
            url: "https://cdn.example.com/previews/pv-1.png".to_string(),
            file_name: "pv-1.png".to_string(),
            mime_type: "image/png".to_string(),
            size_bytes: 1024,
            created_at: Utc::now(),
        };
        db.previews().insert(&preview).await.unwrap();

        let cart = db.carts().create("store-1", "tok-1").await.unwrap();

        Fixture {
            db,
            cart,
            product_id: product.id,
            profile_id: profile.id,
            preview_id: preview.id,
        }
    }

    fn attachment(fx: &Fixture, suffix: &str, line_total_cents: i64) -> CartAttachment {
        CartAttachment {
            design: NewDesign {
                id: format!("design-{suffix}"),
                store_id: "store-1".to_string(),
                owner_id: "owner-1".to_string(),
                content: r#"{"locations":[],"personalization":{}}"#.to_string(),
            },
            customization: NewCustomization {
                id: format!("cust-{suffix}"),
                store_id: "store-1".to_string(),
                product_id: fx.product_id.clone(),
                variant_id: None,
                profile_id: fx.profile_id.clone(),
                design_id: format!("design-{suffix}"),
                preview_file_id: fx.preview_id.clone(),
                payload: r#"{"locations":[],"personalization":{}}"#.to_string(),
                pricing_snapshot: format!(r#"{{"total_cents":{line_total_cents}}}"#),
                status: CustomizationStatus::InCart,
            },
            item: NewCartItem {
                id: format!("item-{suffix}"),
                customization_id: format!("cust-{suffix}"),
                design_id: format!("design-{suffix}"),
                preview_file_id: fx.preview_id.clone(),
                pricing_snapshot: format!(r#"{{"total_cents":{line_total_cents}}}"#),
                quantity: 1,
                decoration_locations: r#"["front"]"#.to_string(),
                line_total_cents,
            },
        }
    }

    #[tokio::test]
    async fn test_attach_persists_all_records_and_total() {
        let fx = fixture().await;

        let attached = fx
            .db
            .carts()
            .attach_item(&fx.cart.id, &attachment(&fx, "a", 2599))
            .await
            .unwrap();

        assert_eq!(attached.cart.total_cents, 2599);
        assert_eq!(attached.items.len(), 1);

        let items = fx.db.carts().list_items(&fx.cart.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].line_total_cents, 2599);

        let audit = fx.db.audit();
        let design = audit.get_design("design-a").await.unwrap().unwrap();
        assert_eq!(design.owner_id, "owner-1");
        let cust = audit.get_customization("cust-a").await.unwrap().unwrap();
        assert_eq!(cust.status, CustomizationStatus::InCart);
        assert_eq!(cust.design_id, "design-a");
    }

    #[tokio::test]
    async fn test_total_recomputed_across_attaches() {
        let fx = fixture().await;
        let carts = fx.db.carts();

        carts
            .attach_item(&fx.cart.id, &attachment(&fx, "a", 1000))
            .await
            .unwrap();
        let attached = carts
            .attach_item(&fx.cart.id, &attachment(&fx, "b", 650))
            .await
            .unwrap();

        assert_eq!(attached.cart.total_cents, 1650);
        assert_eq!(carts.list_items(&fx.cart.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_attach_returns_items_matching_its_total() {
        let fx = fixture().await;
        let carts = fx.db.carts();

        for (suffix, cents) in [("a", 1000), ("b", 650), ("c", 25)] {
            let attached = carts
                .attach_item(&fx.cart.id, &attachment(&fx, suffix, cents))
                .await
                .unwrap();

            // Cart and items come from the same transaction snapshot
            let sum: i64 = attached.items.iter().map(|i| i.line_total_cents).sum();
            assert_eq!(attached.cart.total_cents, sum);
        }
    }

    #[tokio::test]
    async fn test_failed_attach_leaves_no_orphans() {
        let fx = fixture().await;

        // Nonexistent preview id violates the cart_items foreign key after
        // the design and customization inserts would have run.
        let mut bad = attachment(&fx, "a", 1000);
        bad.customization.preview_file_id = "pv-missing".to_string();
        bad.item.preview_file_id = "pv-missing".to_string();

        let err = fx.db.carts().attach_item(&fx.cart.id, &bad).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // The transaction rolled back: the design insert did not survive.
        assert!(fx.db.audit().get_design("design-a").await.unwrap().is_none());
        assert!(fx.db.carts().list_items(&fx.cart.id).await.unwrap().is_empty());

        let cart = fx.db.carts().get_by_id(&fx.cart.id).await.unwrap().unwrap();
        assert_eq!(cart.total_cents, 0);
    }

    #[tokio::test]
    async fn test_cart_token_lookup() {
        let fx = fixture().await;

        let cart = fx.db.carts().get_by_token("tok-1").await.unwrap().unwrap();
        assert_eq!(cart.id, fx.cart.id);
        assert!(fx.db.carts().get_by_token("tok-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_token_rejected() {
        let fx = fixture().await;

        let err = fx.db.carts().create("store-1", "tok-1").await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }
}
