//! # Profile Repository
//!
//! Database operations for customization profiles and their personalization
//! field schemas.
//!
//! ## Read Path (hot)
//! ```text
//! get_enabled(store, product) ──► profile row ──► parse locations JSON
//!        │
//! get_active_fields(profile)  ──► active schemas, sorted by sort_order
//! ```
//!
//! Profiles are merchant data: this crate reads them; merchant tooling
//! (out of scope) writes them. The insert methods exist for seeding and
//! tests.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use customizer_core::{
    CustomizationProfile, DecorationAreaSpec, FieldPricing, PersonalizationFieldSchema,
};

/// Raw profile row; `locations` and `rules` are JSON columns.
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: String,
    store_id: String,
    product_id: String,
    enabled: bool,
    locations: String,
    rules: String,
}

/// Raw personalization field row.
#[derive(Debug, sqlx::FromRow)]
struct FieldRow {
    id: String,
    key: String,
    label: String,
    field_type: String,
    required: bool,
    min_length: Option<i64>,
    max_length: Option<i64>,
    flat_fee_cents: i64,
    per_character_cents: i64,
    per_item_cents: i64,
    sort_order: i64,
    active: bool,
}

impl ProfileRow {
    fn into_profile(self) -> DbResult<CustomizationProfile> {
        let locations: Vec<DecorationAreaSpec> = serde_json::from_str(&self.locations)
            .map_err(|e| DbError::corrupt("CustomizationProfile", &self.id, "locations", e))?;
        let rules: serde_json::Value = serde_json::from_str(&self.rules)
            .map_err(|e| DbError::corrupt("CustomizationProfile", &self.id, "rules", e))?;

        Ok(CustomizationProfile {
            id: self.id,
            store_id: self.store_id,
            product_id: self.product_id,
            enabled: self.enabled,
            locations,
            rules,
        })
    }
}

impl From<FieldRow> for PersonalizationFieldSchema {
    fn from(row: FieldRow) -> Self {
        PersonalizationFieldSchema {
            id: row.id,
            key: row.key,
            label: row.label,
            field_type: row.field_type,
            required: row.required,
            min_length: row.min_length.map(|v| v as u32),
            max_length: row.max_length.map(|v| v as u32),
            pricing: FieldPricing {
                flat_fee_cents: row.flat_fee_cents,
                per_character_cents: row.per_character_cents,
                per_item_cents: row.per_item_cents,
            },
            sort_order: row.sort_order,
            active: row.active,
        }
    }
}

/// Repository for customization profile operations.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProfileRepository { pool }
    }

    /// Gets the enabled profile for a product in a store, if any.
    ///
    /// Returns `None` both when no profile exists and when one exists but is
    /// disabled (product undergoing setup) — callers surface both as
    /// "not customizable".
    pub async fn get_enabled(
        &self,
        store_id: &str,
        product_id: &str,
    ) -> DbResult<Option<CustomizationProfile>> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT id, store_id, product_id, enabled, locations, rules
            FROM customization_profiles
            WHERE store_id = ?1 AND product_id = ?2 AND enabled = 1
            "#,
        )
        .bind(store_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProfileRow::into_profile).transpose()
    }

    /// Gets the active personalization field schemas for a profile, in
    /// merchant sort order.
    pub async fn get_active_fields(
        &self,
        profile_id: &str,
    ) -> DbResult<Vec<PersonalizationFieldSchema>> {
        let rows: Vec<FieldRow> = sqlx::query_as(
            r#"
            SELECT id, key, label, field_type, required,
                   min_length, max_length,
                   flat_fee_cents, per_character_cents, per_item_cents,
                   sort_order, active
            FROM personalization_fields
            WHERE profile_id = ?1 AND active = 1
            ORDER BY sort_order, key
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PersonalizationFieldSchema::from).collect())
    }

    /// Inserts a profile (seeding / tests; merchant tooling owns this path
    /// in production).
    pub async fn insert(&self, profile: &CustomizationProfile) -> DbResult<()> {
        debug!(id = %profile.id, product_id = %profile.product_id, "Inserting customization profile");

        let now = Utc::now();
        let locations = serde_json::to_string(&profile.locations)
            .map_err(|e| DbError::Internal(e.to_string()))?;
        let rules = serde_json::to_string(&profile.rules)
            .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO customization_profiles (
                id, store_id, product_id, enabled, locations, rules,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.store_id)
        .bind(&profile.product_id)
        .bind(profile.enabled)
        .bind(&locations)
        .bind(&rules)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a personalization field schema under a profile.
    pub async fn insert_field(
        &self,
        profile_id: &str,
        field: &PersonalizationFieldSchema,
    ) -> DbResult<()> {
        debug!(id = %field.id, key = %field.key, "Inserting personalization field");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO personalization_fields (
                id, profile_id, key, label, field_type, required,
                min_length, max_length,
                flat_fee_cents, per_character_cents, per_item_cents,
                sort_order, active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14)
            "#,
        )
        .bind(&field.id)
        .bind(profile_id)
        .bind(&field.key)
        .bind(&field.label)
        .bind(&field.field_type)
        .bind(field.required)
        .bind(field.min_length.map(|v| v as i64))
        .bind(field.max_length.map(|v| v as i64))
        .bind(field.pricing.flat_fee_cents)
        .bind(field.pricing.per_character_cents)
        .bind(field.pricing.per_item_cents)
        .bind(field.sort_order)
        .bind(field.active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
