//! # Audit Repository
//!
//! Read access to designs and customizations. Both tables are write-once:
//! rows are inserted inside the cart-attach transaction (see
//! `CartRepository::attach_item`) and never updated by this engine, so the
//! stored payload and pricing snapshot stay exactly as frozen at attach time.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;
use customizer_core::CustomizationStatus;

/// An immutable design row. `content` is the normalized customization JSON.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DesignRecord {
    pub id: String,
    pub store_id: String,
    pub owner_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A customization row binding design, preview, and frozen pricing together.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomizationRecord {
    pub id: String,
    pub store_id: String,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub profile_id: String,
    pub design_id: String,
    pub preview_file_id: String,
    pub payload: String,
    pub pricing_snapshot: String,
    pub status: CustomizationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for audit-record reads.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: SqlitePool,
}

impl AuditRepository {
    /// Creates a new AuditRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AuditRepository { pool }
    }

    /// Gets a design by id.
    pub async fn get_design(&self, id: &str) -> DbResult<Option<DesignRecord>> {
        let record: Option<DesignRecord> = sqlx::query_as(
            r#"
            SELECT id, store_id, owner_id, content, created_at
            FROM designs
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Gets a customization by id.
    pub async fn get_customization(&self, id: &str) -> DbResult<Option<CustomizationRecord>> {
        let record: Option<CustomizationRecord> = sqlx::query_as(
            r#"
            SELECT id, store_id, product_id, variant_id, profile_id,
                   design_id, preview_file_id, payload, pricing_snapshot,
                   status, created_at, updated_at
            FROM customizations
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
