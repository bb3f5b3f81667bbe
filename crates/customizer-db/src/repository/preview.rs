//! # Preview File Repository
//!
//! Stores metadata for rendered preview artifacts. The image bytes
//! themselves live in object storage; the row records where, for whom,
//! and how big.
//!
//! Rows are written only after a render and upload both succeeded, so a
//! preview_files row always points at a real artifact.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// A stored preview artifact.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PreviewFileRecord {
    pub id: String,
    pub store_id: String,
    pub url: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

/// Repository for preview artifact metadata.
#[derive(Debug, Clone)]
pub struct PreviewFileRepository {
    pool: SqlitePool,
}

impl PreviewFileRepository {
    /// Creates a new PreviewFileRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PreviewFileRepository { pool }
    }

    /// Inserts a preview artifact record.
    pub async fn insert(&self, record: &PreviewFileRecord) -> DbResult<()> {
        debug!(id = %record.id, url = %record.url, "Inserting preview file record");

        sqlx::query(
            r#"
            INSERT INTO preview_files (
                id, store_id, url, file_name, mime_type, size_bytes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&record.id)
        .bind(&record.store_id)
        .bind(&record.url)
        .bind(&record.file_name)
        .bind(&record.mime_type)
        .bind(record.size_bytes)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a preview artifact by id, scoped to a store.
    ///
    /// The store filter is what makes shopper-supplied preview ids safe to
    /// reuse: an id belonging to another store resolves to `None`.
    pub async fn get_for_store(
        &self,
        id: &str,
        store_id: &str,
    ) -> DbResult<Option<PreviewFileRecord>> {
        let record: Option<PreviewFileRecord> = sqlx::query_as(
            r#"
            SELECT id, store_id, url, file_name, mime_type, size_bytes, created_at
            FROM preview_files
            WHERE id = ?1 AND store_id = ?2
            "#,
        )
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn sample_record(id: &str, store_id: &str) -> PreviewFileRecord {
        PreviewFileRecord {
            id: id.to_string(),
            store_id: store_id.to_string(),
            url: format!("https://cdn.example.com/previews/{id}.png"),
            file_name: format!("{id}.png"),
            mime_type: "image/png".to_string(),
            size_bytes: 4096,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.previews();

        repo.insert(&sample_record("pv-1", "store-1")).await.unwrap();
        let loaded = repo.get_for_store("pv-1", "store-1").await.unwrap().unwrap();

        assert_eq!(loaded.mime_type, "image/png");
        assert_eq!(loaded.size_bytes, 4096);
    }

    #[tokio::test]
    async fn test_foreign_store_resolves_to_none() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.previews();

        repo.insert(&sample_record("pv-1", "store-1")).await.unwrap();
        assert!(repo.get_for_store("pv-1", "store-2").await.unwrap().is_none());
    }
}
