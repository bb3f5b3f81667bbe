//! # Preview Orchestrator
//!
//! Turns a normalized customization into a durable preview artifact.
//!
//! ## Render Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    render_preview (always fresh)                        │
//! │                                                                         │
//! │  NormalizedCustomization                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PreviewRenderer::render ──► image bytes                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ObjectStore::store ──► { url, file_name, size_bytes }                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT preview_files row ──► PreviewFileRecord                         │
//! │                                                                         │
//! │  The row is written last: a preview_files row always points at a real,  │
//! │  fully stored artifact. Any earlier failure leaves nothing behind.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The reuse path (`resolve_or_render`) accepts a shopper-supplied artifact
//! id so client retries don't re-render; the id must belong to the store,
//! otherwise it is ignored and a fresh render runs. This is what makes a
//! retried commit idempotent at the artifact level.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::collaborators::{ObjectStore, PreviewRenderer, ProductContext};
use crate::error::{EngineError, EngineResult};
use customizer_core::NormalizedCustomization;
use customizer_db::{Database, PreviewFileRecord};

/// Orchestrates rendering, storage, and bookkeeping of preview artifacts.
#[derive(Clone)]
pub struct PreviewOrchestrator {
    db: Database,
    renderer: Arc<dyn PreviewRenderer>,
    store: Arc<dyn ObjectStore>,
    path_prefix: String,
}

impl PreviewOrchestrator {
    pub fn new(
        db: Database,
        renderer: Arc<dyn PreviewRenderer>,
        store: Arc<dyn ObjectStore>,
        path_prefix: impl Into<String>,
    ) -> Self {
        PreviewOrchestrator {
            db,
            renderer,
            store,
            path_prefix: path_prefix.into(),
        }
    }

    /// Renders a fresh preview artifact and records it.
    pub async fn render_preview(
        &self,
        store_id: &str,
        customization: &NormalizedCustomization,
        context: &ProductContext,
    ) -> EngineResult<PreviewFileRecord> {
        let image = self
            .renderer
            .render(customization, context)
            .await
            .map_err(as_preview_error)?;

        let suggested_name = format!("{}.{}", Uuid::new_v4(), extension_for(&image.mime_type));

        let stored = self
            .store
            .store(&image.bytes, &suggested_name, &self.path_prefix)
            .await
            .map_err(as_preview_error)?;

        let record = PreviewFileRecord {
            id: Uuid::new_v4().to_string(),
            store_id: store_id.to_string(),
            url: stored.url,
            file_name: stored.file_name,
            mime_type: image.mime_type,
            size_bytes: stored.size_bytes,
            created_at: Utc::now(),
        };

        self.db.previews().insert(&record).await?;

        info!(
            preview_file_id = %record.id,
            size_bytes = record.size_bytes,
            "Rendered and stored preview artifact"
        );

        Ok(record)
    }

    /// Reuses a supplied preview artifact when it belongs to the store,
    /// otherwise renders fresh.
    pub async fn resolve_or_render(
        &self,
        store_id: &str,
        supplied_id: Option<&str>,
        customization: &NormalizedCustomization,
        context: &ProductContext,
    ) -> EngineResult<PreviewFileRecord> {
        if let Some(id) = supplied_id {
            match self.db.previews().get_for_store(id, store_id).await? {
                Some(record) => {
                    debug!(preview_file_id = %id, "Reusing supplied preview artifact");
                    return Ok(record);
                }
                None => {
                    // Unknown or foreign-store id: fall through to a fresh
                    // render rather than failing the whole request.
                    warn!(preview_file_id = %id, "Supplied preview artifact not found for store");
                }
            }
        }

        self.render_preview(store_id, customization, context).await
    }
}

/// Render/storage failures surface under the preview taxonomy; database
/// failures keep theirs.
fn as_preview_error(err: EngineError) -> EngineError {
    match err {
        EngineError::PreviewRender(_) | EngineError::Db(_) => err,
        other => EngineError::PreviewRender(other.to_string()),
    }
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "bin",
    }
}
