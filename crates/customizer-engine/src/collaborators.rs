//! # External Collaborator Seams
//!
//! Object-safe async traits for the services the engine orchestrates but
//! does not implement. The engine holds them as `Arc<dyn …>`, so production
//! adapters and test mocks plug in identically.
//!
//! ## Collaborator Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CustomizerService                                 │
//! │                                                                         │
//! │   EntitlementGate ──── is the store allowed to use the customizer?      │
//! │   PricingEvaluator ─── what does this configured item cost?             │
//! │   PreviewRenderer ──── normalized customization → image bytes           │
//! │   ObjectStore ──────── image bytes → durable URL                        │
//! │                                                                         │
//! │   Failures are surfaced with their taxonomy preserved; the engine       │
//! │   never substitutes a default price or skips the preview step.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use customizer_core::{NormalizedCustomization, PersonalizationFeeLine};

// =============================================================================
// Pricing
// =============================================================================

/// Everything the pricing evaluator needs to price one configured item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    pub store_id: String,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub quantity: i64,
    /// Always `DECORATION_METHOD_CUSTOMIZER` for engine-originated requests.
    pub decoration_method: String,
    /// Decoration location keys in submission order.
    pub locations: Vec<String>,
    /// Personalization surcharges, already computed by the fee calculator.
    pub personalization_fees: Vec<PersonalizationFeeLine>,
}

/// The evaluator's frozen pricing result.
///
/// `detail` is opaque to the engine and stored verbatim for audit; only
/// `total_cents` is interpreted (it becomes the cart line total).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSnapshot {
    pub total_cents: i64,
    #[serde(default)]
    pub detail: serde_json::Value,
}

// =============================================================================
// Preview Rendering
// =============================================================================

/// Product context handed to the renderer alongside the customization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductContext {
    pub store_id: String,
    pub product_id: String,
    pub variant_id: Option<String>,
}

/// A rendered preview image.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// A durably stored object.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub url: String,
    pub file_name: String,
    pub size_bytes: i64,
}

// =============================================================================
// Traits
// =============================================================================

/// Checks whether a store's plan entitles it to a feature.
#[async_trait]
pub trait EntitlementGate: Send + Sync {
    async fn is_enabled(&self, store_id: &str, feature_key: &str) -> EngineResult<bool>;
}

/// Prices a configured item. Failures must propagate; the engine never
/// defaults a failed evaluation to zero.
#[async_trait]
pub trait PricingEvaluator: Send + Sync {
    async fn evaluate(&self, request: &PricingRequest) -> EngineResult<PricingSnapshot>;
}

/// Renders a normalized customization into a preview image.
#[async_trait]
pub trait PreviewRenderer: Send + Sync {
    async fn render(
        &self,
        customization: &NormalizedCustomization,
        context: &ProductContext,
    ) -> EngineResult<RenderedImage>;
}

/// Persists opaque bytes and returns where they live.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn store(
        &self,
        bytes: &[u8],
        suggested_name: &str,
        path_prefix: &str,
    ) -> EngineResult<StoredObject>;
}
