//! # Domain Types
//!
//! Core domain types for the customizer engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Merchant-defined schema            Shopper input (untrusted)           │
//! │  ┌──────────────────────┐           ┌──────────────────────────┐        │
//! │  │ CustomizationProfile │           │ CustomizationSubmission  │        │
//! │  │  └ DecorationAreaSpec│           │  └ SubmittedLocation     │        │
//! │  │ PersonalizationField │           │     └ SubmittedLayer     │        │
//! │  │ Schema               │           │  └ personalization map   │        │
//! │  └──────────┬───────────┘           └────────────┬─────────────┘        │
//! │             │                                    │                      │
//! │             └────────────┬───────────────────────┘                      │
//! │                          ▼  normalize_submission                        │
//! │           ┌──────────────────────────────┐                              │
//! │           │   NormalizedCustomization    │  canonical, immutable        │
//! │           │    └ NormalizedLocation      │  deterministic ordering      │
//! │           │       └ NormalizedLayer      │  (Vec + BTreeMap)            │
//! │           └──────────────────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Persisted entities carry a UUID v4 `id` for relations plus business keys
//! (location `key`, personalization field `key`) that merchants manage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::{DEFAULT_AREA_MAX_HEIGHT, DEFAULT_AREA_MAX_WIDTH};

// =============================================================================
// Merchant Schema: Customization Profile
// =============================================================================

/// Size bounds of a decoration area, in product units.
///
/// Both values must be positive; a missing `bounds` on the spec falls back
/// to 1200×1200.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AreaBounds {
    pub max_width: f64,
    pub max_height: f64,
}

/// A named region on a product that shoppers may decorate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DecorationAreaSpec {
    /// Business key, unique within a profile (e.g. "front").
    pub key: String,

    /// Size bounds. `None` falls back to the default 1200×1200.
    #[serde(default)]
    pub bounds: Option<AreaBounds>,

    /// Layer types allowed here ("TEXT", "ARTWORK", "UPLOAD").
    /// Empty means all types are allowed.
    #[serde(default)]
    pub allowed_layer_types: Vec<String>,
}

impl DecorationAreaSpec {
    /// Returns the effective bounds, applying the defaults for unset specs.
    pub fn effective_bounds(&self) -> AreaBounds {
        self.bounds.unwrap_or(AreaBounds {
            max_width: DEFAULT_AREA_MAX_WIDTH,
            max_height: DEFAULT_AREA_MAX_HEIGHT,
        })
    }

    /// Checks whether a layer type tag is allowed in this area.
    ///
    /// An empty allow-list permits every supported type.
    pub fn allows_layer_type(&self, layer_type: &str) -> bool {
        self.allowed_layer_types.is_empty()
            || self.allowed_layer_types.iter().any(|t| t == layer_type)
    }
}

/// A product's customization profile: the merchant-defined schema the
/// Normalizer reconciles submissions against.
///
/// ## Invariants
/// - At most one profile per (store, product) — enforced by the database
/// - Location keys are unique within a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationProfile {
    pub id: String,
    pub store_id: String,
    pub product_id: String,
    pub enabled: bool,
    pub locations: Vec<DecorationAreaSpec>,
    /// Opaque merchant rule configuration; read-only to the engine.
    #[serde(default)]
    pub rules: serde_json::Value,
}

// =============================================================================
// Merchant Schema: Personalization Fields
// =============================================================================

/// Pricing rules for one personalization field, in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FieldPricing {
    /// Flat surcharge applied once when the field is used.
    pub flat_fee_cents: i64,
    /// Surcharge per character of the sanitized value.
    pub per_character_cents: i64,
    /// Surcharge per item in the cart line.
    pub per_item_cents: i64,
}

/// A merchant-defined text input (e.g. monogram) with validation and
/// pricing rules, independent of decoration areas.
///
/// Lifecycle: created/updated/deleted by merchant tooling; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PersonalizationFieldSchema {
    pub id: String,
    /// Business key shoppers submit values under.
    pub key: String,
    /// Display label; falls back to `key` on fee lines when empty.
    pub label: String,
    /// Input type hint for the storefront ("text", "monogram", ...).
    pub field_type: String,
    pub required: bool,
    #[serde(default)]
    pub min_length: Option<u32>,
    #[serde(default)]
    pub max_length: Option<u32>,
    pub pricing: FieldPricing,
    pub sort_order: i64,
    pub active: bool,
}

impl PersonalizationFieldSchema {
    /// Display name used on fee lines: label, or key when label is empty.
    pub fn display_name(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

// =============================================================================
// Shopper Input: Customization Submission (UNTRUSTED)
// =============================================================================

/// One layer as submitted by the storefront. Every field is optional and
/// untrusted; the Normalizer clamps geometry and sanitizes text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubmittedLayer {
    /// Layer type tag; defaults to TEXT when absent.
    #[serde(rename = "type", default)]
    pub layer_type: Option<String>,

    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub rotation: Option<f64>,

    // TEXT fields
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub color: Option<String>,

    // ARTWORK fields
    #[serde(default)]
    pub artwork_asset_id: Option<String>,

    // UPLOAD fields
    #[serde(default)]
    pub file_id: Option<String>,
}

/// One decoration area's worth of submitted layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SubmittedLocation {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub layers: Vec<SubmittedLayer>,
}

/// The full untrusted submission from the storefront.
///
/// Personalization values arrive as arbitrary JSON scalars and are coerced
/// to strings during normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomizationSubmission {
    #[serde(default)]
    pub locations: Vec<SubmittedLocation>,
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub personalization: BTreeMap<String, serde_json::Value>,
}

// =============================================================================
// Canonical Form: Normalized Customization
// =============================================================================

/// Clamped layer geometry. All values are finite.
///
/// ## Invariant
/// `0 ≤ x`, `x + width ≤ maxWidth` (and likewise for y/height) for the
/// decoration area the layer was normalized against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

/// Type-specific layer content.
///
/// ## Why a tagged enum?
/// Layer-type handling is a closed extension point: adding a type means
/// adding a variant plus its required-field checks, not threading a new
/// branch through nested conditionals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum LayerContent {
    Text {
        text: String,
        font: String,
        color: String,
    },
    Artwork {
        #[serde(rename = "artworkAssetId")]
        artwork_asset_id: String,
    },
    Upload {
        #[serde(rename = "fileId")]
        file_id: String,
    },
}

impl LayerContent {
    /// Canonical type tag of this content ("TEXT" / "ARTWORK" / "UPLOAD").
    pub fn type_tag(&self) -> &'static str {
        match self {
            LayerContent::Text { .. } => "TEXT",
            LayerContent::Artwork { .. } => "ARTWORK",
            LayerContent::Upload { .. } => "UPLOAD",
        }
    }
}

/// A sanitized, clamped layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedLayer {
    #[serde(flatten)]
    pub geometry: LayerGeometry,
    #[serde(flatten)]
    pub content: LayerContent,
}

/// A decoration area with its normalized layers. `key` is guaranteed to
/// exist in the profile it was normalized against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedLocation {
    pub key: String,
    pub layers: Vec<NormalizedLayer>,
}

/// The canonical form of a shopper's customization.
///
/// ## Determinism
/// Locations keep submission order, layers keep submission order (truncated
/// to the per-location cap), and the personalization map is a `BTreeMap`,
/// so serialization is byte-identical for identical input. Preview caching
/// and audit reproducibility both depend on this.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedCustomization {
    pub locations: Vec<NormalizedLocation>,
    pub personalization: BTreeMap<String, String>,
}

impl NormalizedCustomization {
    /// Location keys in canonical order, for the pricing evaluator.
    pub fn location_keys(&self) -> Vec<String> {
        self.locations.iter().map(|l| l.key.clone()).collect()
    }
}

// =============================================================================
// Personalization Fee Line
// =============================================================================

/// One personalization surcharge, attached to the pricing request.
///
/// ## Invariant
/// `amount_cents` is always > 0; zero/negative fees are never emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PersonalizationFeeLine {
    /// Display name (schema label, or key when the label is empty).
    pub name: String,
    pub amount_cents: i64,
}

impl PersonalizationFeeLine {
    /// Returns the fee amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Customization Status
// =============================================================================

/// Lifecycle status of a persisted customization.
///
/// The engine only ever creates `InCart`; later transitions are driven by
/// the downstream order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CustomizationStatus {
    /// Attached to a cart, not yet ordered.
    InCart,
    /// The owning cart was checked out.
    Ordered,
    /// The owning cart line was removed or abandoned.
    Cancelled,
}

impl Default for CustomizationStatus {
    fn default() -> Self {
        CustomizationStatus::InCart
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
