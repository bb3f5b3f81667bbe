//! # customizer-core: Pure Business Logic for the Customizer Engine
//!
//! This crate is the **heart** of the product customizer. It turns an
//! untrusted, free-form customization submission into a sanitized, clamped,
//! schema-validated canonical form and computes personalization surcharges —
//! all as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Customizer Engine Data Flow                         │
//! │                                                                         │
//! │  Storefront submission (untrusted JSON)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ customizer-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ sanitize  │  │ normalize │  │   fees    │  │   money   │  │   │
//! │  │   │ trim/clamp│  │ Normalizer│  │ FeeCalc   │  │   Money   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  customizer-engine (pricing, preview, cart attachment)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (profiles, layers, submissions, fee lines)
//! - [`sanitize`] - Text sanitization and numeric clamping primitives
//! - [`normalize`] - The Normalizer: submission → NormalizedCustomization
//! - [`fees`] - Personalization surcharge computation
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fees;
pub mod money;
pub mod normalize;
pub mod sanitize;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ValidationError, ValidationResult};
pub use fees::compute_fee_lines;
pub use money::Money;
pub use normalize::normalize_submission;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Well-known system actor that owns designs created from unauthenticated
/// storefront sessions.
///
/// ## Why a constant?
/// Guest checkout has no shopper identity, but every design record needs an
/// owner for the audit trail. The engine resolves this once at process start
/// (overridable via configuration) rather than creating an actor per call.
pub const SYSTEM_DESIGN_OWNER_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Decoration method reported to the pricing evaluator for customizer items.
pub const DECORATION_METHOD_CUSTOMIZER: &str = "CUSTOMIZER";

/// Maximum layers accepted per decoration area.
///
/// ## Business Reason
/// Bounds render cost and keeps submissions reviewable. Extra layers are
/// silently truncated, not rejected.
pub const MAX_LAYERS_PER_LOCATION: usize = 25;

/// Minimum width/height of a layer in product units.
pub const MIN_LAYER_DIMENSION: f64 = 10.0;

/// Fallback decoration-area bounds when a spec omits them.
pub const DEFAULT_AREA_MAX_WIDTH: f64 = 1200.0;

/// Fallback decoration-area bounds when a spec omits them.
pub const DEFAULT_AREA_MAX_HEIGHT: f64 = 1200.0;

/// Layer rotation is clamped to ±45 degrees.
pub const MAX_ROTATION_DEGREES: f64 = 45.0;

/// Maximum length of a sanitized location / personalization key.
pub const MAX_KEY_CHARS: usize = 64;

/// Maximum length of a layer type tag.
pub const MAX_LAYER_TYPE_CHARS: usize = 24;

/// Maximum length of text layer content.
pub const MAX_TEXT_CHARS: usize = 80;

/// Maximum length of a text layer font name.
pub const MAX_FONT_CHARS: usize = 40;

/// Maximum length of a text layer color value.
pub const MAX_COLOR_CHARS: usize = 16;

/// Maximum length of artwork asset / uploaded file identifiers.
pub const MAX_ASSET_ID_CHARS: usize = 64;

/// Maximum length of a personalization value.
pub const MAX_PERSONALIZATION_VALUE_CHARS: usize = 120;
