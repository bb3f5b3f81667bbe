//! # Normalizer
//!
//! Validates a raw customization submission against a product's resolved
//! profile and produces the canonical [`NormalizedCustomization`].
//!
//! ## Normalization Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Normalization Pipeline                              │
//! │                                                                         │
//! │  CustomizationSubmission (untrusted)                                    │
//! │       │                                                                 │
//! │       ├── empty locations? ──► ValidationError::NoLocations             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Resolve each location key against the profile (sanitized lookup)      │
//! │       │                                                                 │
//! │       ├── unknown key? ──► ValidationError::UnknownLocation             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Per layer (first 25 only):                                            │
//! │    1. type tag: sanitized, UPPERCASE, default TEXT                     │
//! │    2. width/height clamped to [10, area max]                           │
//! │    3. x/y clamped to [0, area max - size]   (AFTER step 2, so a       │
//! │       layer can never extend past its area)                            │
//! │    4. rotation clamped to ±45°                                         │
//! │    5. type dispatch: required fields sanitized and checked             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Personalization map: keys and values sanitized, values coerced        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  NormalizedCustomization (canonical, deterministic)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//! Given identical `(profile, submission)`, the output is byte-identical
//! when serialized. Preview caching and audit reproducibility rely on this,
//! so normalization must stay free of clocks, randomness, and map-order
//! dependence.

use std::collections::BTreeMap;

use crate::error::{ValidationError, ValidationResult};
use crate::sanitize::{clamp_finite, sanitize_layer_type, sanitize_text};
use crate::types::{
    AreaBounds, CustomizationProfile, CustomizationSubmission, DecorationAreaSpec, LayerContent,
    LayerGeometry, NormalizedCustomization, NormalizedLayer, NormalizedLocation, SubmittedLayer,
};
use crate::{
    MAX_ASSET_ID_CHARS, MAX_COLOR_CHARS, MAX_FONT_CHARS, MAX_KEY_CHARS, MAX_LAYERS_PER_LOCATION,
    MAX_LAYER_TYPE_CHARS, MAX_PERSONALIZATION_VALUE_CHARS, MAX_ROTATION_DEGREES, MAX_TEXT_CHARS,
    MIN_LAYER_DIMENSION,
};

/// Normalizes an untrusted submission against the product's profile.
///
/// Idempotent: normalizing an already-normalized customization yields an
/// identical result.
///
/// ## Errors
/// Returns a [`ValidationError`] with a shopper-displayable message when the
/// submission is empty, names an unknown location, uses an unsupported or
/// disallowed layer type, or omits a layer type's required field.
pub fn normalize_submission(
    profile: &CustomizationProfile,
    submission: &CustomizationSubmission,
) -> ValidationResult<NormalizedCustomization> {
    if submission.locations.is_empty() {
        return Err(ValidationError::NoLocations);
    }

    // Profile location specs keyed by sanitized key. Profile keys are
    // merchant data, but they pass through the same sanitizer so lookups
    // match what we would store.
    let specs: BTreeMap<String, &DecorationAreaSpec> = profile
        .locations
        .iter()
        .map(|spec| (sanitize_text(&spec.key, MAX_KEY_CHARS), spec))
        .collect();

    let mut locations = Vec::with_capacity(submission.locations.len());
    for submitted in &submission.locations {
        let key = sanitize_text(&submitted.key, MAX_KEY_CHARS);
        let spec = specs
            .get(&key)
            .ok_or_else(|| ValidationError::UnknownLocation(key.clone()))?;
        let bounds = spec.effective_bounds();

        let mut layers = Vec::with_capacity(submitted.layers.len().min(MAX_LAYERS_PER_LOCATION));
        for raw in submitted.layers.iter().take(MAX_LAYERS_PER_LOCATION) {
            layers.push(normalize_layer(raw, spec, bounds, &key)?);
        }

        locations.push(NormalizedLocation { key, layers });
    }

    let mut personalization = BTreeMap::new();
    for (raw_key, raw_value) in &submission.personalization {
        let key = sanitize_text(raw_key, MAX_KEY_CHARS);
        if key.is_empty() {
            continue;
        }
        let value = sanitize_text(
            &coerce_to_string(raw_value),
            MAX_PERSONALIZATION_VALUE_CHARS,
        );
        personalization.insert(key, value);
    }

    Ok(NormalizedCustomization {
        locations,
        personalization,
    })
}

/// Normalizes a single layer against its decoration area.
fn normalize_layer(
    raw: &SubmittedLayer,
    spec: &DecorationAreaSpec,
    bounds: AreaBounds,
    location_key: &str,
) -> ValidationResult<NormalizedLayer> {
    let type_tag = sanitize_layer_type(raw.layer_type.as_deref(), MAX_LAYER_TYPE_CHARS);

    if !matches!(type_tag.as_str(), "TEXT" | "ARTWORK" | "UPLOAD") {
        return Err(ValidationError::UnsupportedLayerType(type_tag));
    }
    if !spec.allows_layer_type(&type_tag) {
        return Err(ValidationError::LayerTypeNotAllowed {
            layer_type: type_tag,
            location: location_key.to_string(),
        });
    }

    // Size first, position after: x/y ranges depend on the clamped size, so
    // a layer can never extend past its decoration area.
    let width = clamp_finite(
        raw.width.unwrap_or(0.0),
        MIN_LAYER_DIMENSION,
        bounds.max_width,
    );
    let height = clamp_finite(
        raw.height.unwrap_or(0.0),
        MIN_LAYER_DIMENSION,
        bounds.max_height,
    );
    let x = clamp_finite(raw.x.unwrap_or(0.0), 0.0, bounds.max_width - width);
    let y = clamp_finite(raw.y.unwrap_or(0.0), 0.0, bounds.max_height - height);
    let rotation = clamp_finite(
        raw.rotation.unwrap_or(0.0),
        -MAX_ROTATION_DEGREES,
        MAX_ROTATION_DEGREES,
    );

    let geometry = LayerGeometry {
        x,
        y,
        width,
        height,
        rotation,
    };

    // Closed type dispatch: one arm per layer type, one required-field
    // check per arm.
    let content = match type_tag.as_str() {
        "TEXT" => {
            let text = sanitize_text(raw.text.as_deref().unwrap_or(""), MAX_TEXT_CHARS);
            if text.is_empty() {
                return Err(ValidationError::MissingText);
            }
            LayerContent::Text {
                text,
                font: sanitize_text(raw.font.as_deref().unwrap_or(""), MAX_FONT_CHARS),
                color: sanitize_text(raw.color.as_deref().unwrap_or(""), MAX_COLOR_CHARS),
            }
        }
        "ARTWORK" => {
            let artwork_asset_id = sanitize_text(
                raw.artwork_asset_id.as_deref().unwrap_or(""),
                MAX_ASSET_ID_CHARS,
            );
            if artwork_asset_id.is_empty() {
                return Err(ValidationError::MissingArtworkAsset);
            }
            LayerContent::Artwork { artwork_asset_id }
        }
        "UPLOAD" => {
            let file_id =
                sanitize_text(raw.file_id.as_deref().unwrap_or(""), MAX_ASSET_ID_CHARS);
            if file_id.is_empty() {
                return Err(ValidationError::MissingUploadFile);
            }
            LayerContent::Upload { file_id }
        }
        // Unreachable: the tag was matched above.
        other => return Err(ValidationError::UnsupportedLayerType(other.to_string())),
    };

    Ok(NormalizedLayer { geometry, content })
}

/// Coerces a personalization value to a string.
///
/// Storefronts send numbers and booleans for some field types; anything
/// non-scalar collapses to empty (and then fails `required` checks rather
/// than smuggling structure into the canonical form).
fn coerce_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
