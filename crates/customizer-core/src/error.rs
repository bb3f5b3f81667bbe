//! # Error Types
//!
//! Domain-specific error types for customizer-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  customizer-core errors (this file)                                    │
//! │  └── ValidationError  - Malformed / out-of-policy submissions          │
//! │                                                                         │
//! │  customizer-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  customizer-engine errors (separate crate)                             │
//! │  └── EngineError      - Full taxonomy incl. NotFound / Forbidden /     │
//! │                         Pricing / PreviewRender                        │
//! │                                                                         │
//! │  Flow: ValidationError → EngineError → caller (HTTP-equivalent 400)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every variant's message is suitable for direct display to the shopper
//! 3. Errors are enum variants, never String

use thiserror::Error;

/// Submission validation errors.
///
/// These are user-correctable: the shopper changed something the merchant's
/// schema does not allow, and the message tells them what.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The submission carried no decoration locations at all.
    #[error("At least one customization location is required")]
    NoLocations,

    /// A submitted location key does not exist in the product's profile.
    #[error("Invalid customization location: {0}")]
    UnknownLocation(String),

    /// Layer type is not one of TEXT / ARTWORK / UPLOAD.
    #[error("Unsupported layer type: {0}")]
    UnsupportedLayerType(String),

    /// The decoration area restricts layer types and this one is not listed.
    #[error("Layer type {layer_type} is not allowed in location {location}")]
    LayerTypeNotAllowed {
        layer_type: String,
        location: String,
    },

    /// A TEXT layer had no text left after sanitization.
    #[error("Text layer requires non-empty text")]
    MissingText,

    /// An ARTWORK layer without an asset reference.
    #[error("Artwork layer requires an artwork asset id")]
    MissingArtworkAsset,

    /// An UPLOAD layer without an uploaded file reference.
    #[error("Upload layer requires an uploaded file id")]
    MissingUploadFile,

    /// A required personalization field was left empty.
    #[error("Missing required personalization field: {0}")]
    MissingRequiredField(String),

    /// Personalization value shorter than the schema's minimum.
    #[error("Personalization too short: {0}")]
    PersonalizationTooShort(String),

    /// Personalization value longer than the schema's maximum.
    #[error("Personalization too long: {0}")]
    PersonalizationTooLong(String),
}

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_display_ready() {
        assert_eq!(
            ValidationError::NoLocations.to_string(),
            "At least one customization location is required"
        );
        assert_eq!(
            ValidationError::UnknownLocation("sleeve".to_string()).to_string(),
            "Invalid customization location: sleeve"
        );
        assert_eq!(
            ValidationError::MissingRequiredField("name".to_string()).to_string(),
            "Missing required personalization field: name"
        );
        assert_eq!(
            ValidationError::PersonalizationTooShort("name".to_string()).to_string(),
            "Personalization too short: name"
        );
        assert_eq!(
            ValidationError::PersonalizationTooLong("motto".to_string()).to_string(),
            "Personalization too long: motto"
        );
    }
}
