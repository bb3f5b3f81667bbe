//! # Engine Error Types
//!
//! Error taxonomy for customizer operations.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Shopper input  │  │  Access         │  │  Collaborators          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Validation     │  │  NotFound       │  │  Pricing                │ │
//! │  │  (per-field)    │  │  Forbidden      │  │  PreviewRender          │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │  Infrastructure │   Each variant maps to a stable error code and    │
//! │  │                 │   an HTTP-style status so transport layers can    │
//! │  │  Db             │   translate without matching on variants.         │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation messages come straight from `customizer_core::ValidationError`
//! and are shopper-displayable as-is.

use thiserror::Error;

use customizer_core::ValidationError;
use customizer_db::DbError;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error type covering every customizer operation failure.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Shopper input failed validation. The message is displayable as-is.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced entity does not exist (or is not visible to this store).
    #[error("{0}")]
    NotFound(String),

    /// The store is not entitled to the customizer feature.
    #[error("{0}")]
    Forbidden(String),

    /// The pricing evaluator failed or returned an unusable result.
    #[error("Pricing evaluation failed: {0}")]
    Pricing(String),

    /// Preview rendering or artifact storage failed.
    #[error("Preview rendering failed: {0}")]
    PreviewRender(String),

    /// Database failure.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl EngineError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "VALIDATION_ERROR",
            EngineError::NotFound(_) => "NOT_FOUND",
            EngineError::Forbidden(_) => "FORBIDDEN",
            EngineError::Pricing(_) => "PRICING_ERROR",
            EngineError::PreviewRender(_) => "PREVIEW_RENDER_ERROR",
            EngineError::Db(_) => "DATABASE_ERROR",
        }
    }

    /// HTTP-style status for transport layers.
    pub fn status(&self) -> u16 {
        match self {
            EngineError::Validation(_) => 400,
            EngineError::NotFound(_) => 404,
            EngineError::Forbidden(_) => 403,
            EngineError::Pricing(_) => 502,
            EngineError::PreviewRender(_) => 502,
            EngineError::Db(_) => 500,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_statuses() {
        let err = EngineError::Validation(ValidationError::NoLocations);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.status(), 400);

        let err = EngineError::Forbidden("Customizer is not enabled for this store".to_string());
        assert_eq!(err.code(), "FORBIDDEN");
        assert_eq!(err.status(), 403);

        let err = EngineError::Pricing("upstream timeout".to_string());
        assert_eq!(err.status(), 502);
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = EngineError::Validation(ValidationError::NoLocations);
        assert_eq!(
            err.to_string(),
            "At least one customization location is required"
        );
    }
}
