//! Engine configuration module.
//!
//! Configuration is loaded once at process start from environment variables
//! with fallback to defaults. There is no ambient "current store" anywhere
//! in the engine: every operation takes explicit `store_id` parameters.

use std::env;

use customizer_core::SYSTEM_DESIGN_OWNER_ID;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Feature key checked against the entitlement gate.
    pub feature_key: String,

    /// Design owner recorded for unauthenticated storefront sessions.
    pub system_owner_id: String,

    /// Object-store path prefix for rendered preview artifacts.
    pub preview_path_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            feature_key: "product_customizer".to_string(),
            system_owner_id: SYSTEM_DESIGN_OWNER_ID.to_string(),
            preview_path_prefix: "previews".to_string(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = EngineConfig::default();

        EngineConfig {
            feature_key: env::var("CUSTOMIZER_FEATURE_KEY").unwrap_or(defaults.feature_key),
            system_owner_id: env::var("CUSTOMIZER_SYSTEM_OWNER_ID")
                .unwrap_or(defaults.system_owner_id),
            preview_path_prefix: env::var("CUSTOMIZER_PREVIEW_PATH_PREFIX")
                .unwrap_or(defaults.preview_path_prefix),
        }
    }
}
