//! # Schema Resolver
//!
//! Resolves the merchant customization schema for a product: the enabled
//! profile plus its active personalization field schemas, in merchant sort
//! order.
//!
//! "No profile" and "profile disabled" are distinguished only in logs; both
//! surface to callers as the same NotFound, so a storefront cannot probe
//! which products are mid-setup.

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use customizer_core::{CustomizationProfile, PersonalizationFieldSchema};
use customizer_db::Database;

/// A resolved customization schema: what validation and fee computation run
/// against.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    pub profile: CustomizationProfile,
    pub fields: Vec<PersonalizationFieldSchema>,
}

/// Resolves profiles and field schemas from persistent storage.
#[derive(Clone)]
pub struct SchemaResolver {
    db: Database,
}

impl SchemaResolver {
    pub fn new(db: Database) -> Self {
        SchemaResolver { db }
    }

    /// Resolves the enabled profile and active fields for a product, or
    /// NotFound when the product is not customizable in this store.
    pub async fn resolve(&self, store_id: &str, product_id: &str) -> EngineResult<ResolvedSchema> {
        let profile = match self.db.profiles().get_enabled(store_id, product_id).await? {
            Some(profile) => profile,
            None => {
                debug!(
                    store_id = %store_id,
                    product_id = %product_id,
                    "No enabled customization profile"
                );
                return Err(EngineError::NotFound(
                    "Product is not customizable".to_string(),
                ));
            }
        };

        let fields = self.db.profiles().get_active_fields(&profile.id).await?;

        debug!(
            profile_id = %profile.id,
            locations = profile.locations.len(),
            fields = fields.len(),
            "Resolved customization schema"
        );

        Ok(ResolvedSchema { profile, fields })
    }
}
