//! # Customizer Service
//!
//! The public operations of the engine: storefront configuration, preview,
//! and the customize-and-add-to-cart flow.
//!
//! ## Add-to-Cart State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   customize_and_add_to_cart                             │
//! │                                                                         │
//! │  RESOLVING_CART ──────────► cart by token, else NotFound                │
//! │        │                                                                │
//! │  CHECKING_ENTITLEMENT ────► gate says no → Forbidden                    │
//! │        │                                                                │
//! │  VALIDATING_CUSTOMIZATION ► product/variant ownership, schema,          │
//! │        │                    normalization (ValidationError / NotFound)  │
//! │        │                                                                │
//! │  PRICING ─────────────────► fee lines + evaluator snapshot              │
//! │        │                                                                │
//! │  PREPARING_PREVIEW ───────► reuse supplied artifact or render fresh     │
//! │        │                                                                │
//! │  COMMITTING ──────────────► one transaction: design + customization +   │
//! │        │                    cart item + total recompute                 │
//! │        ▼                                                                │
//! │  DONE ────────────────────► refreshed cart view                         │
//! │                                                                         │
//! │  Every stage short-circuits with `?`; nothing before COMMITTING         │
//! │  persists rows, and COMMITTING is all-or-nothing in the db crate.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::collaborators::{
    EntitlementGate, ObjectStore, PreviewRenderer, PricingEvaluator, PricingRequest,
    PricingSnapshot, ProductContext,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::preview::PreviewOrchestrator;
use crate::resolver::{ResolvedSchema, SchemaResolver};
use customizer_core::{
    compute_fee_lines, normalize_submission, CustomizationStatus, CustomizationSubmission,
    DecorationAreaSpec, NormalizedCustomization, PersonalizationFieldSchema,
    DECORATION_METHOD_CUSTOMIZER,
};
use customizer_db::{
    CartAttachment, CartItemRecord, CartRecord, Database, DbError, NewCartItem, NewCustomization,
    NewDesign, PreviewFileRecord,
};

// =============================================================================
// DTOs
// =============================================================================

/// Storefront configuration for one customizable product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizerConfigView {
    pub product_id: String,
    pub locations: Vec<DecorationAreaSpec>,
    pub fields: Vec<PersonalizationFieldSchema>,
}

/// A rendered preview, ready for the storefront to display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewView {
    pub preview_file_id: String,
    pub url: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

impl From<PreviewFileRecord> for PreviewView {
    fn from(record: PreviewFileRecord) -> Self {
        PreviewView {
            preview_file_id: record.id,
            url: record.url,
            file_name: record.file_name,
            mime_type: record.mime_type,
            size_bytes: record.size_bytes,
        }
    }
}

/// One line of the refreshed cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub id: String,
    pub customization_id: String,
    pub preview_file_id: String,
    pub quantity: i64,
    pub decoration_locations: Vec<String>,
    pub line_total_cents: i64,
}

/// The refreshed cart returned after a successful attach.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: String,
    pub token: String,
    pub total_cents: i64,
    pub items: Vec<CartItemView>,
}

/// Everything a shopper submits when adding a customized item to a cart.
#[derive(Debug, Clone)]
pub struct AddToCartRequest {
    pub cart_token: String,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub quantity: i64,
    pub submission: CustomizationSubmission,
    /// Artifact from an earlier preview call, reused when it belongs to the
    /// cart's store.
    pub preview_file_id: Option<String>,
}

// =============================================================================
// Service
// =============================================================================

/// The customizer engine's public surface.
#[derive(Clone)]
pub struct CustomizerService {
    db: Database,
    config: EngineConfig,
    entitlement: Arc<dyn EntitlementGate>,
    pricing: Arc<dyn PricingEvaluator>,
    resolver: SchemaResolver,
    previews: PreviewOrchestrator,
}

impl CustomizerService {
    pub fn new(
        db: Database,
        config: EngineConfig,
        entitlement: Arc<dyn EntitlementGate>,
        pricing: Arc<dyn PricingEvaluator>,
        renderer: Arc<dyn PreviewRenderer>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let resolver = SchemaResolver::new(db.clone());
        let previews = PreviewOrchestrator::new(
            db.clone(),
            renderer,
            store,
            config.preview_path_prefix.clone(),
        );

        CustomizerService {
            db,
            config,
            entitlement,
            pricing,
            resolver,
            previews,
        }
    }

    // =========================================================================
    // Public Operations
    // =========================================================================

    /// Returns the customization schema for a product, for the storefront to
    /// build its editor UI from.
    pub async fn get_customizer_config(
        &self,
        store_id: &str,
        product_id: &str,
    ) -> EngineResult<CustomizerConfigView> {
        let schema = self.resolver.resolve(store_id, product_id).await?;

        Ok(CustomizerConfigView {
            product_id: product_id.to_string(),
            locations: schema.profile.locations,
            fields: schema.fields,
        })
    }

    /// Renders a preview for a submission without touching any cart.
    ///
    /// Always renders fresh: the shopper is iterating on their design, so a
    /// cached artifact would show stale work.
    pub async fn preview(
        &self,
        store_id: &str,
        product_id: &str,
        variant_id: Option<&str>,
        submission: &CustomizationSubmission,
    ) -> EngineResult<PreviewView> {
        let schema = self.resolver.resolve(store_id, product_id).await?;
        let normalized = normalize_submission(&schema.profile, submission)?;

        let context = ProductContext {
            store_id: store_id.to_string(),
            product_id: product_id.to_string(),
            variant_id: variant_id.map(str::to_string),
        };

        let record = self
            .previews
            .render_preview(store_id, &normalized, &context)
            .await?;

        Ok(record.into())
    }

    /// Validates, prices, previews, and atomically attaches a customized
    /// item to a cart. Returns the refreshed cart.
    pub async fn customize_and_add_to_cart(
        &self,
        request: &AddToCartRequest,
    ) -> EngineResult<CartView> {
        // RESOLVING_CART
        debug!(cart_token = %request.cart_token, "Resolving cart");
        let cart = self
            .db
            .carts()
            .get_by_token(&request.cart_token)
            .await?
            .ok_or_else(|| EngineError::NotFound("Cart not found".to_string()))?;

        // CHECKING_ENTITLEMENT
        debug!(store_id = %cart.store_id, "Checking customizer entitlement");
        let enabled = self
            .entitlement
            .is_enabled(&cart.store_id, &self.config.feature_key)
            .await?;
        if !enabled {
            return Err(EngineError::Forbidden(
                "Customizer is not enabled for this store".to_string(),
            ));
        }

        // VALIDATING_CUSTOMIZATION
        debug!(product_id = %request.product_id, "Validating customization");
        self.check_catalog_ownership(&cart, request).await?;
        let schema = self
            .resolver
            .resolve(&cart.store_id, &request.product_id)
            .await?;
        let normalized = normalize_submission(&schema.profile, &request.submission)?;

        // PRICING
        let quantity = request.quantity.max(1);
        let snapshot = self
            .price(&cart, request, &schema, &normalized, quantity)
            .await?;

        // PREPARING_PREVIEW
        let context = ProductContext {
            store_id: cart.store_id.clone(),
            product_id: request.product_id.clone(),
            variant_id: request.variant_id.clone(),
        };
        let preview = self
            .previews
            .resolve_or_render(
                &cart.store_id,
                request.preview_file_id.as_deref(),
                &normalized,
                &context,
            )
            .await?;

        // COMMITTING
        let attachment = self.build_attachment(
            &cart,
            request,
            &schema,
            &normalized,
            &snapshot,
            &preview,
            quantity,
        )?;
        let attached = self.db.carts().attach_item(&cart.id, &attachment).await?;

        info!(
            cart_id = %attached.cart.id,
            total_cents = attached.cart.total_cents,
            "Customized item added to cart"
        );

        // DONE: the cart and items were read inside the commit transaction,
        // so the view is self-consistent even under concurrent attaches.
        cart_view(attached.cart, attached.items)
    }

    // =========================================================================
    // Stage Helpers
    // =========================================================================

    /// The product (and variant, when supplied) must exist, be active, and
    /// belong to the cart's store.
    async fn check_catalog_ownership(
        &self,
        cart: &CartRecord,
        request: &AddToCartRequest,
    ) -> EngineResult<()> {
        let product = self
            .db
            .catalog()
            .get_product(&cart.store_id, &request.product_id)
            .await?;
        if product.is_none() {
            return Err(EngineError::NotFound("Product not found".to_string()));
        }

        if let Some(variant_id) = &request.variant_id {
            let variant = self
                .db
                .catalog()
                .get_variant(&request.product_id, variant_id)
                .await?;
            if variant.is_none() {
                return Err(EngineError::NotFound(
                    "Product variant not found".to_string(),
                ));
            }
        }

        Ok(())
    }

    async fn price(
        &self,
        cart: &CartRecord,
        request: &AddToCartRequest,
        schema: &ResolvedSchema,
        normalized: &NormalizedCustomization,
        quantity: i64,
    ) -> EngineResult<PricingSnapshot> {
        let fee_lines = compute_fee_lines(&schema.fields, &normalized.personalization, quantity)?;

        let pricing_request = PricingRequest {
            store_id: cart.store_id.clone(),
            product_id: request.product_id.clone(),
            variant_id: request.variant_id.clone(),
            quantity,
            decoration_method: DECORATION_METHOD_CUSTOMIZER.to_string(),
            locations: normalized.location_keys(),
            personalization_fees: fee_lines,
        };

        debug!(
            quantity,
            locations = pricing_request.locations.len(),
            fee_lines = pricing_request.personalization_fees.len(),
            "Evaluating pricing"
        );

        // Evaluator failures keep the pricing taxonomy; a failed evaluation
        // is never defaulted to zero.
        self.pricing
            .evaluate(&pricing_request)
            .await
            .map_err(|e| match e {
                EngineError::Pricing(_) | EngineError::Db(_) => e,
                other => EngineError::Pricing(other.to_string()),
            })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_attachment(
        &self,
        cart: &CartRecord,
        request: &AddToCartRequest,
        schema: &ResolvedSchema,
        normalized: &NormalizedCustomization,
        snapshot: &PricingSnapshot,
        preview: &PreviewFileRecord,
        quantity: i64,
    ) -> EngineResult<CartAttachment> {
        let payload = to_json(normalized)?;
        let pricing_snapshot = to_json(snapshot)?;
        let decoration_locations = to_json(&normalized.location_keys())?;

        let design_id = Uuid::new_v4().to_string();
        let customization_id = Uuid::new_v4().to_string();

        Ok(CartAttachment {
            design: NewDesign {
                id: design_id.clone(),
                store_id: cart.store_id.clone(),
                owner_id: self.config.system_owner_id.clone(),
                content: payload.clone(),
            },
            customization: NewCustomization {
                id: customization_id.clone(),
                store_id: cart.store_id.clone(),
                product_id: request.product_id.clone(),
                variant_id: request.variant_id.clone(),
                profile_id: schema.profile.id.clone(),
                design_id: design_id.clone(),
                preview_file_id: preview.id.clone(),
                payload,
                pricing_snapshot: pricing_snapshot.clone(),
                status: CustomizationStatus::InCart,
            },
            item: NewCartItem {
                id: Uuid::new_v4().to_string(),
                customization_id,
                design_id,
                preview_file_id: preview.id.clone(),
                pricing_snapshot,
                quantity,
                decoration_locations,
                line_total_cents: snapshot.total_cents,
            },
        })
    }

}

/// Builds the storefront cart view from a cart and the item list that was
/// read alongside it.
fn cart_view(cart: CartRecord, items: Vec<CartItemRecord>) -> EngineResult<CartView> {
    let items = items
        .into_iter()
        .map(|item| {
            let decoration_locations: Vec<String> =
                serde_json::from_str(&item.decoration_locations).map_err(|e| {
                    DbError::corrupt("CartItem", &item.id, "decoration_locations", e)
                })?;

            Ok(CartItemView {
                id: item.id,
                customization_id: item.customization_id,
                preview_file_id: item.preview_file_id,
                quantity: item.quantity,
                decoration_locations,
                line_total_cents: item.line_total_cents,
            })
        })
        .collect::<EngineResult<Vec<_>>>()?;

    Ok(CartView {
        id: cart.id,
        token: cart.token,
        total_cents: cart.total_cents,
        items,
    })
}

fn to_json<T: Serialize>(value: &T) -> EngineResult<String> {
    serde_json::to_string(value).map_err(|e| EngineError::Db(DbError::Internal(e.to_string())))
}
