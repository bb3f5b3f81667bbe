//! Integration tests for the customize-and-add-to-cart flow, with mock
//! collaborators over an in-memory database.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use customizer_core::{
    AreaBounds, CustomizationProfile, CustomizationStatus, CustomizationSubmission,
    DecorationAreaSpec, FieldPricing, NormalizedCustomization, PersonalizationFieldSchema,
    SubmittedLayer, SubmittedLocation,
};
use customizer_db::{Database, DbConfig};
use customizer_engine::{
    AddToCartRequest, CustomizerService, EngineConfig, EngineError, EngineResult, EntitlementGate,
    ObjectStore, PreviewRenderer, PricingEvaluator, PricingRequest, PricingSnapshot,
    ProductContext, RenderedImage, StoredObject,
};

// =============================================================================
// Mock Collaborators
// =============================================================================

struct FixedEntitlement(bool);

#[async_trait]
impl EntitlementGate for FixedEntitlement {
    async fn is_enabled(&self, _store_id: &str, _feature_key: &str) -> EngineResult<bool> {
        Ok(self.0)
    }
}

/// Prices each item at a fixed base plus the personalization fees, scaled by
/// quantity, and echoes the request back in the detail payload.
struct FixedPricing {
    base_cents: i64,
}

#[async_trait]
impl PricingEvaluator for FixedPricing {
    async fn evaluate(&self, request: &PricingRequest) -> EngineResult<PricingSnapshot> {
        let fees: i64 = request
            .personalization_fees
            .iter()
            .map(|line| line.amount_cents)
            .sum();
        let total_cents = self.base_cents * request.quantity + fees;

        Ok(PricingSnapshot {
            total_cents,
            detail: serde_json::json!({
                "baseCents": self.base_cents,
                "quantity": request.quantity,
                "decorationMethod": request.decoration_method,
                "locations": request.locations,
            }),
        })
    }
}

struct FailingPricing;

#[async_trait]
impl PricingEvaluator for FailingPricing {
    async fn evaluate(&self, _request: &PricingRequest) -> EngineResult<PricingSnapshot> {
        Err(EngineError::Pricing("evaluator unavailable".to_string()))
    }
}

/// Counts renders so tests can assert whether the reuse path suppressed one.
struct CountingRenderer {
    renders: AtomicUsize,
}

impl CountingRenderer {
    fn new() -> Arc<Self> {
        Arc::new(CountingRenderer {
            renders: AtomicUsize::new(0),
        })
    }

    fn count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PreviewRenderer for CountingRenderer {
    async fn render(
        &self,
        _customization: &NormalizedCustomization,
        _context: &ProductContext,
    ) -> EngineResult<RenderedImage> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        Ok(RenderedImage {
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
            mime_type: "image/png".to_string(),
        })
    }
}

struct MemoryStore;

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn store(
        &self,
        bytes: &[u8],
        suggested_name: &str,
        path_prefix: &str,
    ) -> EngineResult<StoredObject> {
        Ok(StoredObject {
            url: format!("https://cdn.example.com/{path_prefix}/{suggested_name}"),
            file_name: suggested_name.to_string(),
            size_bytes: bytes.len() as i64,
        })
    }
}

// =============================================================================
// Fixture
// =============================================================================

struct Fixture {
    db: Database,
    service: CustomizerService,
    renderer: Arc<CountingRenderer>,
    product_id: String,
    cart_token: String,
}

async fn fixture_with(entitled: bool, pricing: Arc<dyn PricingEvaluator>) -> Fixture {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    let product = db
        .catalog()
        .insert_product("store-1", "Custom Tee")
        .await
        .unwrap();

    let profile = CustomizationProfile {
        id: "prof-1".to_string(),
        store_id: "store-1".to_string(),
        product_id: product.id.clone(),
        enabled: true,
        locations: vec![DecorationAreaSpec {
            key: "front".to_string(),
            bounds: Some(AreaBounds {
                max_width: 900.0,
                max_height: 900.0,
            }),
            allowed_layer_types: vec![],
        }],
        rules: serde_json::Value::Null,
    };
    db.profiles().insert(&profile).await.unwrap();

    db.profiles()
        .insert_field(
            "prof-1",
            &PersonalizationFieldSchema {
                id: "f-1".to_string(),
                key: "monogram".to_string(),
                label: "Monogram".to_string(),
                field_type: "text".to_string(),
                required: false,
                min_length: None,
                max_length: Some(10),
                pricing: FieldPricing {
                    flat_fee_cents: 500,
                    per_character_cents: 50,
                    per_item_cents: 0,
                },
                sort_order: 1,
                active: true,
            },
        )
        .await
        .unwrap();

    db.carts().create("store-1", "tok-1").await.unwrap();

    let renderer = CountingRenderer::new();
    let service = CustomizerService::new(
        db.clone(),
        EngineConfig::default(),
        Arc::new(FixedEntitlement(entitled)),
        pricing,
        renderer.clone(),
        Arc::new(MemoryStore),
    );

    Fixture {
        db,
        service,
        renderer,
        product_id: product.id,
        cart_token: "tok-1".to_string(),
    }
}

async fn fixture() -> Fixture {
    fixture_with(true, Arc::new(FixedPricing { base_cents: 1000 })).await
}

fn submission() -> CustomizationSubmission {
    CustomizationSubmission {
        locations: vec![SubmittedLocation {
            key: "front".to_string(),
            layers: vec![SubmittedLayer {
                layer_type: Some("TEXT".to_string()),
                x: Some(10.0),
                y: Some(10.0),
                width: Some(200.0),
                height: Some(100.0),
                text: Some("Hello".to_string()),
                ..Default::default()
            }],
        }],
        personalization: [(
            "monogram".to_string(),
            serde_json::Value::String("ABC".to_string()),
        )]
        .into_iter()
        .collect(),
    }
}

fn request(fx: &Fixture, quantity: i64) -> AddToCartRequest {
    AddToCartRequest {
        cart_token: fx.cart_token.clone(),
        product_id: fx.product_id.clone(),
        variant_id: None,
        quantity,
        submission: submission(),
        preview_file_id: None,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn full_flow_attaches_item_and_recomputes_total() {
    let fx = fixture().await;

    let cart = fx
        .service
        .customize_and_add_to_cart(&request(&fx, 1))
        .await
        .unwrap();

    // base 1000 + monogram flat 500 + 3 chars * 50 = 1650
    assert_eq!(cart.total_cents, 1650);
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 1);
    assert_eq!(cart.items[0].line_total_cents, 1650);
    assert_eq!(cart.items[0].decoration_locations, vec!["front"]);
    assert_eq!(fx.renderer.count(), 1);

    // Audit records were frozen in the same commit
    let cust = fx
        .db
        .audit()
        .get_customization(&cart.items[0].customization_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cust.status, CustomizationStatus::InCart);
    assert!(cust.pricing_snapshot.contains("\"total_cents\":1650"));

    let design = fx.db.audit().get_design(&cust.design_id).await.unwrap().unwrap();
    assert_eq!(design.owner_id, EngineConfig::default().system_owner_id);
}

#[tokio::test]
async fn quantity_is_coerced_to_at_least_one() {
    let fx = fixture().await;

    let cart = fx
        .service
        .customize_and_add_to_cart(&request(&fx, 0))
        .await
        .unwrap();

    assert_eq!(cart.items[0].quantity, 1);
    assert_eq!(cart.total_cents, 1650);
}

#[tokio::test]
async fn missing_cart_is_not_found() {
    let fx = fixture().await;

    let mut req = request(&fx, 1);
    req.cart_token = "tok-nope".to_string();

    let err = fx.service.customize_and_add_to_cart(&req).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
    assert_eq!(err.to_string(), "Cart not found");
}

#[tokio::test]
async fn unentitled_store_is_forbidden() {
    let fx = fixture_with(false, Arc::new(FixedPricing { base_cents: 1000 })).await;

    let err = fx
        .service
        .customize_and_add_to_cart(&request(&fx, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert_eq!(err.status(), 403);

    // Nothing persisted
    let cart = fx.db.carts().get_by_token("tok-1").await.unwrap().unwrap();
    assert_eq!(cart.total_cents, 0);
    assert!(fx.db.carts().list_items(&cart.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn product_without_profile_is_not_customizable() {
    let fx = fixture().await;

    let plain = fx
        .db
        .catalog()
        .insert_product("store-1", "Plain Tee")
        .await
        .unwrap();

    let mut req = request(&fx, 1);
    req.product_id = plain.id;

    let err = fx.service.customize_and_add_to_cart(&req).await.unwrap_err();
    assert_eq!(err.to_string(), "Product is not customizable");
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn foreign_store_product_is_not_found() {
    let fx = fixture().await;

    let foreign = fx
        .db
        .catalog()
        .insert_product("store-2", "Other Tee")
        .await
        .unwrap();

    let mut req = request(&fx, 1);
    req.product_id = foreign.id;

    let err = fx.service.customize_and_add_to_cart(&req).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
    assert_eq!(err.to_string(), "Product not found");
}

#[tokio::test]
async fn invalid_submission_is_validation_error() {
    let fx = fixture().await;

    let mut req = request(&fx, 1);
    req.submission = CustomizationSubmission::default();

    let err = fx.service.customize_and_add_to_cart(&req).await.unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert_eq!(
        err.to_string(),
        "At least one customization location is required"
    );
    assert_eq!(fx.renderer.count(), 0);
}

#[tokio::test]
async fn pricing_failure_propagates_and_persists_nothing() {
    let fx = fixture_with(true, Arc::new(FailingPricing)).await;

    let err = fx
        .service
        .customize_and_add_to_cart(&request(&fx, 1))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "PRICING_ERROR");
    assert_eq!(err.status(), 502);

    let cart = fx.db.carts().get_by_token("tok-1").await.unwrap().unwrap();
    assert!(fx.db.carts().list_items(&cart.id).await.unwrap().is_empty());
    // Pricing fails before the preview stage runs
    assert_eq!(fx.renderer.count(), 0);
}

#[tokio::test]
async fn supplied_preview_artifact_suppresses_render() {
    let fx = fixture().await;

    let preview = fx
        .service
        .preview("store-1", &fx.product_id, None, &submission())
        .await
        .unwrap();
    assert_eq!(fx.renderer.count(), 1);
    assert_eq!(preview.mime_type, "image/png");

    let mut req = request(&fx, 1);
    req.preview_file_id = Some(preview.preview_file_id.clone());

    let cart = fx.service.customize_and_add_to_cart(&req).await.unwrap();
    assert_eq!(cart.items[0].preview_file_id, preview.preview_file_id);
    // Reused, not re-rendered
    assert_eq!(fx.renderer.count(), 1);
}

#[tokio::test]
async fn unknown_preview_artifact_falls_back_to_fresh_render() {
    let fx = fixture().await;

    let mut req = request(&fx, 1);
    req.preview_file_id = Some("pv-from-another-store".to_string());

    let cart = fx.service.customize_and_add_to_cart(&req).await.unwrap();
    assert_ne!(cart.items[0].preview_file_id, "pv-from-another-store");
    assert_eq!(fx.renderer.count(), 1);
}

#[tokio::test]
async fn preview_renders_fresh_every_call() {
    let fx = fixture().await;

    let first = fx
        .service
        .preview("store-1", &fx.product_id, None, &submission())
        .await
        .unwrap();
    let second = fx
        .service
        .preview("store-1", &fx.product_id, None, &submission())
        .await
        .unwrap();

    assert_ne!(first.preview_file_id, second.preview_file_id);
    assert_eq!(fx.renderer.count(), 2);
}

#[tokio::test]
async fn get_customizer_config_exposes_schema() {
    let fx = fixture().await;

    let config = fx
        .service
        .get_customizer_config("store-1", &fx.product_id)
        .await
        .unwrap();

    assert_eq!(config.locations.len(), 1);
    assert_eq!(config.locations[0].key, "front");
    assert_eq!(config.fields.len(), 1);
    assert_eq!(config.fields[0].key, "monogram");

    let err = fx
        .service
        .get_customizer_config("store-2", &fx.product_id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Product is not customizable");
}

#[tokio::test]
async fn concurrent_attaches_both_land_and_total_is_sum() {
    let fx = fixture().await;

    let service_a = fx.service.clone();
    let service_b = fx.service.clone();
    let req_a = request(&fx, 1);
    let req_b = request(&fx, 2);

    let (a, b) = tokio::join!(
        service_a.customize_and_add_to_cart(&req_a),
        service_b.customize_and_add_to_cart(&req_b),
    );
    let view_a = a.unwrap();
    let view_b = b.unwrap();

    // Each returned view is internally consistent: its total is the sum of
    // exactly the items it lists, both read in the commit transaction
    for view in [&view_a, &view_b] {
        let sum: i64 = view.items.iter().map(|i| i.line_total_cents).sum();
        assert_eq!(view.total_cents, sum);
    }

    let cart = fx.db.carts().get_by_token("tok-1").await.unwrap().unwrap();
    let items = fx.db.carts().list_items(&cart.id).await.unwrap();

    assert_eq!(items.len(), 2);
    let expected: i64 = items.iter().map(|i| i.line_total_cents).sum();
    // qty 1: 1000 + 650 = 1650; qty 2: 2000 + 650 = 2650
    assert_eq!(expected, 4300);
    assert_eq!(cart.total_cents, expected);
}
