//! # customizer-engine: Orchestration Layer for the Product Customizer
//!
//! Ties the pure core and the persistence layer to the external
//! collaborators, and exposes the engine's public operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Customizer Engine                                │
//! │                                                                         │
//! │  Storefront / transport layer                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                customizer-engine (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   CustomizerService                                             │   │
//! │  │     ├── get_customizer_config ── schema for the editor UI       │   │
//! │  │     ├── preview ───────────────── fresh render, no cart         │   │
//! │  │     └── customize_and_add_to_cart ── the full state machine     │   │
//! │  │                                                                 │   │
//! │  │   SchemaResolver │ PreviewOrchestrator │ collaborator traits    │   │
//! │  └──────────┬──────────────────────────────────┬───────────────────┘   │
//! │             │                                  │                       │
//! │             ▼                                  ▼                       │
//! │   customizer-core (pure logic)       customizer-db (SQLite)            │
//! │                                                                         │
//! │   External collaborators (injected as Arc<dyn …>):                     │
//! │   EntitlementGate, PricingEvaluator, PreviewRenderer, ObjectStore       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`service`] - The public operations and their DTOs
//! - [`resolver`] - Schema resolution (profile + active fields)
//! - [`preview`] - Preview rendering / reuse orchestration
//! - [`collaborators`] - Traits for the injected external services
//! - [`config`] - Environment-driven engine configuration
//! - [`error`] - The engine error taxonomy

// =============================================================================
// Module Declarations
// =============================================================================

pub mod collaborators;
pub mod config;
pub mod error;
pub mod preview;
pub mod resolver;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use collaborators::{
    EntitlementGate, ObjectStore, PreviewRenderer, PricingEvaluator, PricingRequest,
    PricingSnapshot, ProductContext, RenderedImage, StoredObject,
};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use preview::PreviewOrchestrator;
pub use resolver::{ResolvedSchema, SchemaResolver};
pub use service::{
    AddToCartRequest, CartItemView, CartView, CustomizerConfigView, CustomizerService, PreviewView,
};
