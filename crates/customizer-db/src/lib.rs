//! # customizer-db: Persistence Layer for the Customizer Engine
//!
//! SQLite persistence for customization profiles, audit records, previews,
//! and carts, using sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Customizer Engine Data Flow                        │
//! │                                                                         │
//! │  CustomizerService (customizer-engine)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   customizer-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │   │   │
//! │  │   │               │    │ ProfileRepo   │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│ CatalogRepo   │    │ 001_initial  │   │   │
//! │  │   │ WAL + FKs     │    │ PreviewRepo   │    │   _schema    │   │   │
//! │  │   │               │    │ AuditRepo     │    │              │   │   │
//! │  │   │               │    │ CartRepo      │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode, foreign keys enforced)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (profile, catalog, preview,
//!   audit, cart)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use customizer_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/customizer.db")).await?;
//!
//! let profile = db.profiles().get_enabled(store_id, product_id).await?;
//! let cart = db.carts().attach_item(cart_id, &attachment).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::audit::{AuditRepository, CustomizationRecord, DesignRecord};
pub use repository::cart::{
    AttachedCart, CartAttachment, CartItemRecord, CartRecord, CartRepository, NewCartItem,
    NewCustomization, NewDesign,
};
pub use repository::catalog::{CatalogRepository, ProductRecord, VariantRecord};
pub use repository::preview::{PreviewFileRecord, PreviewFileRepository};
pub use repository::profile::ProfileRepository;
