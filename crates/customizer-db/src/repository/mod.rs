//! # Repository Layer
//!
//! Repository implementations for the customizer engine.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Repository Organization                             │
//! │                                                                         │
//! │  profile.rs  - Customization profiles + personalization field schemas  │
//! │  catalog.rs  - Products and variants (store-ownership checks)          │
//! │  preview.rs  - Rendered preview artifacts                              │
//! │  audit.rs    - Designs and customizations (immutable audit reads)      │
//! │  cart.rs     - Carts, cart items, and the atomic attach transaction    │
//! │                                                                         │
//! │  Each repository wraps the shared SqlitePool and exposes typed         │
//! │  methods; SQL never leaks above this layer.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod audit;
pub mod cart;
pub mod catalog;
pub mod preview;
pub mod profile;
