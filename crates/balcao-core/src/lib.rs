//! # balcao-core: Entities and Pure Rules for Balcao
//!
//! This crate holds the four persistence entities of the point of sale and
//! the small amount of arithmetic they carry. It has zero I/O dependencies;
//! storage lives in `balcao-db`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Balcao Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Web layer (external, JSON)                      │   │
//! │  │     new sale ──► add item ──► remove item ──► finalize         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ balcao-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   clock   │  │ validation│  │   error   │  │   │
//! │  │   │  Store    │  │ civil     │  │  rules    │  │ CoreError │  │   │
//! │  │   │  Note     │  │ sale time │  │  checks   │  │           │  │   │
//! │  │   │  Sale     │  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   └───────────┘                                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  balcao-db (Database Layer)                     │   │
//! │  │           SQLite queries, migrations, repositories              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Store, Note, Sale, SaleItem and input drafts
//! - [`clock`] - Timestamp factories (UTC now, naive Brazil civil time)
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules applied by the constructors
//!
//! ## Example Usage
//!
//! ```rust
//! use balcao_core::{QuantityKind, Sale, SaleItem};
//!
//! let mut sale = Sale::open(balcao_core::clock::sale_time_now());
//! let mut item = SaleItem::new(&sale.id, "Tomate", 1.5, QuantityKind::Kg, 6.0, 0.0).unwrap();
//! item.recompute_subtotal();
//! sale.push_item(item).unwrap();
//!
//! assert_eq!(sale.recompute_total(), 9.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Column limits carried over from the store schema.
pub const MAX_STORE_NAME_LEN: usize = 100;
pub const MAX_STORE_ADDRESS_LEN: usize = 200;
pub const MAX_STORE_PHONE_LEN: usize = 20;

/// Note title limit. Note content is unbounded text.
pub const MAX_NOTE_TITLE_LEN: usize = 200;

/// Sale header limits.
pub const MAX_CUSTOMER_NAME_LEN: usize = 200;
pub const MAX_PAYMENT_METHOD_LEN: usize = 50;

/// Sale item product name limit.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;
