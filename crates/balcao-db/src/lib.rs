//! # balcao-db: Database Layer for Balcao
//!
//! Persistent storage for stores, notes and sales, on SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Balcao Data Flow                                 │
//! │                                                                         │
//! │  Web handler (add item to current sale)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    balcao-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ StoreRepo     │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ NoteRepo      │    │ 001_initial  │  │   │
//! │  │   │ Sale timezone │    │ SaleRepo      │    │ _schema.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   $BALCAO_DB_PATH (default ./balcao.db)                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Store, note and sale repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use balcao_core::{NewSale, NewSaleItem, QuantityKind, SaleCheckout};
//! use balcao_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//!
//! let sale = db.sales().create(NewSale::default()).await?;
//! let sale = db
//!     .sales()
//!     .add_item(&sale.id, NewSaleItem::new("Banana", 1.2, QuantityKind::Kg, 6.99))
//!     .await?;
//! db.sales()
//!     .finalize(&sale.id, SaleCheckout::new(Some("Ana"), Some("pix")))
//!     .await?;
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
pub use repository::note::NoteRepository;
pub use repository::sale::SaleRepository;
pub use repository::store::StoreRepository;
