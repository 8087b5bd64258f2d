//! # Repository Module
//!
//! Database repository implementations for Balcao.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Web handler                                                           │
//! │       │                                                                 │
//! │       │  db.sales().add_item(&sale_id, draft)                          │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── create / get_by_id / current_open / list_finalized                │
//! │  ├── add_item / update_item / remove_item / clear_items                │
//! │  └── finalize / update / delete                                        │
//! │       │                                                                 │
//! │       │  SQL Query (one transaction per mutation)                       │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`StoreRepository`](store::StoreRepository) - Store CRUD
//! - [`NoteRepository`](note::NoteRepository) - Notes with managed timestamps
//! - [`SaleRepository`](sale::SaleRepository) - Sales and their items

pub mod note;
pub mod sale;
pub mod store;
