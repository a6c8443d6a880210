//! # agro-db: Persistence Layer for AgroPOS
//!
//! Key → JSON storage plus the typed repositories the counter uses.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        AgroPOS Data Flow                                │
//! │                                                                         │
//! │  Register session (till app)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     agro-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ Repositories  │    │ KeyValueStore │    │  Migrations  │  │   │
//! │  │   │               │    │               │    │  (embedded)  │  │   │
//! │  │   │ MenuRepo      │───►│ SqliteStore   │    │              │  │   │
//! │  │   │ CartRepo      │    │ MemoryStore   │    │ 001_kv_store │  │   │
//! │  │   │ SalesRepo     │    │               │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/agropos/agropos.db  (per-OS data dir)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `KeyValueStore` trait and the in-memory store
//! - [`pool`] - SQLite store and its configuration
//! - [`migrations`] - Embedded schema migrations
//! - [`repository`] - Menu / cart / sales repositories
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agro_db::{CartRepository, DbConfig, SqliteStore};
//!
//! let store = SqliteStore::open(DbConfig::new("agropos.db"))?;
//! let cart = CartRepository::new(&store).load().value;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{DbConfig, SqliteStore};
pub use store::{KeyValueStore, MemoryStore};

pub use repository::{
    CartRepository, LoadSource, Loaded, MenuRepository, SalesRepository, CART_KEY, MENU_KEY,
    SALES_KEY,
};
