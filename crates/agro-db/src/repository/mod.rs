//! # Repository Module
//!
//! Typed access to the three persisted keys.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Register session                                                      │
//! │       │                                                                 │
//! │       │  register.carts().save(&cart)                                  │
//! │       ▼                                                                 │
//! │  CartRepository                                                        │
//! │  ├── load()  → Loaded<CartLedger>   (never fails, falls back)          │
//! │  └── save()  → DbResult<()>                                            │
//! │       │                                                                 │
//! │       │  "pos_demo_cart_v1" → {"m_tea":2}                              │
//! │       ▼                                                                 │
//! │  dyn KeyValueStore                                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fallbacks
//!
//! | Stored value            | Result              | Logged   |
//! |-------------------------|---------------------|----------|
//! | missing / empty string  | default             | `debug!` |
//! | not valid for the type  | default             | `warn!`  |
//! | store read error        | default             | `warn!`  |
//!
//! Keys carry a `_v1` suffix. A new on-disk shape gets a new suffix.
//!
//! ## Available Repositories
//!
//! - [`MenuRepository`] - catalog, default menu fallback
//! - [`CartRepository`] - id → quantity ledger
//! - [`SalesRepository`] - sales log

pub mod cart;
pub mod menu;
pub mod sales;

pub use cart::CartRepository;
pub use menu::MenuRepository;
pub use sales::SalesRepository;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::store::KeyValueStore;

/// Storage key for the menu.
pub const MENU_KEY: &str = "pos_demo_menu_v1";

/// Storage key for the cart ledger.
pub const CART_KEY: &str = "pos_demo_cart_v1";

/// Storage key for the sales log.
pub const SALES_KEY: &str = "pos_demo_sales_v1";

/// Where a loaded value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Parsed from the store.
    Stored,
    /// Key absent; default used.
    Missing,
    /// Value present but unreadable; default used.
    Corrupt,
    /// The store itself failed; default used.
    Unavailable,
}

impl LoadSource {
    /// True when a default was substituted for something that was there.
    pub fn is_fallback(&self) -> bool {
        matches!(self, LoadSource::Corrupt | LoadSource::Unavailable)
    }
}

/// A value plus its [`LoadSource`].
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub value: T,
    pub source: LoadSource,
}

impl<T> Loaded<T> {
    fn new(value: T, source: LoadSource) -> Self {
        Loaded { value, source }
    }
}

/// Reads the raw text of a key, folding read errors into [`LoadSource`].
fn read_raw(store: &dyn KeyValueStore, key: &str) -> Result<String, LoadSource> {
    match store.get(key) {
        Ok(Some(raw)) if !raw.trim().is_empty() => Ok(raw),
        Ok(_) => {
            debug!(key = %key, "Key not stored, using default");
            Err(LoadSource::Missing)
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Store read failed, using default");
            Err(LoadSource::Unavailable)
        }
    }
}

/// Loads and parses a key, substituting `fallback()` on any failure.
fn load_json<T, F>(store: &dyn KeyValueStore, key: &str, fallback: F) -> Loaded<T>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    let raw = match read_raw(store, key) {
        Ok(raw) => raw,
        Err(source) => return Loaded::new(fallback(), source),
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Loaded::new(value, LoadSource::Stored),
        Err(e) => {
            warn!(key = %key, error = %e, "Stored value is corrupt, using default");
            Loaded::new(fallback(), LoadSource::Corrupt)
        }
    }
}

fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> DbResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
