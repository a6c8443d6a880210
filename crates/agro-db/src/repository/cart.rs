//! # Cart Repository
//!
//! The ledger is stored as a JSON object `{ "m_tea": 2, ... }`. Key order
//! is line order, so the object is written and read in insertion order.

use agro_core::CartLedger;

use super::{load_json, save_json, Loaded, CART_KEY};
use crate::error::DbResult;
use crate::store::KeyValueStore;

/// Repository for the persisted cart.
pub struct CartRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> CartRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        CartRepository { store }
    }

    /// Loads the cart, falling back to an empty one.
    ///
    /// Quantities are normalized on the way in: zero and negative entries
    /// are dropped, fractions rounded, large values capped.
    pub fn load(&self) -> Loaded<CartLedger> {
        load_json(self.store, CART_KEY, CartLedger::new)
    }

    /// Writes the full ledger.
    pub fn save(&self, cart: &CartLedger) -> DbResult<()> {
        save_json(self.store, CART_KEY, cart)
    }
}
