//! # Cart Ledger
//!
//! The live record of quantities currently selected for purchase.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Ledger Operations                               │
//! │                                                                         │
//! │  Operator Action          Ledger Call              Entry Change         │
//! │  ───────────────          ───────────              ────────────         │
//! │                                                                         │
//! │  Click +  ───────────────► increment(id) ────────► qty + 1 (≤ 999)      │
//! │                                                                         │
//! │  Click −  ───────────────► decrement(id) ────────► qty - 1, 0 removes   │
//! │                                                                         │
//! │  Type in qty field ──────► set_quantity_input() ─► clamp(0, 999, text)  │
//! │                                                                         │
//! │  Clear / checkout ───────► clear() ──────────────► no entries           │
//! │                                                                         │
//! │  NOTE: A zero quantity is never stored. Ids missing from the menu are  │
//! │        kept but skipped by lines() and subtotal().                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Entries keep the order in which an id first entered the cart. Setting an
//! existing id replaces its quantity in place; removing and re-adding an id
//! moves it to the end. Bills list their lines in this order.
//!
//! ## Stored Shape
//! A JSON object of id → quantity: `{"m_chicken_rice": 2, "m_chapati": 3}`.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::catalog::Catalog;
use crate::money::Money;
use crate::validation::{clamp_quantity, clamp_quantity_f64, parse_quantity_input};

/// A cart entry resolved against the catalog.
///
/// The same shape is frozen into a [`crate::bill::Bill`] at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Menu item id.
    pub id: String,

    /// Item name at the time the line was resolved.
    pub name: String,

    /// Unit price at the time the line was resolved.
    #[ts(type = "number")]
    pub unit_price: Money,

    /// Quantity (1..=999).
    pub qty: u32,

    /// `unit_price × qty`.
    #[serde(rename = "total")]
    #[ts(type = "number")]
    pub line_total: Money,
}

/// Mapping of menu item id → quantity.
///
/// ## Invariants
/// - Every stored quantity is in `1..=999`
/// - Ids are unique
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartLedger {
    entries: Vec<(String, u32)>,
}

impl CartLedger {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        CartLedger::default()
    }

    /// Current quantity for an id (0 when absent).
    pub fn quantity(&self, item_id: &str) -> u32 {
        self.position(item_id)
            .map(|i| self.entries[i].1)
            .unwrap_or(0)
    }

    /// Sets the quantity for an id.
    ///
    /// ## Behavior
    /// - Clamped to `0..=999`
    /// - 0 removes the entry
    /// - Unknown ids are stored as-is
    ///
    /// ## Returns
    /// The quantity actually stored (0 if removed).
    pub fn set_quantity(&mut self, item_id: &str, qty: i64) -> u32 {
        let qty = clamp_quantity(qty);
        self.store(item_id, qty);
        qty
    }

    /// Sets the quantity from a fractional value (rounded, then clamped).
    pub fn set_quantity_f64(&mut self, item_id: &str, qty: f64) -> u32 {
        let qty = clamp_quantity_f64(qty);
        self.store(item_id, qty);
        qty
    }

    /// Sets the quantity from raw text typed by the operator.
    pub fn set_quantity_input(&mut self, item_id: &str, raw: &str) -> u32 {
        let qty = parse_quantity_input(raw);
        self.store(item_id, qty);
        qty
    }

    /// Adds one (capped at 999).
    pub fn increment(&mut self, item_id: &str) -> u32 {
        let current = self.quantity(item_id) as i64;
        self.set_quantity(item_id, current + 1)
    }

    /// Removes one (floored at 0, which drops the entry).
    pub fn decrement(&mut self, item_id: &str) -> u32 {
        let current = self.quantity(item_id) as i64;
        self.set_quantity(item_id, current - 1)
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct ids (including ids missing from the menu).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Raw `(id, qty)` entries in cart order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(id, qty)| (id.as_str(), *qty))
    }

    /// Entries resolved against the catalog, in cart order.
    /// Ids missing from the catalog are skipped.
    pub fn lines(&self, catalog: &Catalog) -> Vec<LineItem> {
        self.entries
            .iter()
            .filter_map(|(id, qty)| {
                let item = catalog.get(id)?;
                Some(LineItem {
                    id: id.clone(),
                    name: item.name.clone(),
                    unit_price: item.unit_price,
                    qty: *qty,
                    line_total: item.unit_price.multiply_quantity(*qty),
                })
            })
            .collect()
    }

    /// Σ price × qty over ids present in the catalog.
    pub fn subtotal(&self, catalog: &Catalog) -> Money {
        self.entries
            .iter()
            .filter_map(|(id, qty)| catalog.price(id).map(|price| price * *qty))
            .sum()
    }

    /// Sum of quantities over ids present in the catalog.
    pub fn total_quantity(&self, catalog: &Catalog) -> u32 {
        self.entries
            .iter()
            .filter(|(id, _)| catalog.contains(id))
            .map(|(_, qty)| *qty)
            .sum()
    }

    fn position(&self, item_id: &str) -> Option<usize> {
        self.entries.iter().position(|(id, _)| id == item_id)
    }

    fn store(&mut self, item_id: &str, qty: u32) {
        match (self.position(item_id), qty) {
            (Some(i), 0) => {
                self.entries.remove(i);
            }
            (Some(i), qty) => self.entries[i].1 = qty,
            (None, 0) => {}
            (None, qty) => self.entries.push((item_id.to_string(), qty)),
        }
    }
}

// =============================================================================
// Serde (JSON object, insertion ordered)
// =============================================================================

impl Serialize for CartLedger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, qty) in &self.entries {
            map.serialize_entry(id, qty)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CartLedger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CartLedgerVisitor)
    }
}

struct CartLedgerVisitor;

impl<'de> Visitor<'de> for CartLedgerVisitor {
    type Value = CartLedger;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of item id to quantity")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut ledger = CartLedger::new();
        // Stored quantities go through the same clamp as live input
        while let Some((id, qty)) = access.next_entry::<String, f64>()? {
            ledger.set_quantity_f64(&id, qty);
        }
        Ok(ledger)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use rstest::rstest;

    fn test_catalog() -> Catalog {
        Catalog::new(vec![
            CatalogItem::new("A", "Alpha", Money::from_minor(100)),
            CatalogItem::new("B", "Beta", Money::from_minor(20)),
        ])
        .unwrap()
    }

    #[test]
    fn test_subtotal_example() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.set_quantity("A", 2);
        cart.set_quantity("B", 3);

        assert_eq!(cart.subtotal(&catalog), Money::from_minor(260));
        assert_eq!(cart.total_quantity(&catalog), 5);
    }

    #[rstest]
    #[case(-5, 0)]
    #[case(0, 0)]
    #[case(42, 42)]
    #[case(1000, 999)]
    fn test_set_quantity_clamps(#[case] input: i64, #[case] stored: u32) {
        let mut cart = CartLedger::new();
        assert_eq!(cart.set_quantity("A", input), stored);
        assert_eq!(cart.quantity("A"), stored);
        assert_eq!(cart.len(), usize::from(stored > 0));
    }

    #[test]
    fn test_zero_removes_entry() {
        let mut cart = CartLedger::new();
        cart.set_quantity("A", 3);
        cart.set_quantity("A", 0);

        assert!(cart.is_empty());
        assert_eq!(serde_json::to_string(&cart).unwrap(), "{}");
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut cart = CartLedger::new();
        assert_eq!(cart.increment("A"), 1);
        assert_eq!(cart.increment("A"), 2);
        assert_eq!(cart.decrement("A"), 1);
        assert_eq!(cart.decrement("A"), 0);
        assert!(cart.is_empty());

        // Floored at zero, nothing stored
        assert_eq!(cart.decrement("A"), 0);
        assert!(cart.is_empty());

        cart.set_quantity("A", 999);
        assert_eq!(cart.increment("A"), 999);
    }

    #[test]
    fn test_set_quantity_input() {
        let mut cart = CartLedger::new();
        assert_eq!(cart.set_quantity_input("A", "3"), 3);
        assert_eq!(cart.set_quantity_input("A", "oops"), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unknown_ids_are_kept_but_not_totaled() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.set_quantity("A", 1);
        cart.set_quantity("GHOST", 4);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.quantity("GHOST"), 4);
        assert_eq!(cart.subtotal(&catalog), Money::from_minor(100));
        assert_eq!(cart.lines(&catalog).len(), 1);
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.set_quantity("B", 1);
        cart.set_quantity("A", 1);
        cart.set_quantity("B", 5); // in-place update keeps B first

        let ids: Vec<_> = cart.lines(&catalog).into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["B", "A"]);

        cart.set_quantity("B", 0);
        cart.set_quantity("B", 1); // re-added goes to the end
        let ids: Vec<_> = cart.lines(&catalog).into_iter().map(|l| l.id).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_stored_shape_preserves_order() {
        let mut cart = CartLedger::new();
        cart.set_quantity("m_tea", 2);
        cart.set_quantity("m_chapati", 3);

        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(json, r#"{"m_tea":2,"m_chapati":3}"#);

        let back: CartLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_stored_values_are_normalized() {
        let cart: CartLedger =
            serde_json::from_str(r#"{"A":0,"B":-2,"C":2.6,"D":5000}"#).unwrap();

        let entries: Vec<_> = cart.entries().collect();
        assert_eq!(entries, vec![("C", 3), ("D", 999)]);
    }

    #[test]
    fn test_non_numeric_stored_value_is_an_error() {
        assert!(serde_json::from_str::<CartLedger>(r#"{"A":"two"}"#).is_err());
        assert!(serde_json::from_str::<CartLedger>("[]").is_err());
    }
}
