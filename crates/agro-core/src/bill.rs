//! # Bill Generator
//!
//! Turns the current cart into an immutable bill.
//!
//! ## Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   CartLedger { A: 2, B: 3, GHOST: 1 }     Catalog { A: ₹100, B: ₹20 }   │
//! │            │                                      │                     │
//! │            └──────────────┬───────────────────────┘                     │
//! │                           ▼                                             │
//! │                  generate_bill(cart, catalog, stamp)                    │
//! │                           │                                             │
//! │                           ▼                                             │
//! │   Bill {                                                                │
//! │     items: [A × 2 = ₹200, B × 3 = ₹60]     ← GHOST dropped              │
//! │     subtotal: ₹260                                                      │
//! │   }                                                                     │
//! │                                                                         │
//! │   The bill owns copies of name/price/qty. Later cart edits cannot      │
//! │   reach it.                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{CartLedger, LineItem};
use crate::catalog::Catalog;
use crate::money::Money;

// =============================================================================
// Bill
// =============================================================================

/// An immutable snapshot of a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bill {
    /// Unique id: `bill_<unix millis>_<random suffix>`.
    pub id: String,

    /// When the bill was generated.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Lines in cart order.
    pub items: Vec<LineItem>,

    /// Σ line totals.
    #[ts(type = "number")]
    pub subtotal: Money,

    /// Whether the receipt was handed to a print surface.
    #[serde(default)]
    pub printed: bool,
}

impl Bill {
    /// Sum of quantities across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |total, item| total.saturating_add(item.qty))
    }
}

// =============================================================================
// Bill Stamp
// =============================================================================

/// Issues bill ids and creation timestamps.
///
/// ## Ordering Guarantee
/// Timestamps never go backwards relative to previously issued ones, even
/// if the wall clock does (NTP step, manual change). Seed it with the
/// newest `created_at` in the sales log so the guarantee holds across
/// restarts.
#[derive(Debug, Clone, Default)]
pub struct BillStamp {
    last: Option<DateTime<Utc>>,
}

impl BillStamp {
    pub fn new() -> Self {
        BillStamp::default()
    }

    /// Starts after an already issued timestamp.
    pub fn seeded(last: Option<DateTime<Utc>>) -> Self {
        BillStamp { last }
    }

    /// Issues `(id, created_at)` for a bill generated at `now`.
    pub fn issue(&mut self, now: DateTime<Utc>) -> (String, DateTime<Utc>) {
        let created_at = match self.last {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last = Some(created_at);

        let suffix = Uuid::new_v4().simple().to_string();
        let id = format!("bill_{}_{}", created_at.timestamp_millis(), &suffix[..8]);
        (id, created_at)
    }
}

// =============================================================================
// Generation
// =============================================================================

/// Snapshots the cart into a bill.
///
/// Entries without a catalog match are dropped silently. The returned bill
/// has `printed == false`; the caller sets it once the print outcome is
/// known.
pub fn generate_bill(
    cart: &CartLedger,
    catalog: &Catalog,
    stamp: &mut BillStamp,
    now: DateTime<Utc>,
) -> Bill {
    let items = cart.lines(catalog);
    let subtotal = items.iter().map(|item| item.line_total).sum();
    let (id, created_at) = stamp.issue(now);

    Bill {
        id,
        created_at,
        items,
        subtotal,
        printed: false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use chrono::{Duration, TimeZone};
    use std::collections::HashSet;

    fn test_catalog() -> Catalog {
        Catalog::new(vec![
            CatalogItem::new("A", "Alpha", Money::from_minor(100)),
            CatalogItem::new("B", "Beta", Money::from_minor(20)),
        ])
        .unwrap()
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_generate_bill_example() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.set_quantity("A", 2);
        cart.set_quantity("B", 3);

        let bill = generate_bill(&cart, &catalog, &mut BillStamp::new(), noon());

        assert_eq!(bill.items.len(), 2);
        assert_eq!(bill.items[0].id, "A");
        assert_eq!(bill.items[0].qty, 2);
        assert_eq!(bill.items[0].line_total, Money::from_minor(200));
        assert_eq!(bill.items[1].id, "B");
        assert_eq!(bill.items[1].qty, 3);
        assert_eq!(bill.items[1].line_total, Money::from_minor(60));
        assert_eq!(bill.subtotal, Money::from_minor(260));
        assert_eq!(bill.subtotal, cart.subtotal(&catalog));
        assert_eq!(bill.created_at, noon());
        assert!(!bill.printed);
    }

    #[test]
    fn test_unknown_ids_are_dropped() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.set_quantity("GHOST", 2);
        cart.set_quantity("B", 1);

        let bill = generate_bill(&cart, &catalog, &mut BillStamp::new(), noon());
        assert_eq!(bill.items.len(), 1);
        assert_eq!(bill.subtotal, Money::from_minor(20));
    }

    #[test]
    fn test_bill_is_frozen() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.set_quantity("A", 1);

        let bill = generate_bill(&cart, &catalog, &mut BillStamp::new(), noon());
        let before = bill.clone();

        cart.set_quantity("A", 7);
        cart.set_quantity("B", 2);
        cart.clear();

        assert_eq!(bill, before);
    }

    #[test]
    fn test_stamp_never_goes_backwards() {
        let mut stamp = BillStamp::new();
        let (_, first) = stamp.issue(noon());
        let (_, second) = stamp.issue(noon() - Duration::hours(1));
        let (_, third) = stamp.issue(noon() + Duration::seconds(1));

        assert_eq!(first, noon());
        assert_eq!(second, noon());
        assert_eq!(third, noon() + Duration::seconds(1));
    }

    #[test]
    fn test_seeded_stamp_respects_history() {
        let mut stamp = BillStamp::seeded(Some(noon()));
        let (_, created_at) = stamp.issue(noon() - Duration::minutes(5));
        assert_eq!(created_at, noon());
    }

    #[test]
    fn test_ids_are_unique_within_same_millisecond() {
        let mut stamp = BillStamp::new();
        let ids: HashSet<_> = (0..200).map(|_| stamp.issue(noon()).0).collect();
        assert_eq!(ids.len(), 200);
        assert!(ids.iter().all(|id| id.starts_with("bill_")));
    }

    #[test]
    fn test_stored_shape() {
        let catalog = test_catalog();
        let mut cart = CartLedger::new();
        cart.set_quantity("A", 2);
        let bill = generate_bill(&cart, &catalog, &mut BillStamp::new(), noon());

        let value = serde_json::to_value(&bill).unwrap();
        assert_eq!(value["created_at"], "2026-10-16T12:00:00Z");
        assert_eq!(value["items"][0]["unit_price"], 100);
        assert_eq!(value["items"][0]["total"], 200);
        assert_eq!(value["subtotal"], 200);

        // Records written before the `printed` flag existed still load
        let legacy = r#"{"id":"bill_1","created_at":"2026-10-16T06:30:00.000Z",
            "items":[{"id":"m_tea","name":"Tea","unit_price":10,"qty":5,"total":50}],
            "subtotal":50}"#;
        let bill: Bill = serde_json::from_str(legacy).unwrap();
        assert!(!bill.printed);
        assert_eq!(bill.total_quantity(), 5);
    }
}
