//! # Summary Aggregator
//!
//! Same-day figures computed from the sales log on demand. Nothing here is
//! stored; the log is the source of truth.
//!
//! ## Today Boundary
//! ```text
//!        yesterday              │               today
//!   ───────────────────────────┼──────────────────────────────►
//!                               │
//!                    local midnight of `now`
//!                    (in now's own timezone)
//!
//!   bill.created_at >= midnight  →  counted
//! ```
//!
//! Timestamps are compared as instants, never as strings, so bills written
//! with different precision or offsets still land on the correct side.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::sales::SalesLog;

/// Shown as the most sold item when nothing has been sold today.
pub const NO_SALES_SENTINEL: &str = "-";

/// Today's figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailySummary {
    /// Σ subtotal over today's bills.
    #[ts(type = "number")]
    pub total_revenue_today: Money,

    /// Name with the highest quantity sold today, or [`NO_SALES_SENTINEL`].
    pub most_sold_item_name: String,

    /// Quantity sold of that item (0 when nothing sold).
    pub most_sold_qty: u32,

    /// Σ quantities over today's bills.
    pub total_items_sold_today: u32,

    /// Number of bills counted.
    pub bill_count: usize,
}

impl DailySummary {
    /// The summary of a day with no sales.
    pub fn empty() -> Self {
        DailySummary {
            total_revenue_today: Money::zero(),
            most_sold_item_name: NO_SALES_SENTINEL.to_string(),
            most_sold_qty: 0,
            total_items_sold_today: 0,
            bill_count: 0,
        }
    }
}

/// Local midnight of `now`, as a UTC instant.
///
/// If midnight does not exist locally (a DST jump at 00:00) the first valid
/// local instant after it is used. If midnight happens twice, the earlier
/// one wins.
pub fn local_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let tz = now.timezone();
    let midnight = now.date_naive().and_time(NaiveTime::MIN);

    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            (1..=24 * 60).find_map(|minutes| {
                tz.from_local_datetime(&(midnight + Duration::minutes(minutes)))
                    .earliest()
            })
        })
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

/// Computes today's summary.
///
/// ## Steps
/// 1. `today_start` = local midnight of `now`
/// 2. Keep bills with `created_at >= today_start`
/// 3. Revenue = Σ subtotal
/// 4. Quantity per item **name**; most sold = strictly greatest total.
///    Ties go to the name encountered first while walking the log, which
///    depends on log order and is not a stable guarantee.
/// 5. Items sold = Σ quantities
pub fn summarize<Tz: TimeZone>(log: &SalesLog, now: &DateTime<Tz>) -> DailySummary {
    let today_start = local_midnight(now);

    let mut summary = DailySummary::empty();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, u32)> = Vec::new();

    for bill in log.since(today_start) {
        summary.bill_count += 1;
        summary.total_revenue_today += bill.subtotal;

        for item in &bill.items {
            summary.total_items_sold_today =
                summary.total_items_sold_today.saturating_add(item.qty);

            let slot = *index.entry(item.name.as_str()).or_insert_with(|| {
                counts.push((item.name.as_str(), 0));
                counts.len() - 1
            });
            counts[slot].1 = counts[slot].1.saturating_add(item.qty);
        }
    }

    for (name, qty) in counts {
        if qty > summary.most_sold_qty {
            summary.most_sold_item_name = name.to_string();
            summary.most_sold_qty = qty;
        }
    }

    summary
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::Bill;
    use crate::cart::LineItem;
    use chrono::FixedOffset;

    fn line(name: &str, price: i64, qty: u32) -> LineItem {
        LineItem {
            id: format!("m_{}", name.to_lowercase()),
            name: name.to_string(),
            unit_price: Money::from_minor(price),
            qty,
            line_total: Money::from_minor(price * qty as i64),
        }
    }

    fn bill(id: &str, created_at: DateTime<Utc>, items: Vec<LineItem>) -> Bill {
        let subtotal = items.iter().map(|i| i.line_total).sum();
        Bill {
            id: id.to_string(),
            created_at,
            items,
            subtotal,
            printed: true,
        }
    }

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
    }

    #[test]
    fn test_empty_log() {
        let now = ist().with_ymd_and_hms(2026, 10, 16, 18, 0, 0).unwrap();
        let summary = summarize(&SalesLog::new(), &now);

        assert_eq!(summary, DailySummary::empty());
        assert_eq!(summary.most_sold_item_name, NO_SALES_SENTINEL);
        assert!(summary.total_revenue_today.is_zero());
        assert_eq!(summary.total_items_sold_today, 0);
    }

    #[test]
    fn test_tea_and_dosa_example() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 15, 0, 0).unwrap();
        let morning = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
        let log = SalesLog::from_bills(vec![
            bill("b1", morning, vec![line("Tea", 10, 5)]),
            bill("b2", morning, vec![line("Tea", 10, 2), line("Dosa", 30, 1)]),
        ]);

        let summary = summarize(&log, &now);
        assert_eq!(summary.total_items_sold_today, 8);
        assert_eq!(summary.most_sold_item_name, "Tea");
        assert_eq!(summary.most_sold_qty, 7);
        assert_eq!(summary.total_revenue_today, Money::from_minor(100));
        assert_eq!(summary.bill_count, 2);
    }

    #[test]
    fn test_bills_before_local_midnight_are_excluded() {
        // 23:59 IST on the 15th is 18:29 UTC; midnight IST on the 16th is 18:30 UTC
        let now = ist().with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        let just_before = Utc.with_ymd_and_hms(2026, 10, 15, 18, 29, 59).unwrap();
        let at_midnight = Utc.with_ymd_and_hms(2026, 10, 15, 18, 30, 0).unwrap();

        let log = SalesLog::from_bills(vec![
            bill("yesterday", just_before, vec![line("Chapati", 20, 10)]),
            bill("today", at_midnight, vec![line("Tea", 10, 1)]),
        ]);

        let summary = summarize(&log, &now);
        assert_eq!(summary.bill_count, 1);
        assert_eq!(summary.total_items_sold_today, 1);
        assert_eq!(summary.most_sold_item_name, "Tea");
        assert_eq!(summary.total_revenue_today, Money::from_minor(10));
    }

    #[test]
    fn test_tie_goes_to_first_encountered() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 15, 0, 0).unwrap();
        let morning = Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap();
        let log = SalesLog::from_bills(vec![
            bill("b1", morning, vec![line("Dosa", 30, 2)]),
            bill("b2", morning, vec![line("Tea", 10, 2)]),
        ]);

        let summary = summarize(&log, &now);
        assert_eq!(summary.most_sold_item_name, "Dosa");
        assert_eq!(summary.most_sold_qty, 2);
    }

    #[test]
    fn test_oversized_values_saturate() {
        let now = ist().with_ymd_and_hms(2026, 10, 16, 18, 0, 0).unwrap();
        let at = now.with_timezone(&Utc);
        let mut huge = bill("b1", at, vec![line("Tea", 10, 4_000_000_000)]);
        huge.subtotal = Money::from_minor(i64::MAX);

        let log = SalesLog::from_bills(vec![huge.clone(), huge]);
        let summary = summarize(&log, &now);

        assert_eq!(summary.total_items_sold_today, u32::MAX);
        assert_eq!(summary.most_sold_qty, u32::MAX);
        assert_eq!(summary.total_revenue_today.minor(), i64::MAX);
    }

    #[test]
    fn test_local_midnight_in_offset() {
        let now = ist().with_ymd_and_hms(2026, 10, 16, 0, 15, 0).unwrap();
        assert_eq!(
            local_midnight(&now),
            Utc.with_ymd_and_hms(2026, 10, 15, 18, 30, 0).unwrap()
        );

        let utc_now = Utc.with_ymd_and_hms(2026, 10, 16, 23, 59, 59).unwrap();
        assert_eq!(
            local_midnight(&utc_now),
            Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap()
        );
    }
}
