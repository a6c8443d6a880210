//! # Sales Repository
//!
//! The sales log is stored as one JSON array of bills, oldest first.
//!
//! ## Partial Damage
//! ```text
//! [ bill, bill, {garbage}, bill ]   →  3 bills restored, 1 skipped (warn!)
//! [ bill, {qty: 4000000000} ]       →  1 bill restored, 1 skipped (warn!)
//! {not an array}                    →  empty log (Corrupt)
//! ```
//! A single unreadable bill does not throw away the rest of the day.

use agro_core::validation::validate_bill;
use agro_core::{Bill, SalesLog};
use tracing::{info, warn};

use super::{load_json, save_json, LoadSource, Loaded, SALES_KEY};
use crate::error::DbResult;
use crate::store::KeyValueStore;

/// Repository for the persisted sales log.
pub struct SalesRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> SalesRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        SalesRepository { store }
    }

    /// Loads the log, skipping bills that no longer parse.
    pub fn load(&self) -> Loaded<SalesLog> {
        let loaded = load_json::<Option<Vec<serde_json::Value>>, _>(self.store, SALES_KEY, || None);

        let raw_bills = match (loaded.value, loaded.source) {
            (Some(raw), _) => raw,
            (None, LoadSource::Stored) => {
                warn!("Stored sales log is null, starting empty");
                return Loaded {
                    value: SalesLog::new(),
                    source: LoadSource::Corrupt,
                };
            }
            (None, source) => {
                return Loaded {
                    value: SalesLog::new(),
                    source,
                }
            }
        };

        let total = raw_bills.len();
        let bills: Vec<Bill> = raw_bills
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| match serde_json::from_value::<Bill>(raw) {
                Ok(bill) => match validate_bill(&bill) {
                    Ok(()) => Some(bill),
                    Err(e) => {
                        warn!(index, bill_id = %bill.id, error = %e, "Skipping inconsistent bill");
                        None
                    }
                },
                Err(e) => {
                    warn!(index, error = %e, "Skipping unreadable bill");
                    None
                }
            })
            .collect();

        info!(bills = bills.len(), skipped = total - bills.len(), "Sales log loaded");

        Loaded {
            value: SalesLog::from_bills(bills),
            source: LoadSource::Stored,
        }
    }

    /// Writes the full log.
    pub fn save(&self, log: &SalesLog) -> DbResult<()> {
        save_json(self.store, SALES_KEY, log)
    }
}
