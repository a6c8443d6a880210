//! # Sales Log
//!
//! The append-only history of every bill.
//!
//! There is no edit or delete. Appending the same bill twice is a caller
//! bug: the log does not deduplicate, because one checkout must always
//! produce exactly one entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bill::Bill;

/// Ordered, append-only sequence of bills.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalesLog {
    bills: Vec<Bill>,
}

impl SalesLog {
    pub fn new() -> Self {
        SalesLog::default()
    }

    /// Restores a log from previously stored bills (oldest first).
    pub fn from_bills(bills: Vec<Bill>) -> Self {
        SalesLog { bills }
    }

    /// Adds a bill at the end.
    pub fn append(&mut self, bill: Bill) {
        self.bills.push(bill);
    }

    /// Read-only view, oldest first.
    pub fn all(&self) -> &[Bill] {
        &self.bills
    }

    pub fn len(&self) -> usize {
        self.bills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bills.is_empty()
    }

    /// Finds a bill by id.
    pub fn find(&self, bill_id: &str) -> Option<&Bill> {
        self.bills.iter().find(|bill| bill.id == bill_id)
    }

    /// Latest `created_at` anywhere in the log.
    ///
    /// Scans every bill rather than trusting the tail, so a log written by
    /// an older build with out-of-order timestamps still seeds
    /// [`crate::bill::BillStamp`] correctly.
    pub fn latest_created_at(&self) -> Option<DateTime<Utc>> {
        self.bills.iter().map(|bill| bill.created_at).max()
    }

    /// Bills created at or after `start`, oldest first.
    pub fn since(&self, start: DateTime<Utc>) -> impl Iterator<Item = &Bill> {
        self.bills.iter().filter(move |bill| bill.created_at >= start)
    }
}
