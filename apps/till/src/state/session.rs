//! # Register Session
//!
//! The one context that owns everything a counter needs.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Register                                     │
//! │                                                                         │
//! │   catalog ─── loaded once (default menu on miss/corrupt)                │
//! │   cart ────── write-through: every change persisted immediately         │
//! │   sales ───── append-only, persisted on every checkout                  │
//! │   stamp ───── seeded from the newest bill, never goes backwards         │
//! │   store ───── Box<dyn KeyValueStore>                                    │
//! │                                                                         │
//! │   &mut self on every mutation: one actor, no locks                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Checkout
//! ```text
//! cart ──► billable lines? ── no ──► Err(EmptyCart)   (nothing changes)
//!               │
//!              yes
//!               ▼
//! generate bill ─► format receipt ─► print surface.open()
//!                                          │
//!                         printed = open succeeded
//!                                          ▼
//!               append to log ─► persist ─► clear cart ─► persist
//! ```
//! Store failures are logged and absorbed. The in-memory state is always
//! updated, so the counter keeps working for the rest of the session.

use std::fmt::Display;

use agro_core::{
    format_receipt, generate_bill, local_midnight, project, summarize, Bill, BillStamp,
    CartLedger, Catalog, CoreError, CoreResult, DailySummary, MoneyFormat, ReceiptConfig,
    ReceiptDocument, RegisterView, SalesLog,
};
use agro_db::{CartRepository, KeyValueStore, LoadSource, MenuRepository, SalesRepository};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::print::PrintSurface;
use crate::state::config::AppConfig;

/// Shown after a successful checkout.
pub const CHECKOUT_MESSAGE: &str = "Bill printed & saved to local sales history.";

/// How each piece of state was restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreReport {
    pub menu: LoadSource,
    pub cart: LoadSource,
    pub sales: LoadSource,
}

/// Result of a completed checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    pub bill: Bill,
    pub receipt: ReceiptDocument,

    /// Why the receipt was not printed, if it wasn't.
    pub print_warning: Option<String>,

    /// False when the sales log could not be written to the store.
    pub saved: bool,
}

impl CheckoutOutcome {
    /// Operator-facing summary line.
    pub fn message(&self) -> String {
        match (&self.print_warning, self.saved) {
            (None, true) => CHECKOUT_MESSAGE.to_string(),
            (Some(warning), true) => {
                format!("Bill saved to local sales history. Receipt not printed: {}", warning)
            }
            (None, false) => {
                "Bill printed. Sales history could not be saved on this device.".to_string()
            }
            (Some(warning), false) => format!(
                "Bill recorded for this session only. Receipt not printed: {}",
                warning
            ),
        }
    }
}

/// The counter session.
pub struct Register {
    store: Box<dyn KeyValueStore>,
    catalog: Catalog,
    cart: CartLedger,
    sales: SalesLog,
    stamp: BillStamp,
    money: MoneyFormat,
    receipt: ReceiptConfig,
    restored: RestoreReport,
}

impl Register {
    /// Restores a session from the store.
    ///
    /// Never fails: anything missing or unreadable falls back to its
    /// default (built-in menu, empty cart, empty log).
    pub fn open(store: Box<dyn KeyValueStore>, config: &AppConfig) -> Self {
        let menu = MenuRepository::new(store.as_ref()).load();
        let cart = CartRepository::new(store.as_ref()).load();
        let sales = SalesRepository::new(store.as_ref()).load();

        let restored = RestoreReport {
            menu: menu.source,
            cart: cart.source,
            sales: sales.source,
        };
        let stamp = BillStamp::seeded(sales.value.latest_created_at());

        info!(
            menu_items = menu.value.len(),
            cart_lines = cart.value.len(),
            bills = sales.value.len(),
            "Register opened"
        );

        Register {
            store,
            catalog: menu.value,
            cart: cart.value,
            sales: sales.value,
            stamp,
            money: config.money_format(),
            receipt: config.receipt_config(),
            restored,
        }
    }

    /// Opens with default configuration.
    pub fn with_defaults(store: Box<dyn KeyValueStore>) -> Self {
        Register::open(store, &AppConfig::default())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &CartLedger {
        &self.cart
    }

    pub fn sales(&self) -> &SalesLog {
        &self.sales
    }

    pub fn money(&self) -> &MoneyFormat {
        &self.money
    }

    pub fn restored(&self) -> RestoreReport {
        self.restored
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    // =========================================================================
    // Cart Mutations (write-through)
    // =========================================================================

    /// Sets a quantity (clamped to 0..=999; 0 removes). Returns what was stored.
    pub fn set_quantity(&mut self, item_id: &str, qty: i64) -> u32 {
        let stored = self.cart.set_quantity(item_id, qty);
        debug!(item_id = %item_id, requested = qty, stored, "Set quantity");
        self.persist_cart();
        stored
    }

    /// Sets a quantity from raw field text.
    pub fn set_quantity_input(&mut self, item_id: &str, raw: &str) -> u32 {
        let stored = self.cart.set_quantity_input(item_id, raw);
        debug!(item_id = %item_id, raw = %raw, stored, "Set quantity from input");
        self.persist_cart();
        stored
    }

    pub fn increment(&mut self, item_id: &str) -> u32 {
        let stored = self.cart.increment(item_id);
        debug!(item_id = %item_id, stored, "Increment");
        self.persist_cart();
        stored
    }

    pub fn decrement(&mut self, item_id: &str) -> u32 {
        let stored = self.cart.decrement(item_id);
        debug!(item_id = %item_id, stored, "Decrement");
        self.persist_cart();
        stored
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        debug!("Cart cleared");
        self.persist_cart();
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Turns the cart into a bill.
    ///
    /// ## Errors
    /// [`CoreError::EmptyCart`] when no cart entry matches the menu. Nothing
    /// is generated, printed, logged or cleared in that case.
    pub fn checkout<Tz>(
        &mut self,
        printer: &mut dyn PrintSurface,
        now: DateTime<Tz>,
    ) -> CoreResult<CheckoutOutcome>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        if self.cart.lines(&self.catalog).is_empty() {
            debug!(entries = self.cart.len(), "Checkout rejected: nothing billable");
            return Err(CoreError::EmptyCart);
        }

        let tz = now.timezone();
        let mut bill = generate_bill(
            &self.cart,
            &self.catalog,
            &mut self.stamp,
            now.with_timezone(&Utc),
        );
        let receipt = format_receipt(&bill, &self.receipt, &tz);

        let print_warning = match printer.open(&receipt) {
            Ok(()) => None,
            Err(e) => {
                warn!(bill_id = %bill.id, error = %e, "Receipt not printed");
                Some(e.to_string())
            }
        };
        bill.printed = print_warning.is_none();

        self.sales.append(bill.clone());
        let saved = self.persist_sales();

        self.cart.clear();
        self.persist_cart();

        info!(
            bill_id = %bill.id,
            subtotal = bill.subtotal.minor(),
            items = bill.total_quantity(),
            printed = bill.printed,
            saved,
            "Checkout complete"
        );

        Ok(CheckoutOutcome {
            bill,
            receipt,
            print_warning,
            saved,
        })
    }

    // =========================================================================
    // Read Side
    // =========================================================================

    /// Today's summary as of `now`.
    pub fn summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DailySummary {
        summarize(&self.sales, now)
    }

    /// Everything the counter screen shows.
    pub fn view<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> RegisterView {
        project(&self.catalog, &self.cart, &self.sales, now, &self.money)
    }

    /// Bills created since local midnight of `now`, oldest first.
    pub fn bills_today<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<&Bill> {
        self.sales.since(local_midnight(now)).collect()
    }

    /// Formats a stored bill again (reprint).
    pub fn receipt<Tz>(&self, bill_id: &str, tz: &Tz) -> CoreResult<ReceiptDocument>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let bill = self
            .sales
            .find(bill_id)
            .ok_or_else(|| CoreError::BillNotFound(bill_id.to_string()))?;
        Ok(format_receipt(bill, &self.receipt, tz))
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn persist_cart(&self) -> bool {
        match CartRepository::new(self.store.as_ref()).save(&self.cart) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Cart not persisted");
                false
            }
        }
    }

    fn persist_sales(&self) -> bool {
        match SalesRepository::new(self.store.as_ref()).save(&self.sales) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, bills = self.sales.len(), "Sales log not persisted");
                false
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
