//! # Sale Commands
//!
//! Checkout, bill history and receipt reprints.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  checkout ──► Register::checkout ──► bill + receipt                    │
//! │                     │                     │                             │
//! │                     │                     ▼                             │
//! │                     │              print surface (terminal/file/none)   │
//! │                     ▼                                                   │
//! │              sales log += bill, cart cleared                            │
//! │                                                                         │
//! │  "Bill printed & saved to local sales history."                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt::Display;

use agro_core::ReceiptDocument;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::print::PrintSurface;
use crate::state::Register;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub bill_id: String,
    pub subtotal_label: String,
    pub item_count: u32,
    pub printed: bool,
    pub saved: bool,
    pub message: String,
    pub receipt: ReceiptDocument,
}

/// One row of the bill history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillRow {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub item_count: u32,
    pub subtotal_label: String,
    pub printed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillsResponse {
    pub bills: Vec<BillRow>,
}

/// Completes the sale in the cart.
///
/// ## Errors
/// `EMPTY_CART` when there is nothing billable. A printer failure is not an
/// error: the bill is saved and `printed` is false.
pub fn checkout<Tz>(
    register: &mut Register,
    printer: &mut dyn PrintSurface,
    now: DateTime<Tz>,
) -> Result<CheckoutResponse, ApiError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    debug!("checkout command");

    let outcome = register.checkout(printer, now)?;
    let message = outcome.message();
    info!(bill_id = %outcome.bill.id, "{}", message);

    Ok(CheckoutResponse {
        bill_id: outcome.bill.id.clone(),
        subtotal_label: register.money().format(outcome.bill.subtotal),
        item_count: outcome.bill.total_quantity(),
        printed: outcome.bill.printed,
        saved: outcome.saved,
        message,
        receipt: outcome.receipt,
    })
}

/// Lists bills, oldest first. `today_only` keeps bills since local midnight.
pub fn list_bills<Tz: TimeZone>(
    register: &Register,
    now: &DateTime<Tz>,
    today_only: bool,
) -> BillsResponse {
    debug!(today_only, "list_bills command");

    let bills = if today_only {
        register.bills_today(now)
    } else {
        register.sales().all().iter().collect()
    };

    BillsResponse {
        bills: bills
            .into_iter()
            .map(|bill| BillRow {
                id: bill.id.clone(),
                created_at: bill.created_at,
                item_count: bill.total_quantity(),
                subtotal_label: register.money().format(bill.subtotal),
                printed: bill.printed,
            })
            .collect(),
    }
}

/// Formats a past bill again and sends it to `printer`.
///
/// Unlike checkout, a print failure here is returned as `PRINT_ERROR`.
pub fn reprint_receipt<Tz>(
    register: &Register,
    bill_id: &str,
    tz: &Tz,
    printer: &mut dyn PrintSurface,
) -> Result<ReceiptDocument, ApiError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    debug!(bill_id = %bill_id, "reprint_receipt command");

    let receipt = register.receipt(bill_id, tz)?;
    printer.open(&receipt)?;
    Ok(receipt)
}
