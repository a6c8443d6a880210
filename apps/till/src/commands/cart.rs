//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐   add / set    ┌──────────┐   checkout   ┌──────────┐    │
//! │  │  Empty   │───────────────►│ In Cart  │─────────────►│   Bill   │    │
//! │  │  Cart    │◄───────────────│          │              │  (saved) │    │
//! │  └──────────┘  remove / clear└──────────┘              └────┬─────┘    │
//! │       ▲                                                     │          │
//! │       └─────────────────────────────────────────────────────┘          │
//! │                          cart cleared after checkout                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items must be on the menu to be added. Removing works for anything in
//! the cart, so stale ids left over from an older menu can still be
//! cleared out.

use agro_core::{project_cart, CartView, CoreError};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::Register;

/// Cart contents, plus the entry that just changed (if any).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub changed: Option<CartChange>,
    pub cart: CartView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartChange {
    pub id: String,
    /// Quantity now stored (0 = removed)
    pub qty: u32,
}

fn respond(register: &Register, changed: Option<CartChange>) -> CartResponse {
    CartResponse {
        changed,
        cart: project_cart(register.catalog(), register.cart(), register.money()),
    }
}

fn ensure_on_menu(register: &Register, item_id: &str) -> Result<(), ApiError> {
    if register.catalog().contains(item_id) {
        Ok(())
    } else {
        Err(CoreError::ItemNotFound(item_id.to_string()).into())
    }
}

/// Current cart contents.
pub fn get_cart(register: &Register) -> CartResponse {
    debug!("get_cart command");
    respond(register, None)
}

/// Sets an item's quantity from raw text ("3", "2.6", "", "abc").
///
/// Bad text is normalized, never rejected: `""`/`"abc"` → 0 (removed),
/// `"2.6"` → 3, `"5000"` → 999.
pub fn set_item(
    register: &mut Register,
    item_id: &str,
    raw_qty: &str,
) -> Result<CartResponse, ApiError> {
    debug!(item_id = %item_id, raw_qty = %raw_qty, "set_item command");

    if register.cart().quantity(item_id) == 0 {
        ensure_on_menu(register, item_id)?;
    }

    let qty = register.set_quantity_input(item_id, raw_qty);
    Ok(respond(
        register,
        Some(CartChange {
            id: item_id.to_string(),
            qty,
        }),
    ))
}

/// Adds one of an item.
pub fn add_item(register: &mut Register, item_id: &str) -> Result<CartResponse, ApiError> {
    debug!(item_id = %item_id, "add_item command");
    ensure_on_menu(register, item_id)?;

    let qty = register.increment(item_id);
    Ok(respond(
        register,
        Some(CartChange {
            id: item_id.to_string(),
            qty,
        }),
    ))
}

/// Takes one of an item off (removing the line at zero).
pub fn remove_item(register: &mut Register, item_id: &str) -> Result<CartResponse, ApiError> {
    debug!(item_id = %item_id, "remove_item command");

    if register.cart().quantity(item_id) == 0 {
        ensure_on_menu(register, item_id)?;
    }

    let qty = register.decrement(item_id);
    Ok(respond(
        register,
        Some(CartChange {
            id: item_id.to_string(),
            qty,
        }),
    ))
}

/// Empties the cart.
pub fn clear_cart(register: &mut Register) -> CartResponse {
    debug!("clear_cart command");
    register.clear_cart();
    respond(register, None)
}
