//! # View Projection
//!
//! Pure state → view-model function. A renderer (web page, terminal, test)
//! draws whatever this returns and never reads the cart or log directly.
//!
//! ```text
//! Catalog ─┐
//! Cart ────┼──► project(..) ──► RegisterView { menu, cart, summary } ──► renderer
//! Sales ───┘
//! ```

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLedger;
use crate::catalog::Catalog;
use crate::money::MoneyFormat;
use crate::sales::SalesLog;
use crate::summary::{summarize, DailySummary};

/// One row of the menu: item details plus the quantity currently in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuRow {
    pub id: String,
    pub name: String,
    pub price_label: String,
    pub image: Option<String>,
    /// Value for the quantity field (0 when not in the cart)
    pub qty: u32,
}

/// One cart line as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    /// e.g. `₹100 × 2`
    pub meta: String,
    pub total_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal_label: String,
    /// True when nothing billable is in the cart
    pub is_empty: bool,
    pub total_quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SummaryView {
    pub revenue_label: String,
    pub most_sold: String,
    pub most_sold_qty: u32,
    pub items_sold: u32,
    pub bill_count: usize,
}

/// Everything the counter screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegisterView {
    pub menu: Vec<MenuRow>,
    pub cart: CartView,
    pub summary: SummaryView,
}

/// Projects just the cart panel.
pub fn project_cart(catalog: &Catalog, cart: &CartLedger, money: &MoneyFormat) -> CartView {
    let lines: Vec<CartLineView> = cart
        .lines(catalog)
        .into_iter()
        .map(|line| CartLineView {
            meta: format!("{} × {}", money.format(line.unit_price), line.qty),
            total_label: money.format(line.line_total),
            id: line.id,
            name: line.name,
        })
        .collect();

    CartView {
        is_empty: lines.is_empty(),
        lines,
        subtotal_label: money.format(cart.subtotal(catalog)),
        total_quantity: cart.total_quantity(catalog),
    }
}

/// Labels a computed summary.
pub fn project_summary(summary: DailySummary, money: &MoneyFormat) -> SummaryView {
    SummaryView {
        revenue_label: money.format(summary.total_revenue_today),
        most_sold: summary.most_sold_item_name,
        most_sold_qty: summary.most_sold_qty,
        items_sold: summary.total_items_sold_today,
        bill_count: summary.bill_count,
    }
}

/// Projects current state into a [`RegisterView`].
pub fn project<Tz: TimeZone>(
    catalog: &Catalog,
    cart: &CartLedger,
    sales: &SalesLog,
    now: &DateTime<Tz>,
    money: &MoneyFormat,
) -> RegisterView {
    let menu = catalog
        .items()
        .iter()
        .map(|item| MenuRow {
            id: item.id.clone(),
            name: item.name.clone(),
            price_label: money.format(item.unit_price),
            image: item.image.clone(),
            qty: cart.quantity(&item.id),
        })
        .collect();

    RegisterView {
        menu,
        cart: project_cart(catalog, cart, money),
        summary: project_summary(summarize(sales, now), money),
    }
}
