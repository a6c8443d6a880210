//! # agro-core: Pure Business Logic for AgroPOS
//!
//! Everything the counter computes lives here as pure functions with zero
//! I/O dependencies. Storage, printing and the wall clock are supplied by
//! the caller.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        AgroPOS Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Renderer (web page / terminal)                  │   │
//! │  │        Menu rows ──► Cart panel ──► Receipt ──► Summary         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ RegisterView                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               till app (Register session, commands)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ agro-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   catalog   cart   bill   sales   summary   receipt   view      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO CLOCK READS • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                agro-db (key → JSON persistence)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer money and display formatting
//! - [`catalog`] - Menu items and the default menu
//! - [`cart`] - Cart ledger (id → quantity) and resolved line items
//! - [`bill`] - Bill snapshots, id/timestamp issuing
//! - [`sales`] - Append-only sales log
//! - [`summary`] - Same-day revenue / most sold / item count
//! - [`receipt`] - Receipt document and plain-text layout
//! - [`view`] - State → view-model projection
//! - [`validation`] - Quantity normalization, menu checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use agro_core::{generate_bill, summarize, BillStamp, CartLedger, Catalog, SalesLog};
//! use chrono::Utc;
//!
//! let catalog = Catalog::default();
//! let mut cart = CartLedger::new();
//! cart.set_quantity("m_chicken_rice", 2);
//! cart.increment("m_tea");
//!
//! let now = Utc::now();
//! let bill = generate_bill(&cart, &catalog, &mut BillStamp::new(), now);
//! assert_eq!(bill.subtotal.minor(), 210);
//!
//! let mut sales = SalesLog::new();
//! sales.append(bill);
//! cart.clear();
//!
//! let summary = summarize(&sales, &now);
//! assert_eq!(summary.total_items_sold_today, 3);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod receipt;
pub mod sales;
pub mod summary;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use bill::{generate_bill, Bill, BillStamp};
pub use cart::{CartLedger, LineItem};
pub use catalog::{default_menu, Catalog, CatalogItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, MoneyFormat};
pub use receipt::{format_receipt, ReceiptConfig, ReceiptDocument, ReceiptLine};
pub use sales::SalesLog;
pub use summary::{local_midnight, summarize, DailySummary, NO_SALES_SENTINEL};
pub use view::{
    project, project_cart, project_summary, CartView, MenuRow, RegisterView, SummaryView,
};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single item in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: u32 = 999;
