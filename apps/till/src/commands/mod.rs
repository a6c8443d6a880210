//! # Commands Module
//!
//! Every operation the counter exposes, as plain functions over the
//! [`Register`](crate::state::Register).
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── menu.rs     ◄─── Menu listing
//! ├── cart.rs     ◄─── Cart manipulation
//! ├── sale.rs     ◄─── Checkout, bill history, receipt reprint
//! ├── summary.rs  ◄─── Daily summary, full screen view
//! └── config.rs   ◄─── Configuration and restore status
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  agro-till add m_tea                                                    │
//! │         │                                                               │
//! │         │ (clap)                                                        │
//! │         ▼                                                               │
//! │  commands::cart::add_item(&mut register, "m_tea")                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<CartResponse, ApiError>                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  text on stdout, or JSON with --json                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands that depend on the time of day take `now` so tests can pin it.

pub mod cart;
pub mod config;
pub mod menu;
pub mod sale;
pub mod summary;
