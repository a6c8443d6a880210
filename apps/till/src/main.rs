//! # AgroPOS Till Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           agro-till                                     │
//! │                                                                         │
//! │  main.rs ────► agro_till::run()                                         │
//! │                                                                         │
//! │  lib.rs ─────► logging, config, store, Register                         │
//! │                                                                         │
//! │  commands/ ──► menu, cart, checkout, summary, receipt, view             │
//! │                                                                         │
//! └────────────────────────────────┬────────────────────────────────────────┘
//!                                  ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SQLite Database                                 │
//! │  agropos.db (local file, WAL mode)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exit Codes
//! - 0: Success
//! - 1: Storage or configuration error
//! - 2: Rejected input (empty cart, unknown item or bill)
//! - 3: Receipt reprint failed

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    agro_till::run()
}
