//! # Application State
//!
//! ```text
//! state/
//! ├── config.rs   ◄─── AppConfig (shop, currency, receipt, paths)
//! └── session.rs  ◄─── Register (catalog, cart, sales log, store)
//! ```

pub mod config;
pub mod session;

pub use config::AppConfig;
pub use session::{CheckoutOutcome, Register, RestoreReport, CHECKOUT_MESSAGE};
