//! # Config Commands
//!
//! Restore diagnostics.

use agro_db::LoadSource;
use serde::Serialize;
use tracing::debug;

use crate::state::{AppConfig, Register};

/// How the session was restored and how much it holds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub shop_name: String,
    pub menu_source: String,
    pub cart_source: String,
    pub sales_source: String,
    pub menu_items: usize,
    pub cart_lines: usize,
    pub bills: usize,
    /// True when anything was replaced by a default because it was unreadable
    pub fell_back: bool,
}

fn describe(source: LoadSource) -> String {
    match source {
        LoadSource::Stored => "stored",
        LoadSource::Missing => "default (not stored yet)",
        LoadSource::Corrupt => "default (stored value unreadable)",
        LoadSource::Unavailable => "default (storage unavailable)",
    }
    .to_string()
}

pub fn get_status(register: &Register, config: &AppConfig) -> StatusResponse {
    debug!("get_status command");

    let restored = register.restored();
    StatusResponse {
        shop_name: config.shop_name.clone(),
        menu_source: describe(restored.menu),
        cart_source: describe(restored.cart),
        sales_source: describe(restored.sales),
        menu_items: register.catalog().len(),
        cart_lines: register.cart().len(),
        bills: register.sales().len(),
        fell_back: restored.menu.is_fallback()
            || restored.cart.is_fallback()
            || restored.sales.is_fallback(),
    }
}
