//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`--db`, `--receipts-dir`)
//! 2. Environment variables (`AGRO_*`)
//! 3. Defaults (this file)
//!
//! Read-only after startup.

use std::path::PathBuf;

use agro_core::receipt::{MAX_RECEIPT_WIDTH, MIN_RECEIPT_WIDTH};
use agro_core::validation::validate_date_format;
use agro_core::{MoneyFormat, ReceiptConfig};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ApiError;

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "agropos.db";

/// Receipt directory name inside the data directory.
pub const RECEIPTS_DIR: &str = "receipts";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Shop name (receipt header)
    pub shop_name: String,

    /// Line under the shop name
    pub receipt_subtitle: String,

    /// Closing line of the receipt
    pub receipt_footer: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// chrono pattern for the receipt date line
    pub date_format: String,

    /// Paper width in characters (typically 32, 42, or 48)
    pub receipt_width: usize,

    /// Explicit database path; `None` uses the platform data directory
    pub database_path: Option<PathBuf>,

    /// Explicit receipts directory; `None` uses the platform data directory
    pub receipts_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    /// ## Default Values
    /// - Shop: "Roadside Hotel Demo"
    /// - Currency: ₹ with no decimals
    /// - Receipt: 32 columns
    fn default() -> Self {
        let receipt = ReceiptConfig::default();
        AppConfig {
            shop_name: receipt.shop_name,
            receipt_subtitle: receipt.subtitle,
            receipt_footer: receipt.footer,
            currency_symbol: receipt.money.symbol,
            currency_decimals: receipt.money.decimals,
            date_format: receipt.date_format,
            receipt_width: 32,
            database_path: None,
            receipts_dir: None,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `AGRO_*` environment variables.
    ///
    /// ## Environment Variables
    /// - `AGRO_SHOP_NAME`
    /// - `AGRO_CURRENCY_SYMBOL`
    /// - `AGRO_CURRENCY_DECIMALS` (0-4, ignored if unparsable)
    /// - `AGRO_DATE_FORMAT` (ignored if chrono cannot render it)
    /// - `AGRO_RECEIPT_WIDTH` (24-80, ignored if unparsable)
    /// - `AGRO_DB_PATH`
    /// - `AGRO_RECEIPTS_DIR`
    pub fn from_env() -> Self {
        AppConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(shop_name) = lookup("AGRO_SHOP_NAME") {
            config.shop_name = shop_name;
        }

        if let Some(symbol) = lookup("AGRO_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(decimals) = lookup("AGRO_CURRENCY_DECIMALS") {
            if let Ok(decimals) = decimals.trim().parse::<u8>() {
                config.currency_decimals = decimals.min(4);
            }
        }

        if let Some(pattern) = lookup("AGRO_DATE_FORMAT") {
            match validate_date_format(&pattern) {
                Ok(()) => config.date_format = pattern,
                Err(e) => warn!(error = %e, "Ignoring AGRO_DATE_FORMAT"),
            }
        }

        if let Some(width) = lookup("AGRO_RECEIPT_WIDTH") {
            if let Ok(width) = width.trim().parse::<usize>() {
                config.receipt_width = width.clamp(MIN_RECEIPT_WIDTH, MAX_RECEIPT_WIDTH);
            }
        }

        if let Some(path) = lookup("AGRO_DB_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("AGRO_RECEIPTS_DIR") {
            config.receipts_dir = Some(PathBuf::from(path));
        }

        config
    }

    pub fn money_format(&self) -> MoneyFormat {
        MoneyFormat::new(self.currency_symbol.clone(), self.currency_decimals)
    }

    pub fn receipt_config(&self) -> ReceiptConfig {
        ReceiptConfig {
            shop_name: self.shop_name.clone(),
            subtitle: self.receipt_subtitle.clone(),
            footer: self.receipt_footer.clone(),
            money: self.money_format(),
            date_format: self.date_format.clone(),
        }
    }

    /// Resolves the database file path.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.agropos.till/agropos.db`
    /// - **Windows**: `%APPDATA%\agropos\till\data\agropos.db`
    /// - **Linux**: `~/.local/share/till/agropos.db`
    pub fn database_path(&self) -> Result<PathBuf, ApiError> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(DATABASE_FILE)),
        }
    }

    /// Resolves the receipts directory used by the file printer.
    pub fn receipts_dir(&self) -> Result<PathBuf, ApiError> {
        match &self.receipts_dir {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(RECEIPTS_DIR)),
        }
    }
}

fn data_dir() -> Result<PathBuf, ApiError> {
    ProjectDirs::from("com", "agropos", "till")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ApiError::config("Could not determine app data directory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use agro_core::Money;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_receipt_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.receipt_config(), ReceiptConfig::default());
        assert_eq!(config.money_format().format(Money::from_minor(260)), "₹260");
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("AGRO_SHOP_NAME", "Highway Dhaba"),
            ("AGRO_CURRENCY_SYMBOL", "$"),
            ("AGRO_CURRENCY_DECIMALS", "2"),
            ("AGRO_RECEIPT_WIDTH", "42"),
            ("AGRO_DB_PATH", "/tmp/agro.db"),
        ]));

        assert_eq!(config.shop_name, "Highway Dhaba");
        assert_eq!(config.money_format().format(Money::from_minor(1234)), "$12.34");
        assert_eq!(config.receipt_width, 42);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/agro.db"));
    }

    #[test]
    fn test_bad_numbers_are_ignored() {
        let config = AppConfig::from_lookup(lookup(&[
            ("AGRO_CURRENCY_DECIMALS", "two"),
            ("AGRO_RECEIPT_WIDTH", "-1"),
        ]));

        assert_eq!(config.currency_decimals, 0);
        assert_eq!(config.receipt_width, 32);
    }

    #[test]
    fn test_unrenderable_date_format_is_ignored() {
        let config = AppConfig::from_lookup(lookup(&[("AGRO_DATE_FORMAT", "%Q bad")]));
        assert_eq!(config.date_format, AppConfig::default().date_format);

        let config = AppConfig::from_lookup(lookup(&[("AGRO_DATE_FORMAT", "%Y-%m-%d %H:%M")]));
        assert_eq!(config.date_format, "%Y-%m-%d %H:%M");
    }

    #[test]
    fn test_receipt_width_is_clamped() {
        let config = AppConfig::from_lookup(lookup(&[("AGRO_RECEIPT_WIDTH", "1000000000000")]));
        assert_eq!(config.receipt_width, MAX_RECEIPT_WIDTH);

        let config = AppConfig::from_lookup(lookup(&[("AGRO_RECEIPT_WIDTH", "3")]));
        assert_eq!(config.receipt_width, MIN_RECEIPT_WIDTH);
    }
}
