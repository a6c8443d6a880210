//! # Validation Module
//!
//! Input normalization and menu validation for AgroPOS.
//!
//! ## Kinds of Input
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Quantity input (operator, every keystroke)                            │
//! │  ├── NEVER rejected                                                    │
//! │  └── Clamped to 0..=999, fractions rounded, junk → 0                   │
//! │                                                                         │
//! │  Menu data (restored from storage)                                     │
//! │  ├── Checked once at load                                              │
//! │  └── Invalid menu → treated like a missing one (default menu)          │
//! │                                                                         │
//! │  Stored bills                                                          │
//! │  └── Inconsistent bill → skipped at load                               │
//! │                                                                         │
//! │  Receipt date pattern (configuration)                                  │
//! │  └── Unknown specifier → default pattern kept                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use agro_core::validation::{clamp_quantity, parse_quantity_input};
//!
//! assert_eq!(clamp_quantity(-3), 0);
//! assert_eq!(clamp_quantity(5000), 999);
//! assert_eq!(parse_quantity_input("2.6"), 3);
//! assert_eq!(parse_quantity_input("abc"), 0);
//! ```

use std::collections::HashSet;

use chrono::format::{Item, StrftimeItems};

use crate::bill::Bill;
use crate::catalog::CatalogItem;
use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest menu item name accepted from storage.
pub const MAX_ITEM_NAME_LEN: usize = 200;

/// Highest unit price accepted, in minor units.
///
/// Keeps `price × 999` and a day's worth of bills far inside `i64`.
pub const MAX_UNIT_PRICE: i64 = 1_000_000_000;

// =============================================================================
// Quantity Normalization
// =============================================================================

/// Clamps an integer quantity into `0..=MAX_ITEM_QUANTITY`.
#[inline]
pub fn clamp_quantity(qty: i64) -> u32 {
    qty.clamp(0, MAX_ITEM_QUANTITY as i64) as u32
}

/// Rounds a fractional quantity and clamps it.
///
/// ## Rules
/// - NaN → 0
/// - Rounded half away from zero (`2.5` → 3)
/// - Negative → 0, anything above 999 (including +∞) → 999
pub fn clamp_quantity_f64(qty: f64) -> u32 {
    if qty.is_nan() {
        return 0;
    }
    qty.round().clamp(0.0, MAX_ITEM_QUANTITY as f64) as u32
}

/// Normalizes raw text typed into a quantity field.
///
/// ## Rules
/// ```text
/// ""        → 0       (empty field)
/// "7"       → 7
/// " 2.6 "   → 3       (rounded)
/// "-4"      → 0
/// "12abc"   → 12      (leading integer, like a lenient number field)
/// "1e3"     → 1
/// "inf"     → 0
/// "abc"     → 0
/// "100000"  → 999
/// ```
pub fn parse_quantity_input(raw: &str) -> u32 {
    let raw = raw.trim();

    if raw.is_empty() {
        return 0;
    }

    if is_plain_decimal(raw) {
        if let Ok(value) = raw.parse::<f64>() {
            return clamp_quantity_f64(value);
        }
    }

    // Fall back to the leading run of an optional sign plus digits
    let prefix_len = raw
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')))
        .count();

    match raw[..prefix_len].parse::<i64>() {
        Ok(value) => clamp_quantity(value),
        // Digits overflowing i64 are still a (very large) positive number
        Err(_) if prefix_len > 1 && !raw.starts_with('-') => MAX_ITEM_QUANTITY,
        Err(_) => 0,
    }
}

/// `[+-]digits[.digits]` with at least one digit. Rules out `inf`, `NaN`
/// and exponents, which `f64::from_str` would otherwise accept.
fn is_plain_decimal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(&['+', '-'][..]).unwrap_or(raw);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    !(whole.is_empty() && fraction.is_empty())
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// Menu Validators
// =============================================================================

/// Validates a menu item id.
///
/// ## Rules
/// - Must not be empty after trimming
pub fn validate_item_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    Ok(())
}

/// Validates a menu item name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_ITEM_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_ITEM_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a unit price in minor units.
///
/// ## Rules
/// - Zero is allowed (free items)
/// - At most [`MAX_UNIT_PRICE`]
pub fn validate_price(minor: i64) -> ValidationResult<()> {
    if !(0..=MAX_UNIT_PRICE).contains(&minor) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE,
        });
    }

    Ok(())
}

/// Validates a whole menu: every item valid, ids unique.
///
/// ## Example
/// ```rust
/// use agro_core::catalog::default_menu;
/// use agro_core::validation::validate_menu;
///
/// assert!(validate_menu(&default_menu()).is_ok());
/// ```
pub fn validate_menu(items: &[CatalogItem]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        validate_item_id(&item.id)?;
        validate_item_name(&item.name)?;
        validate_price(item.unit_price.minor())?;

        if !seen.insert(item.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: item.id.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Bill Validators
// =============================================================================

/// Checks a bill restored from storage is internally consistent.
///
/// ## Rules
/// - Every line: quantity in `1..=999`, valid unit price,
///   `line_total == unit_price × qty`
/// - `subtotal == Σ line_total`
pub fn validate_bill(bill: &Bill) -> ValidationResult<()> {
    for item in &bill.items {
        if !(1..=MAX_ITEM_QUANTITY).contains(&item.qty) {
            return Err(ValidationError::OutOfRange {
                field: "qty".to_string(),
                min: 1,
                max: MAX_ITEM_QUANTITY as i64,
            });
        }

        validate_price(item.unit_price.minor())?;

        if item.line_total != item.unit_price.multiply_quantity(item.qty) {
            return Err(ValidationError::Invalid {
                field: "total".to_string(),
                reason: format!("{} is not unit price × qty", item.line_total.minor()),
            });
        }
    }

    let expected: i64 = bill.items.iter().map(|item| item.line_total.minor()).sum();
    if bill.subtotal.minor() != expected {
        return Err(ValidationError::Invalid {
            field: "subtotal".to_string(),
            reason: format!("{} does not match line totals {}", bill.subtotal.minor(), expected),
        });
    }

    Ok(())
}

// =============================================================================
// Configuration Validators
// =============================================================================

/// Validates a chrono `strftime` pattern for the receipt date line.
///
/// ## Example
/// ```rust
/// use agro_core::validation::validate_date_format;
///
/// assert!(validate_date_format("%d/%m/%Y, %I:%M:%S %p").is_ok());
/// assert!(validate_date_format("%Q").is_err());
/// ```
pub fn validate_date_format(pattern: &str) -> ValidationResult<()> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(ValidationError::Invalid {
            field: "date_format".to_string(),
            reason: format!("unsupported pattern '{}'", pattern),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
