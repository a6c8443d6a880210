//! # Receipt Formatter
//!
//! Pure transformation from a [`Bill`] to a display document. The print
//! surface (terminal, file, printer driver, web view) decides how to show
//! it; [`ReceiptDocument::render_text`] covers fixed-width outputs.
//!
//! ## Layout
//! ```text
//! ┌────────────────────────────────┐
//! │      Roadside Hotel Demo       │  shop name
//! │         Simple Receipt         │  subtitle
//! │Date: 16/10/2026, 06:05:12 PM   │  date in the configured zone
//! │--------------------------------│
//! │Item                  Qty  Total│
//! │Chicken Rice            2   ₹200│
//! │  @ ₹100                        │  unit price
//! │Extra Crispy Masal…     1    ₹45│  names > 20 chars truncated
//! │  @ ₹45                         │
//! │--------------------------------│
//! │Subtotal                    ₹245│
//! │    Thank you! Visit again.     │
//! └────────────────────────────────┘
//! ```

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write};
use ts_rs::TS;

use crate::bill::Bill;
use crate::money::MoneyFormat;

/// Names longer than this many characters are truncated.
pub const NAME_DISPLAY_WIDTH: usize = 20;

/// Characters kept before the ellipsis when a name is truncated.
pub const NAME_TRUNCATED_KEEP: usize = 18;

/// Marker appended to truncated names.
pub const ELLIPSIS: char = '…';

/// Narrowest text layout; narrower requests are widened to this.
pub const MIN_RECEIPT_WIDTH: usize = 24;

/// Widest text layout; wider requests are narrowed to this.
pub const MAX_RECEIPT_WIDTH: usize = 80;

/// Shop-level receipt settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptConfig {
    pub shop_name: String,
    pub subtitle: String,
    pub footer: String,
    pub money: MoneyFormat,
    /// chrono `strftime` pattern for the date line
    pub date_format: String,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        ReceiptConfig {
            shop_name: "Roadside Hotel Demo".to_string(),
            subtitle: "Simple Receipt".to_string(),
            footer: "Thank you! Visit again.".to_string(),
            money: MoneyFormat::default(),
            date_format: "%d/%m/%Y, %I:%M:%S %p".to_string(),
        }
    }
}

/// One item row on the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReceiptLine {
    /// Possibly truncated display name
    pub name: String,
    pub qty: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// A fully formatted receipt, ready for a print surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReceiptDocument {
    pub bill_id: String,
    pub shop_name: String,
    pub subtitle: String,
    pub date_line: String,
    pub lines: Vec<ReceiptLine>,
    pub subtotal: String,
    pub footer: String,
}

/// Truncates a name to the display width.
///
/// ## Example
/// ```rust
/// use agro_core::receipt::truncate_name;
///
/// assert_eq!(truncate_name("Tea"), "Tea");
/// assert_eq!(truncate_name("Extra Crispy Masala Dosa"), "Extra Crispy Masal…");
/// ```
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() <= NAME_DISPLAY_WIDTH {
        return name.to_string();
    }

    let mut short: String = name.chars().take(NAME_TRUNCATED_KEEP).collect();
    short.push(ELLIPSIS);
    short
}

/// Shortens `text` to at most `width` characters, ending in an ellipsis
/// when cut.
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }

    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push(ELLIPSIS);
    short
}

/// `Date: <created>` in the configured pattern, or RFC 3339 when the
/// pattern cannot be rendered.
fn date_line<Tz>(created: &DateTime<Tz>, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut rendered = String::new();
    if write!(rendered, "{}", created.format(pattern)).is_err() {
        rendered = created.to_rfc3339();
    }
    format!("Date: {}", rendered)
}

/// Formats a bill. Deterministic for the same bill, config and zone.
pub fn format_receipt<Tz>(bill: &Bill, config: &ReceiptConfig, tz: &Tz) -> ReceiptDocument
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let created = bill.created_at.with_timezone(tz);

    ReceiptDocument {
        bill_id: bill.id.clone(),
        shop_name: config.shop_name.clone(),
        subtitle: config.subtitle.clone(),
        date_line: date_line(&created, &config.date_format),
        lines: bill
            .items
            .iter()
            .map(|item| ReceiptLine {
                name: truncate_name(&item.name),
                qty: item.qty,
                unit_price: config.money.format(item.unit_price),
                line_total: config.money.format(item.line_total),
            })
            .collect(),
        subtotal: config.money.format(bill.subtotal),
        footer: config.footer.clone(),
    }
}

impl ReceiptDocument {
    /// Lays the receipt out as plain text, `width` characters wide.
    ///
    /// `width` is clamped to [`MIN_RECEIPT_WIDTH`]`..=`[`MAX_RECEIPT_WIDTH`].
    /// Names are cut to fit the item column.
    pub fn render_text(&self, width: usize) -> String {
        let qty_col = 5;
        let total_col = 9;
        let width = width.clamp(MIN_RECEIPT_WIDTH, MAX_RECEIPT_WIDTH);
        let name_col = width - qty_col - total_col;
        let rule = "-".repeat(width);
        let mut out = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", center(&self.shop_name, width));
        let _ = writeln!(out, "{}", center(&self.subtitle, width));
        let _ = writeln!(out, "{}", self.date_line);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(
            out,
            "{:<name_col$}{:>qty_col$}{:>total_col$}",
            "Item", "Qty", "Total"
        );

        for line in &self.lines {
            let _ = writeln!(
                out,
                "{:<name_col$}{:>qty_col$}{:>total_col$}",
                fit(&line.name, name_col - 1),
                line.qty,
                line.line_total
            );
            let _ = writeln!(out, "  @ {}", line.unit_price);
        }

        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(
            out,
            "{:<label$}{:>total_col$}",
            "Subtotal",
            self.subtotal,
            label = width - total_col
        );
        let _ = writeln!(out, "{}", center(&self.footer, width));
        out
    }
}

fn center(text: &str, width: usize) -> String {
    format!("{:^width$}", text).trim_end().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::LineItem;
    use crate::money::Money;
    use chrono::{FixedOffset, Utc};

    fn sample_bill() -> Bill {
        Bill {
            id: "bill_1".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 16, 12, 35, 12).unwrap(),
            items: vec![
                LineItem {
                    id: "m_chicken_rice".to_string(),
                    name: "Chicken Rice".to_string(),
                    unit_price: Money::from_minor(100),
                    qty: 2,
                    line_total: Money::from_minor(200),
                },
                LineItem {
                    id: "m_special".to_string(),
                    name: "Extra Crispy Masala Dosa".to_string(),
                    unit_price: Money::from_minor(45),
                    qty: 1,
                    line_total: Money::from_minor(45),
                },
            ],
            subtotal: Money::from_minor(245),
            printed: false,
        }
    }

    #[test]
    fn test_truncate_name_boundaries() {
        let twenty = "A".repeat(20);
        assert_eq!(truncate_name(&twenty), twenty);

        let twenty_one = "B".repeat(21);
        let short = truncate_name(&twenty_one);
        assert_eq!(short.chars().count(), 19);
        assert!(short.ends_with(ELLIPSIS));

        // Counts characters, not bytes
        let tamil = "தோசை".repeat(6);
        assert_eq!(truncate_name(&tamil).chars().count(), 19);
    }

    #[test]
    fn test_format_receipt() {
        let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let doc = format_receipt(&sample_bill(), &ReceiptConfig::default(), &ist);

        assert_eq!(doc.bill_id, "bill_1");
        assert_eq!(doc.shop_name, "Roadside Hotel Demo");
        assert_eq!(doc.date_line, "Date: 16/10/2026, 06:05:12 PM");
        assert_eq!(doc.lines.len(), 2);
        assert_eq!(doc.lines[0].name, "Chicken Rice");
        assert_eq!(doc.lines[0].unit_price, "₹100");
        assert_eq!(doc.lines[0].line_total, "₹200");
        assert_eq!(doc.lines[1].name, "Extra Crispy Masal…");
        assert_eq!(doc.subtotal, "₹245");
    }

    #[test]
    fn test_format_is_deterministic_and_pure() {
        let bill = sample_bill();
        let before = bill.clone();
        let config = ReceiptConfig::default();

        let a = format_receipt(&bill, &config, &Utc);
        let b = format_receipt(&bill, &config, &Utc);

        assert_eq!(a, b);
        assert_eq!(bill, before);
    }

    #[test]
    fn test_render_text() {
        let doc = format_receipt(&sample_bill(), &ReceiptConfig::default(), &Utc);
        let text = doc.render_text(32);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0].trim(), "Roadside Hotel Demo");
        assert_eq!(lines[2], "Date: 16/10/2026, 12:35:12 PM");
        assert!(lines[4].starts_with("Item"));
        assert!(lines[5].starts_with("Chicken Rice"));
        assert!(lines[5].ends_with("₹200"));
        assert_eq!(lines[6], "  @ ₹100");
        assert!(text.contains("Subtotal"));
        assert!(text.trim_end().ends_with("Thank you! Visit again."));

        // Every column row is exactly the requested width
        assert_eq!(lines[5].chars().count(), 32);
    }

    #[test]
    fn test_unrenderable_date_pattern_falls_back() {
        let config = ReceiptConfig {
            date_format: "%Q bad".to_string(),
            ..ReceiptConfig::default()
        };

        let doc = format_receipt(&sample_bill(), &config, &Utc);
        assert_eq!(doc.date_line, "Date: 2026-10-16T12:35:12+00:00");
    }

    #[test]
    fn test_narrow_layout_keeps_columns_aligned() {
        let doc = format_receipt(&sample_bill(), &ReceiptConfig::default(), &Utc);
        let text = doc.render_text(0);
        let lines: Vec<&str> = text.lines().collect();

        // Item rows: Chicken Rice and the long Dosa name
        for row in [lines[5], lines[7]] {
            assert_eq!(row.chars().count(), MIN_RECEIPT_WIDTH);
        }
        assert!(lines[7].starts_with("Extra Cr…"));
        assert!(lines[7].ends_with("₹45"));
    }

    #[test]
    fn test_wide_layout_is_capped() {
        let doc = format_receipt(&sample_bill(), &ReceiptConfig::default(), &Utc);
        let text = doc.render_text(usize::MAX);

        assert!(text.lines().all(|line| line.chars().count() <= MAX_RECEIPT_WIDTH));
        assert!(text.contains(&"-".repeat(MAX_RECEIPT_WIDTH)));
    }
}
