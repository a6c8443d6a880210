//! # Command Line Interface
//!
//! ```text
//! agro-till [--db PATH | --memory] [--json] <COMMAND>
//!
//!   menu                        list the menu with cart quantities
//!   cart                        show the cart
//!   set <ID> <QTY>              set a quantity (0 removes)
//!   add <ID>                    one more
//!   remove <ID>                 one less
//!   clear                       empty the cart
//!   checkout [--printer KIND]   bill the cart (terminal | file | none)
//!   summary                     today's figures
//!   bills [--today]             bill history
//!   receipt <BILL_ID>           reprint a receipt
//!   view                        full screen view model (JSON)
//!   status                      where state was restored from
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use agro_core::CartView;
use agro_db::{DbConfig, KeyValueStore, MemoryStore, SqliteStore};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use crate::commands;
use crate::error::ApiError;
use crate::print::{FilePrinter, NoPrinter, PrintSurface, TerminalPrinter};
use crate::state::{AppConfig, Register};

/// AgroPOS counter: menu, cart, checkout and receipts
#[derive(Parser, Debug)]
#[command(name = "agro-till", version)]
#[command(about = "AgroPOS counter: menu, cart, checkout and receipts", long_about = None)]
pub struct Cli {
    /// SQLite database file (default: platform data directory, or AGRO_DB_PATH)
    #[arg(long = "db", value_name = "PATH", global = true, conflicts_with = "memory")]
    pub db: Option<PathBuf>,

    /// Keep everything in memory for this run only
    #[arg(long, global = true)]
    pub memory: bool,

    /// Directory for receipts written by `--printer file`
    #[arg(long = "receipts-dir", value_name = "DIR", global = true)]
    pub receipts_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the menu with current cart quantities.
    Menu,
    /// Show the cart.
    Cart,
    /// Set an item's quantity (text is normalized; 0 removes).
    Set {
        /// Menu item id (e.g. m_tea)
        id: String,
        /// Quantity as typed
        #[arg(allow_hyphen_values = true)]
        qty: String,
    },
    /// Add one of an item.
    Add { id: String },
    /// Remove one of an item.
    Remove { id: String },
    /// Empty the cart.
    Clear,
    /// Bill the cart, print the receipt and record the sale.
    Checkout {
        #[arg(long, value_enum, default_value_t = PrinterKind::Terminal)]
        printer: PrinterKind,
    },
    /// Today's revenue, most sold item and items sold.
    Summary,
    /// Bill history.
    Bills {
        /// Only bills since local midnight
        #[arg(long)]
        today: bool,
    },
    /// Reprint a receipt.
    Receipt {
        bill_id: String,
        #[arg(long, value_enum, default_value_t = PrinterKind::Terminal)]
        printer: PrinterKind,
    },
    /// Full screen view model.
    View,
    /// Where each piece of state was restored from.
    Status,
}

/// Available print surfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PrinterKind {
    Terminal,
    File,
    None,
}

impl Cli {
    /// Applies command line overrides on top of `config`.
    pub fn apply_to(&self, mut config: AppConfig) -> AppConfig {
        if let Some(db) = &self.db {
            config.database_path = Some(db.clone());
        }
        if let Some(dir) = &self.receipts_dir {
            config.receipts_dir = Some(dir.clone());
        }
        config
    }
}

// =============================================================================
// Execution
// =============================================================================

/// Opens the configured store.
pub fn open_store(cli: &Cli, config: &AppConfig) -> Result<Box<dyn KeyValueStore>, ApiError> {
    if cli.memory {
        info!("Using in-memory store");
        return Ok(Box::new(MemoryStore::new()));
    }

    let path = config.database_path()?;
    info!(path = %path.display(), "Database path determined");
    Ok(Box::new(SqliteStore::open(DbConfig::new(path))?))
}

fn make_printer<'a>(
    kind: PrinterKind,
    config: &AppConfig,
    json: bool,
    out: &'a mut dyn Write,
) -> Result<Box<dyn PrintSurface + 'a>, ApiError> {
    let printer: Box<dyn PrintSurface + 'a> = match kind {
        // Keep stdout clean for the JSON document
        PrinterKind::Terminal if json => {
            Box::new(TerminalPrinter::new(io::stderr(), config.receipt_width))
        }
        PrinterKind::Terminal => Box::new(TerminalPrinter::new(out, config.receipt_width)),
        PrinterKind::File => Box::new(FilePrinter::new(
            config.receipts_dir()?,
            config.receipt_width,
        )),
        PrinterKind::None => Box::new(NoPrinter),
    };
    Ok(printer)
}

/// Runs one command against a session, writing the result to `out`.
pub fn execute(
    command: &Command,
    register: &mut Register,
    config: &AppConfig,
    json: bool,
    now: DateTime<Local>,
    out: &mut dyn Write,
) -> Result<(), ApiError> {
    match command {
        Command::Menu => {
            let menu = commands::menu::get_menu(register);
            emit(out, json, &menu, |menu| {
                menu.items
                    .iter()
                    .map(|row| {
                        let qty = if row.qty > 0 {
                            format!("  [in cart: {}]", row.qty)
                        } else {
                            String::new()
                        };
                        format!("{:<16} {:<20} {:>8}{}", row.id, row.name, row.price_label, qty)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Cart => {
            let response = commands::cart::get_cart(register);
            emit(out, json, &response, |r| render_cart(&r.cart))
        }
        Command::Set { id, qty } => {
            let response = commands::cart::set_item(register, id, qty)?;
            emit(out, json, &response, |r| render_cart(&r.cart))
        }
        Command::Add { id } => {
            let response = commands::cart::add_item(register, id)?;
            emit(out, json, &response, |r| render_cart(&r.cart))
        }
        Command::Remove { id } => {
            let response = commands::cart::remove_item(register, id)?;
            emit(out, json, &response, |r| render_cart(&r.cart))
        }
        Command::Clear => {
            let response = commands::cart::clear_cart(register);
            emit(out, json, &response, |r| render_cart(&r.cart))
        }
        Command::Checkout { printer } => {
            let response = {
                let mut surface = make_printer(*printer, config, json, &mut *out)?;
                commands::sale::checkout(register, surface.as_mut(), now)?
            };
            emit(out, json, &response, |r| {
                format!("{}\nBill {}  {}", r.message, r.bill_id, r.subtotal_label)
            })
        }
        Command::Summary => {
            let response = commands::summary::get_summary(register, &now);
            emit(out, json, &response, |r| {
                format!(
                    "Revenue today:  {}\nMost sold:      {}\nItems sold:     {}\nBills:          {}",
                    r.view.revenue_label, r.view.most_sold, r.view.items_sold, r.view.bill_count
                )
            })
        }
        Command::Bills { today } => {
            let response = commands::sale::list_bills(register, &now, *today);
            emit(out, json, &response, |r| {
                if r.bills.is_empty() {
                    return "No bills.".to_string();
                }
                r.bills
                    .iter()
                    .map(|bill| {
                        format!(
                            "{}  {}  {:>3} items  {:>8}{}",
                            bill.id,
                            bill.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                            bill.item_count,
                            bill.subtotal_label,
                            if bill.printed { "" } else { "  (not printed)" }
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Receipt { bill_id, printer } => {
            let receipt = {
                let mut surface = make_printer(*printer, config, json, &mut *out)?;
                commands::sale::reprint_receipt(register, bill_id, &Local, surface.as_mut())?
            };
            if json {
                emit(out, json, &receipt, |_| String::new())
            } else {
                Ok(())
            }
        }
        Command::View => {
            // The view model is for front ends; always JSON
            let view = commands::summary::get_view(register, &now);
            emit(out, true, &view, |_| String::new())
        }
        Command::Status => {
            let status = commands::config::get_status(register, config);
            emit(out, json, &status, |s| {
                format!(
                    "Shop:   {}\nMenu:   {} items, {}\nCart:   {} lines, {}\nSales:  {} bills, {}",
                    s.shop_name,
                    s.menu_items,
                    s.menu_source,
                    s.cart_lines,
                    s.cart_source,
                    s.bills,
                    s.sales_source
                )
            })
        }
    }
}

fn render_cart(cart: &CartView) -> String {
    if cart.is_empty {
        return "Cart is empty.".to_string();
    }

    let mut lines: Vec<String> = cart
        .lines
        .iter()
        .map(|line| format!("{:<20} {:<14} {:>8}", line.name, line.meta, line.total_label))
        .collect();
    lines.push(format!("{:<35} {:>8}", "Subtotal", cart.subtotal_label));
    lines.join("\n")
}

fn emit<T, F>(out: &mut dyn Write, json: bool, value: &T, text: F) -> Result<(), ApiError>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    let rendered = if json {
        serde_json::to_string_pretty(value).map_err(|e| ApiError::internal(e.to_string()))?
    } else {
        text(value)
    };

    writeln!(out, "{}", rendered).map_err(|e| ApiError::internal(e.to_string()))
}
