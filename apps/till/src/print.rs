//! # Print Surfaces
//!
//! Where a formatted receipt goes after checkout.
//!
//! ```text
//!                          ┌──► TerminalPrinter  (stdout, fixed width)
//! ReceiptDocument ──open──►├──► FilePrinter      (<receipts>/<bill_id>.txt)
//!                          └──► NoPrinter        (always unavailable)
//! ```
//!
//! `open` succeeding is what marks a bill `printed`. A failing surface
//! never blocks the sale.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use agro_core::ReceiptDocument;
use thiserror::Error;
use tracing::{debug, info};

/// Why a receipt could not be shown.
#[derive(Debug, Error)]
pub enum PrintError {
    /// No surface is available (popup blocked, printer offline, disabled).
    #[error("Print surface unavailable: {0}")]
    Unavailable(String),

    /// Writing the receipt failed.
    #[error("Failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Something that can present a receipt.
pub trait PrintSurface {
    fn open(&mut self, receipt: &ReceiptDocument) -> Result<(), PrintError>;
}

// =============================================================================
// Terminal
// =============================================================================

/// Writes the plain-text receipt to a writer.
pub struct TerminalPrinter<W: Write> {
    out: W,
    width: usize,
}

impl<W: Write> TerminalPrinter<W> {
    pub fn new(out: W, width: usize) -> Self {
        TerminalPrinter { out, width }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PrintSurface for TerminalPrinter<W> {
    fn open(&mut self, receipt: &ReceiptDocument) -> Result<(), PrintError> {
        debug!(bill_id = %receipt.bill_id, "Printing receipt to terminal");
        self.out.write_all(receipt.render_text(self.width).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

// =============================================================================
// File
// =============================================================================

/// Saves each receipt as `<dir>/<bill_id>.txt`.
pub struct FilePrinter {
    dir: PathBuf,
    width: usize,
}

impl FilePrinter {
    pub fn new(dir: impl Into<PathBuf>, width: usize) -> Self {
        FilePrinter {
            dir: dir.into(),
            width,
        }
    }
}

impl PrintSurface for FilePrinter {
    fn open(&mut self, receipt: &ReceiptDocument) -> Result<(), PrintError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(format!("{}.txt", receipt.bill_id));
        fs::write(&path, receipt.render_text(self.width))?;

        info!(path = %path.display(), "Receipt written");
        Ok(())
    }
}

// =============================================================================
// None
// =============================================================================

/// A surface that is never available.
#[derive(Debug, Default)]
pub struct NoPrinter;

impl PrintSurface for NoPrinter {
    fn open(&mut self, _receipt: &ReceiptDocument) -> Result<(), PrintError> {
        Err(PrintError::Unavailable("printing is disabled".to_string()))
    }
}
