//! # driwich-printer
//!
//! Receipt delivery for Driwich POS.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS framing
//! - Network printing (raw TCP, port 9100)
//! - A simulated printer for machines without hardware
//!
//! WHAT to print stays in `driwich-core` (`render_receipt`).
//!
//! ## Example
//!
//! ```ignore
//! use driwich_core::{AppContext, ReceiptPrinter};
//! use driwich_printer::NetworkReceiptPrinter;
//!
//! let request = ctx.receipt_for(&order_id)?;
//! let outcome = NetworkReceiptPrinter::new().print(&request).await;
//! if !outcome.success {
//!     eprintln!("{}", outcome.message);
//! }
//! ```

mod error;
mod escpos;
mod printer;
mod receipt;

pub use error::{PrintError, PrintResult};
pub use escpos::{receipt_bytes, Align, EscPosBuilder};
pub use printer::{NetworkPrinter, DEFAULT_TIMEOUT};
pub use receipt::{NetworkReceiptPrinter, SimulatedPrinter};
