//! `ReceiptPrinter` implementations
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  print(request)                                                         │
//! │     ├── printer disabled?      → PrintOutcome::disabled()  (no I/O)     │
//! │     ├── bad ip/port            → success=false, "Failed to print: ..."  │
//! │     ├── connect/write failure  → success=false, "Failed to print: ..."  │
//! │     └── bytes flushed          → success=true                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors never escape as `Err`: the caller gets a [`PrintOutcome`] and
//! decides how to tell the operator.

use std::time::Duration;

use driwich_core::{PrintOutcome, ReceiptPrinter, ReceiptRequest};
use tracing::{info, instrument, warn};

use crate::error::PrintResult;
use crate::escpos::receipt_bytes;
use crate::printer::{NetworkPrinter, DEFAULT_TIMEOUT};

/// Sends receipts to the printer named in the request's settings.
#[derive(Debug, Clone)]
pub struct NetworkReceiptPrinter {
    timeout: Duration,
}

impl Default for NetworkReceiptPrinter {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl NetworkReceiptPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn deliver(&self, request: &ReceiptRequest) -> PrintResult<()> {
        let printer = NetworkPrinter::new(&request.printer.ip_address, request.printer.port)?
            .with_timeout(self.timeout);
        printer.print(&receipt_bytes(request)).await
    }
}

impl ReceiptPrinter for NetworkReceiptPrinter {
    #[instrument(skip_all, fields(order_id = %request.order.id(), addr = %request.printer.address()))]
    async fn print(&self, request: &ReceiptRequest) -> PrintOutcome {
        if !request.printer.is_enabled {
            return PrintOutcome::disabled();
        }

        match self.deliver(request).await {
            Ok(()) => {
                info!("receipt printed");
                PrintOutcome::ok("Order successfully sent to printer")
            }
            Err(e) => {
                warn!(error = %e, "receipt print failed");
                PrintOutcome::failed(format!("Failed to print: {}", e))
            }
        }
    }
}

/// Logs the receipt instead of printing it. For machines without a printer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedPrinter;

impl ReceiptPrinter for SimulatedPrinter {
    async fn print(&self, request: &ReceiptRequest) -> PrintOutcome {
        if !request.printer.is_enabled {
            return PrintOutcome::disabled();
        }

        info!(
            order_id = %request.order.id(),
            addr = %request.printer.address(),
            receipt = %request.render(),
            "simulated print"
        );
        PrintOutcome::ok("Order sent to printer (simulated)")
    }
}
