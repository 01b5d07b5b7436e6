//! # Receipt Assembly
//!
//! The data handed to the printer collaborator and the result it returns.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Printing is a side effect                           │
//! │                                                                         │
//! │  commit() ──► Order (stored) ──► ReceiptRequest ──► ReceiptPrinter      │
//! │                                   (cloned order)          │             │
//! │                                                           ▼             │
//! │                                         PrintOutcome { success, msg }   │
//! │                                                                         │
//! │  A failed print never rolls back the commit or a status change.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Receipt Layout (32 columns)
//! ```text
//! Driwich
//! --------------------------------
//! ORDER #a1b2c3d4
//! 2026-03-14 12:30
//! --------------------------------
//! Falafel Wrap
//!   2 x $5.00  $10.00
//! Mint Tea
//!   1 x $3.50  $3.50
//! --------------------------------
//! TOTAL: $13.50
//! --------------------------------
//!
//! Thank you for your order!
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::settings::{AppSettings, PrinterSettings};
use crate::types::{Order, OrderDetails, OrderItem};

/// Characters per line on a 58mm roll.
pub const RECEIPT_WIDTH: usize = 32;

/// Everything a printer needs for one receipt.
///
/// Owns a copy of the order, so a pending print never observes later
/// store mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    pub order: Order,
    pub printer: PrinterSettings,
    pub shop_name: String,
    pub footer: Option<String>,
    pub currency: String,
}

impl ReceiptRequest {
    /// Pairs an order with the current shop settings.
    pub fn new(order: Order, settings: &AppSettings) -> Self {
        ReceiptRequest {
            order,
            printer: settings.printer.clone(),
            shop_name: settings.shop_name.clone(),
            footer: settings.receipt_footer.clone(),
            currency: settings.currency.clone(),
        }
    }

    /// Receipt text for this request.
    pub fn render(&self) -> String {
        render_receipt(self)
    }
}

/// Result reported by the printer collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PrintOutcome {
    pub success: bool,
    pub message: String,
}

impl PrintOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        PrintOutcome {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        PrintOutcome {
            success: false,
            message: message.into(),
        }
    }

    /// Immediate decline for a switched-off printer.
    pub fn disabled() -> Self {
        PrintOutcome::failed("Printer is not enabled in settings")
    }
}

/// The external printer collaborator.
///
/// Implementations must decline with [`PrintOutcome::disabled`] when
/// `request.printer.is_enabled` is false, without attempting delivery.
#[allow(async_fn_in_trait)]
pub trait ReceiptPrinter {
    async fn print(&self, request: &ReceiptRequest) -> PrintOutcome;
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders the receipt text.
///
/// Deterministic: the timestamp is the order's commit time, not the time
/// of printing.
pub fn render_receipt(request: &ReceiptRequest) -> String {
    let order = &request.order;
    let currency = request.currency.as_str();
    let money = |amount: Money| amount.format_with(currency);
    let rule = "-".repeat(RECEIPT_WIDTH);

    let mut lines: Vec<String> = Vec::new();
    lines.push(request.shop_name.clone());
    lines.push(rule.clone());
    lines.push(format!("ORDER #{}", order.short_id()));
    lines.push(format_timestamp(order.created_at()));
    if let Some(table) = order.table_number() {
        lines.push(format!("TABLE {}", table));
    }
    lines.push(rule.clone());

    for item in order.items() {
        lines.push(item.product_name.clone());
        lines.push(format!(
            "  {} x {}  {}",
            item.quantity,
            money(item.unit_price),
            money(item.line_total())
        ));
    }

    if let Some(notes) = order.notes() {
        lines.push(format!("Note: {}", notes));
    }
    lines.push(rule.clone());
    lines.push(format!("TOTAL: {}", money(order.total())));
    lines.push(rule);

    if let Some(footer) = request.footer.as_deref().filter(|f| !f.trim().is_empty()) {
        lines.push(String::new());
        lines.push(footer.to_string());
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// The fixed two-line order used by "Test Printer".
pub fn test_order(now: DateTime<Utc>) -> Order {
    let items = vec![
        OrderItem::new("test1", "Test Product 1", 1, Money::from_cents(999)),
        OrderItem::new("test2", "Test Product 2", 2, Money::from_cents(499)),
    ];
    let total = items.iter().map(OrderItem::line_total).sum();
    Order::freeze(
        format!("TEST-{}", now.timestamp_millis()),
        items,
        total,
        now,
        OrderDetails::default(),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
