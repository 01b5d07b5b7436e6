//! # driwich-core: Business Logic for Driwich POS
//!
//! This crate owns every piece of mutable business data in the register:
//! the product catalog, the cart being built, the committed order history
//! and the shop settings. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Driwich POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/register (front end)                       │   │
//! │  │    products ──► tap ──► cart ──► checkout ──► print             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ AppContext                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ driwich-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │   cart    │  │  orders   │  │ settings  │  │   │
//! │  │   │  Product  │  │ OrderItem │  │   Order   │  │  Printer  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   receipt: ReceiptRequest ──► trait ReceiptPrinter             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ implements ReceiptPrinter              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              driwich-printer (ESC/POS over TCP)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Menu products
//! - [`cart`] - The order being built, one line per product
//! - [`orders`] - Committed orders and their status
//! - [`settings`] - Shop and printer configuration
//! - [`receipt`] - Receipt text and the printer contract
//! - [`context`] - [`AppContext`], the single owner of all of the above
//! - [`money`] - Integer-cent money
//! - [`id`] / [`clock`] - Injectable id and time sources
//!
//! ## Example Usage
//!
//! ```rust
//! use driwich_core::{AppContext, Money, NewProduct, OrderDetails, OrderStatus};
//!
//! let mut ctx = AppContext::new();
//! let wrap = ctx.add_product(NewProduct::new("Falafel Wrap", Money::from_cents(500), "Wraps"));
//!
//! ctx.tap_product(&wrap.id)?;
//! ctx.tap_product(&wrap.id)?;
//!
//! let order = ctx.checkout(OrderDetails::default())?;
//! assert_eq!(order.total().cents(), 1000);
//! assert_eq!(order.status(), OrderStatus::New);
//! assert!(ctx.cart().is_empty());
//! # Ok::<(), driwich_core::CoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod clock;
pub mod context;
pub mod error;
pub mod id;
pub mod money;
pub mod orders;
pub mod receipt;
pub mod settings;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartChange, CartStore};
pub use catalog::CatalogStore;
pub use clock::{Clock, SteppingClock, SystemClock};
pub use context::AppContext;
pub use error::{CoreError, CoreResult, Outcome, ValidationError};
pub use id::{IdGenerator, SequentialIds, UuidGenerator};
pub use money::Money;
pub use orders::OrderHistory;
pub use receipt::{PrintOutcome, ReceiptPrinter, ReceiptRequest};
pub use settings::{AppSettings, PrinterSettings, SettingsPatch, SettingsStore};
pub use status::OrderStatus;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest quantity a single cart line can hold.
pub const MAX_ITEM_QUANTITY: u32 = 999;
