//! # Cart Store
//!
//! The in-progress, uncommitted lines of the next order.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action          Cart Operation          State Change          │
//! │  ───────────────          ──────────────          ────────────          │
//! │                                                                         │
//! │  Tap Product ────────────► add_product() ───────► merge or push line    │
//! │                                                                         │
//! │  + / - Buttons ──────────► increment() ─────────► qty + 1               │
//! │                            decrement() ─────────► qty - 1 (stops at 1)  │
//! │                                                                         │
//! │  Type Quantity ──────────► set_quantity() ──────► qty = n (0 removes)   │
//! │                                                                         │
//! │  Click Remove ───────────► remove_item() ───────► drop line             │
//! │                                                                         │
//! │  Click Clear ────────────► clear() ─────────────► no lines              │
//! │                                                                         │
//! │  Create Order ───────────► OrderHistory::commit() drains the cart       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per `product_id` (merge-on-add)
//! - Every line has `1 ≤ quantity ≤ MAX_ITEM_QUANTITY`; a change that would
//!   go past the cap fails with [`CoreError::QuantityLimit`] and leaves the
//!   line as it was
//! - Lines keep insertion order

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult, Outcome};
use crate::money::Money;
use crate::types::{OrderItem, Product};
use crate::MAX_ITEM_QUANTITY;

/// What [`CartStore::add_item`] did with the incoming line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// Quantity added onto an existing line for the same product.
    Merged,
    /// New line at the end of the cart.
    Appended,
    /// Zero quantity, nothing to add.
    Ignored,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartStore {
    items: Vec<OrderItem>,
}

impl CartStore {
    pub fn new() -> Self {
        CartStore::default()
    }

    /// Adds a line, merging with an existing line for the same product.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity increases by `item.quantity`;
    ///   the cart keeps its own name and unit price snapshot
    /// - Product not in cart: line is appended
    /// - Resulting quantity above [`MAX_ITEM_QUANTITY`]: refused, cart unchanged
    pub fn add_item(&mut self, item: OrderItem) -> CoreResult<CartChange> {
        if item.quantity == 0 {
            debug!(product_id = %item.product_id, "zero-quantity add ignored");
            return Ok(CartChange::Ignored);
        }

        if let Some(line) = self.line_mut(&item.product_id) {
            line.quantity = capped(&item.product_id, line.quantity.checked_add(item.quantity))?;
            debug!(product_id = %item.product_id, quantity = line.quantity, "cart line merged");
            return Ok(CartChange::Merged);
        }

        capped(&item.product_id, Some(item.quantity))?;
        debug!(product_id = %item.product_id, quantity = item.quantity, "cart line appended");
        self.items.push(item);
        Ok(CartChange::Appended)
    }

    /// Adds one unit of a catalog product.
    ///
    /// Unavailable products are refused.
    pub fn add_product(&mut self, product: &Product) -> CoreResult<CartChange> {
        if !product.is_available {
            return Err(CoreError::ProductUnavailable(product.id.clone()));
        }
        self.add_item(OrderItem::from_product(product, 1))
    }

    /// Replaces the quantity of a line.
    ///
    /// A quantity of 0 removes the line, so no line ever sits at zero.
    /// Above [`MAX_ITEM_QUANTITY`] is refused even for a missing id.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> CoreResult<Outcome> {
        if quantity == 0 {
            return Ok(self.remove_item(product_id));
        }
        let quantity = capped(product_id, Some(quantity))?;

        Ok(match self.line_mut(product_id) {
            Some(line) => {
                line.quantity = quantity;
                debug!(product_id, quantity, "cart quantity set");
                Outcome::Applied
            }
            None => Outcome::Ignored,
        })
    }

    /// The `+` button. Refused once the line is at [`MAX_ITEM_QUANTITY`].
    pub fn increment(&mut self, product_id: &str) -> CoreResult<Outcome> {
        match self.line_mut(product_id) {
            Some(line) => {
                line.quantity = capped(product_id, line.quantity.checked_add(1))?;
                Ok(Outcome::Applied)
            }
            None => Ok(Outcome::Ignored),
        }
    }

    /// The `-` button. Does nothing at quantity 1; use
    /// [`CartStore::remove_item`] to drop the line.
    pub fn decrement(&mut self, product_id: &str) -> Outcome {
        match self.line_mut(product_id) {
            Some(line) if line.quantity > 1 => {
                line.quantity -= 1;
                Outcome::Applied
            }
            _ => Outcome::Ignored,
        }
    }

    /// Drops the line for `product_id`, if present.
    pub fn remove_item(&mut self, product_id: &str) -> Outcome {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        let outcome = Outcome::from_match(self.items.len() != before);
        debug!(product_id, ?outcome, "cart line remove");
        outcome
    }

    /// Empties the cart unconditionally.
    pub fn clear(&mut self) {
        debug!(lines = self.items.len(), "cart cleared");
        self.items.clear();
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn get(&self, product_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Sum of `quantity × unit_price`, recomputed on every call.
    ///
    /// Saturates instead of overflowing; the exact figure is checked again
    /// when the cart is committed.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of units across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |total, item| total.saturating_add(item.quantity))
    }

    /// Moves every line out, leaving the cart empty.
    pub(crate) fn take_items(&mut self) -> Vec<OrderItem> {
        std::mem::take(&mut self.items)
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut OrderItem> {
        self.items.iter_mut().find(|item| item.product_id == product_id)
    }
}

/// `Some(q)` within the per-line cap, else [`CoreError::QuantityLimit`].
fn capped(product_id: &str, quantity: Option<u32>) -> CoreResult<u32> {
    match quantity {
        Some(q) if q <= MAX_ITEM_QUANTITY => Ok(q),
        _ => {
            debug!(product_id, max = MAX_ITEM_QUANTITY, "cart quantity over limit refused");
            Err(CoreError::QuantityLimit {
                product_id: product_id.to_string(),
                max: MAX_ITEM_QUANTITY,
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
