//! # Order History Store
//!
//! Committed orders, most recent first.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. COMMIT                                                             │
//! │     └── commit(cart) → Order { status: New }                           │
//! │         ├── empty cart? → CoreError::EmptyCart, nothing changes        │
//! │         ├── total = Σ quantity × unit_price, overflow → TotalOverflow  │
//! │         ├── order prepended to history                                 │
//! │         └── cart drained                                               │
//! │                                                                         │
//! │  2. STATUS                                                             │
//! │     ├── set_status(id, s)  raw overwrite, no policy                    │
//! │     └── advance(id, s)     checks the transition table first           │
//! │                                                                         │
//! │  Orders are never deleted, and items/total never change after commit.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cart::CartStore;
use crate::clock::Clock;
use crate::error::{CoreError, CoreResult, Outcome};
use crate::id::IdGenerator;
use crate::status::OrderStatus;
use crate::types::{Order, OrderDetails};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistory {
    /// Newest at index 0.
    orders: Vec<Order>,
}

impl OrderHistory {
    pub fn new() -> Self {
        OrderHistory::default()
    }

    /// Turns the cart into a new order and empties the cart.
    ///
    /// Either both happen or neither. The empty check and the total are
    /// both settled while the cart is only borrowed; no id is drawn and no
    /// line is moved until they pass.
    pub fn commit(
        &mut self,
        cart: &mut CartStore,
        details: OrderDetails,
        ids: &mut dyn IdGenerator,
        clock: &mut dyn Clock,
    ) -> CoreResult<Order> {
        if cart.is_empty() {
            warn!("commit of empty cart rejected");
            return Err(CoreError::EmptyCart);
        }

        let total = Order::total_of(cart.items()).inspect_err(|_| {
            warn!(lines = cart.len(), "commit rejected, total overflows");
        })?;

        let order = Order::freeze(ids.next_id(), cart.take_items(), total, clock.now(), details);
        info!(
            order_id = %order.id(),
            lines = order.items().len(),
            total = %order.total(),
            "order committed"
        );

        self.orders.insert(0, order.clone());
        Ok(order)
    }

    /// Overwrites the status of the order with `id`.
    ///
    /// No transition policy is applied here; any status is accepted,
    /// including on completed or cancelled orders. Use
    /// [`OrderHistory::advance`] for the checked path.
    pub fn set_status(&mut self, id: &str, status: OrderStatus) -> Outcome {
        match self.orders.iter_mut().find(|order| order.id() == id) {
            Some(order) => {
                info!(order_id = id, from = %order.status, to = %status, "order status set");
                order.status = status;
                Outcome::Applied
            }
            None => {
                warn!(order_id = id, "status change for unknown order ignored");
                Outcome::Ignored
            }
        }
    }

    /// Moves an order to `next` if the transition table allows it.
    pub fn advance(&mut self, id: &str, next: OrderStatus) -> CoreResult<&Order> {
        let current = self
            .get(id)
            .map(Order::status)
            .ok_or_else(|| CoreError::OrderNotFound(id.to_string()))?;

        if !current.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        let _ = self.set_status(id, next);
        self.get(id).ok_or_else(|| CoreError::OrderNotFound(id.to_string()))
    }

    /// All orders, most recent first.
    pub fn list(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.id() == id)
    }

    /// Orders currently in `status`, most recent first.
    pub fn by_status(&self, status: OrderStatus) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(move |order| order.status() == status)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SteppingClock;
    use crate::id::SequentialIds;
    use crate::money::Money;
    use crate::types::OrderItem;
    use chrono::{Duration, TimeZone, Utc};

    struct Harness {
        cart: CartStore,
        history: OrderHistory,
        ids: SequentialIds,
        clock: SteppingClock,
    }

    impl Harness {
        fn new() -> Self {
            Harness {
                cart: CartStore::new(),
                history: OrderHistory::new(),
                ids: SequentialIds::new("o"),
                clock: SteppingClock::new(
                    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap(),
                    Duration::minutes(1),
                ),
            }
        }

        fn add(&mut self, product_id: &str, quantity: u32, cents: i64) {
            self.cart
                .add_item(OrderItem::new(
                    product_id,
                    product_id.to_uppercase(),
                    quantity,
                    Money::from_cents(cents),
                ))
                .unwrap();
        }

        fn commit(&mut self) -> CoreResult<Order> {
            self.history.commit(
                &mut self.cart,
                OrderDetails::default(),
                &mut self.ids,
                &mut self.clock,
            )
        }
    }

    #[test]
    fn test_commit_freezes_total_and_clears_cart() {
        let mut h = Harness::new();
        h.add("p1", 2, 500);
        h.add("p2", 1, 350);

        let order = h.commit().unwrap();

        assert_eq!(order.total(), Money::from_cents(1350));
        assert_eq!(order.status(), OrderStatus::New);
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.id(), "o-1");
        assert!(h.cart.is_empty());
        assert_eq!(h.history.list(), &[order]);
    }

    #[test]
    fn test_commit_empty_cart_is_rejected() {
        let mut h = Harness::new();
        h.add("p1", 1, 500);
        h.commit().unwrap();

        assert_eq!(h.commit(), Err(CoreError::EmptyCart));
        assert_eq!(h.history.len(), 1);
    }

    #[test]
    fn test_commit_overflowing_total_leaves_everything_untouched() {
        let mut h = Harness::new();
        h.add("p1", 999, i64::MAX / 1000);
        h.add("p2", 999, i64::MAX / 1000);
        let before = h.cart.items().to_vec();

        assert_eq!(h.commit(), Err(CoreError::TotalOverflow));
        assert_eq!(h.cart.items(), before.as_slice());
        assert!(h.history.is_empty());

        // the rejected commit drew no id
        let _ = h.cart.remove_item("p2");
        assert_eq!(h.commit().unwrap().id(), "o-1");
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let mut h = Harness::new();
        h.add("p1", 1, 500);
        let a = h.commit().unwrap();
        h.add("p2", 1, 350);
        let b = h.commit().unwrap();

        let ids: Vec<&str> = h.history.list().iter().map(Order::id).collect();
        assert_eq!(ids, vec![b.id(), a.id()]);
        assert!(b.created_at() > a.created_at());
    }

    #[test]
    fn test_commit_passes_details_through() {
        let mut h = Harness::new();
        h.add("p1", 1, 500);
        let order = h
            .history
            .commit(
                &mut h.cart,
                OrderDetails {
                    notes: Some("no onions".to_string()),
                    table_number: Some("4".to_string()),
                },
                &mut h.ids,
                &mut h.clock,
            )
            .unwrap();

        assert_eq!(order.notes(), Some("no onions"));
        assert_eq!(order.table_number(), Some("4"));
    }

    #[test]
    fn test_set_status_forward_sequence() {
        let mut h = Harness::new();
        h.add("p1", 1, 500);
        let id = h.commit().unwrap().id().to_string();

        assert_eq!(h.history.set_status(&id, OrderStatus::Processing), Outcome::Applied);
        assert_eq!(h.history.set_status(&id, OrderStatus::Completed), Outcome::Applied);
        assert_eq!(h.history.get(&id).unwrap().status(), OrderStatus::Completed);
    }

    #[test]
    fn test_set_status_is_permissive_on_terminal_orders() {
        let mut h = Harness::new();
        h.add("p1", 1, 500);
        let id = h.commit().unwrap().id().to_string();

        let _ = h.history.set_status(&id, OrderStatus::Cancelled);
        assert_eq!(h.history.set_status(&id, OrderStatus::New), Outcome::Applied);
        assert_eq!(h.history.get(&id).unwrap().status(), OrderStatus::New);
    }

    #[test]
    fn test_set_status_unknown_id_is_noop() {
        let mut h = Harness::new();
        h.add("p1", 1, 500);
        let order = h.commit().unwrap();

        assert_eq!(h.history.set_status("missing", OrderStatus::Completed), Outcome::Ignored);
        assert_eq!(h.history.list(), &[order]);
    }

    #[test]
    fn test_status_change_keeps_items_and_total() {
        let mut h = Harness::new();
        h.add("p1", 3, 275);
        let order = h.commit().unwrap();

        let _ = h.history.set_status(order.id(), OrderStatus::Processing);
        let stored = h.history.get(order.id()).unwrap();
        assert_eq!(stored.items(), order.items());
        assert_eq!(stored.total(), order.total());
        assert_eq!(stored.created_at(), order.created_at());
    }

    #[test]
    fn test_advance_enforces_transition_table() {
        let mut h = Harness::new();
        h.add("p1", 1, 500);
        let id = h.commit().unwrap().id().to_string();

        assert_eq!(
            h.history.advance(&id, OrderStatus::Completed).unwrap_err(),
            CoreError::InvalidTransition {
                from: OrderStatus::New,
                to: OrderStatus::Completed
            }
        );

        assert_eq!(
            h.history.advance(&id, OrderStatus::Processing).unwrap().status(),
            OrderStatus::Processing
        );
        assert_eq!(
            h.history.advance(&id, OrderStatus::Cancelled).unwrap().status(),
            OrderStatus::Cancelled
        );
        assert!(h.history.advance(&id, OrderStatus::Processing).is_err());
        assert_eq!(
            h.history.advance("missing", OrderStatus::Processing).unwrap_err(),
            CoreError::OrderNotFound("missing".to_string())
        );
    }

    #[test]
    fn test_by_status() {
        let mut h = Harness::new();
        for product in ["p1", "p2", "p3"] {
            h.add(product, 1, 100);
            h.commit().unwrap();
        }
        let _ = h.history.set_status("o-2", OrderStatus::Processing);

        let new_ids: Vec<&str> = h.history.by_status(OrderStatus::New).map(Order::id).collect();
        assert_eq!(new_ids, vec!["o-3", "o-1"]);
        assert_eq!(h.history.by_status(OrderStatus::Processing).count(), 1);
    }
}
