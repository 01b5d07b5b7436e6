//! # Application Context
//!
//! Owns every store, plus the id generator and the clock they share.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          AppContext                                     │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │ CatalogStore │ │  CartStore   │ │ OrderHistory │ │SettingsStore │   │
//! │  └──────┬───────┘ └──────┬───────┘ └──────┬───────┘ └──────────────┘   │
//! │         │                └──── checkout ──┘                             │
//! │         │                                                               │
//! │  ┌──────┴───────────────────────┐  ┌──────────────┐                     │
//! │  │ Box<dyn IdGenerator>         │  │ Box<dyn Clock>│                    │
//! │  └──────────────────────────────┘  └──────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The application root builds one context and passes it to whatever needs
//! it. There is no global instance; each test builds a fresh one.

use tracing::debug;

use crate::cart::{CartChange, CartStore};
use crate::catalog::CatalogStore;
use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, CoreResult, Outcome};
use crate::id::{IdGenerator, UuidGenerator};
use crate::orders::OrderHistory;
use crate::receipt::{self, ReceiptRequest};
use crate::settings::{AppSettings, SettingsPatch, SettingsStore};
use crate::status::OrderStatus;
use crate::types::{NewProduct, Order, OrderDetails, Product};
use crate::validation::ValidationResult;

pub struct AppContext {
    catalog: CatalogStore,
    cart: CartStore,
    orders: OrderHistory,
    settings: SettingsStore,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
}

impl Default for AppContext {
    fn default() -> Self {
        AppContext::new()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("catalog", &self.catalog)
            .field("cart", &self.cart)
            .field("orders", &self.orders)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Empty stores, default settings, uuid ids, wall clock.
    pub fn new() -> Self {
        AppContext::with_parts(Box::new(UuidGenerator), Box::new(SystemClock))
    }

    pub fn with_parts(ids: Box<dyn IdGenerator>, clock: Box<dyn Clock>) -> Self {
        AppContext {
            catalog: CatalogStore::new(),
            cart: CartStore::new(),
            orders: OrderHistory::new(),
            settings: SettingsStore::new(),
            ids,
            clock,
        }
    }

    /// Replaces the starting settings, e.g. with environment overrides.
    pub fn with_settings(mut self, settings: AppSettings) -> Self {
        self.settings = SettingsStore::with_settings(settings);
        self
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn add_product(&mut self, draft: NewProduct) -> Product {
        self.catalog.add(draft, self.ids.as_mut())
    }

    pub fn update_product(&mut self, product: Product) -> Outcome {
        self.catalog.update(product)
    }

    /// Removes the product from the menu only; cart lines and orders keep
    /// their snapshots.
    pub fn remove_product(&mut self, id: &str) -> Outcome {
        self.catalog.remove(id)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// Tap handler: one unit of the catalog product with `product_id`.
    pub fn tap_product(&mut self, product_id: &str) -> CoreResult<CartChange> {
        let product = self
            .catalog
            .get(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        self.cart.add_product(product)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub fn orders(&self) -> &OrderHistory {
        &self.orders
    }

    /// Commits the cart as a new order and empties the cart.
    pub fn checkout(&mut self, details: OrderDetails) -> CoreResult<Order> {
        self.orders.commit(
            &mut self.cart,
            details,
            self.ids.as_mut(),
            self.clock.as_mut(),
        )
    }

    /// Raw status overwrite, no policy.
    pub fn set_order_status(&mut self, id: &str, status: OrderStatus) -> Outcome {
        self.orders.set_status(id, status)
    }

    /// Policy-checked status change.
    pub fn advance_order(&mut self, id: &str, next: OrderStatus) -> CoreResult<&Order> {
        self.orders.advance(id, next)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn settings(&self) -> &AppSettings {
        self.settings.get()
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) -> &AppSettings {
        self.settings.update(patch)
    }

    pub fn try_update_settings(&mut self, patch: SettingsPatch) -> ValidationResult<&AppSettings> {
        self.settings.try_update(patch)
    }

    // =========================================================================
    // Receipts
    // =========================================================================

    /// Builds a receipt for a stored order from the current settings.
    pub fn receipt_for(&self, order_id: &str) -> CoreResult<ReceiptRequest> {
        let order = self
            .orders
            .get(order_id)
            .ok_or_else(|| CoreError::OrderNotFound(order_id.to_string()))?;
        debug!(order_id, "receipt assembled");
        Ok(ReceiptRequest::new(order.clone(), self.settings.get()))
    }

    /// Receipt for the fixed test order. Nothing is stored.
    pub fn test_receipt(&mut self) -> ReceiptRequest {
        let order = receipt::test_order(self.clock.now());
        ReceiptRequest::new(order, self.settings.get())
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
    use crate::settings::PrinterSettings;
    use crate::types::OrderItem;
    use chrono::{Duration, TimeZone, Utc};

    fn context() -> AppContext {
        AppContext::with_parts(
            Box::new(SequentialIds::new("id")),
            Box::new(SteppingClock::new(
                Utc.with_ymd_and_hms(2026, 4, 1, 18, 0, 0).unwrap(),
                Duration::seconds(30),
            )),
        )
    }

    #[test]
    fn test_example_checkout() {
        let mut ctx = context();
        ctx.cart_mut().add_item(OrderItem::new("p1", "Wrap", 2, Money::from_cents(500))).unwrap();
        ctx.cart_mut().add_item(OrderItem::new("p2", "Tea", 1, Money::from_cents(350))).unwrap();

        let order = ctx.checkout(OrderDetails::default()).unwrap();

        assert_eq!(order.total(), Money::from_cents(1350));
        assert_eq!(order.status(), OrderStatus::New);
        assert!(ctx.cart().is_empty());
        assert_eq!(ctx.orders().len(), 1);
    }

    #[test]
    fn test_empty_checkout_leaves_everything_untouched() {
        let mut ctx = context();
        assert_eq!(ctx.checkout(OrderDetails::default()), Err(CoreError::EmptyCart));
        assert!(ctx.orders().is_empty());
        assert!(ctx.cart().is_empty());
    }

    #[test]
    fn test_tap_product_snapshots_catalog() {
        let mut ctx = context();
        let wrap = ctx.add_product(NewProduct::new("Wrap", Money::from_cents(500), "Wraps"));

        assert_eq!(ctx.tap_product(&wrap.id), Ok(CartChange::Appended));
        assert_eq!(ctx.tap_product(&wrap.id), Ok(CartChange::Merged));
        assert_eq!(
            ctx.tap_product("missing"),
            Err(CoreError::ProductNotFound("missing".to_string()))
        );

        let mut repriced = wrap.clone();
        repriced.price = Money::from_cents(900);
        assert_eq!(ctx.update_product(repriced), Outcome::Applied);

        let line = ctx.cart().get(&wrap.id).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price, Money::from_cents(500));
    }

    #[test]
    fn test_tapping_stops_at_item_limit() {
        let mut ctx = context();
        let feast = ctx.add_product(NewProduct::new("Feast", Money::from_cents(i64::MAX / 1000), "Platters"));
        for _ in 0..crate::MAX_ITEM_QUANTITY {
            let _ = ctx.tap_product(&feast.id).unwrap();
        }

        assert!(matches!(
            ctx.tap_product(&feast.id),
            Err(CoreError::QuantityLimit { max: 999, .. })
        ));
        assert_eq!(ctx.cart().total_quantity(), 999);

        let order = ctx.checkout(OrderDetails::default()).unwrap();
        assert_eq!(order.total(), Money::from_cents(i64::MAX / 1000 * 999));
    }

    #[test]
    fn test_removing_product_does_not_cascade() {
        let mut ctx = context();
        let wrap = ctx.add_product(NewProduct::new("Wrap", Money::from_cents(500), "Wraps"));
        let _ = ctx.tap_product(&wrap.id).unwrap();
        let order = ctx.checkout(OrderDetails::default()).unwrap();

        let _ = ctx.tap_product(&wrap.id).unwrap();
        assert_eq!(ctx.remove_product(&wrap.id), Outcome::Applied);

        assert_eq!(ctx.cart().len(), 1);
        assert_eq!(ctx.orders().get(order.id()).unwrap().items()[0].product_name, "Wrap");
    }

    #[test]
    fn test_products_and_orders_share_the_id_generator() {
        let mut ctx = context();
        let tea = ctx.add_product(NewProduct::new("Tea", Money::from_cents(150), "Drinks"));
        let _ = ctx.tap_product(&tea.id).unwrap();
        let order = ctx.checkout(OrderDetails::default()).unwrap();

        assert_eq!(tea.id, "id-1");
        assert_eq!(order.id(), "id-2");
    }

    #[test]
    fn test_receipt_uses_current_settings() {
        let mut ctx = context();
        ctx.cart_mut().add_item(OrderItem::new("p1", "Wrap", 1, Money::from_cents(500))).unwrap();
        let order = ctx.checkout(OrderDetails::default()).unwrap();

        ctx.update_settings(
            SettingsPatch::default()
                .shop_name("Falafel Corner")
                .printer(PrinterSettings::enabled("10.0.0.5", 9100)),
        );

        let request = ctx.receipt_for(order.id()).unwrap();
        assert_eq!(request.shop_name, "Falafel Corner");
        assert!(request.printer.is_enabled);
        assert!(request.render().starts_with("Falafel Corner\n"));

        assert!(matches!(ctx.receipt_for("missing"), Err(CoreError::OrderNotFound(_))));
    }

    #[test]
    fn test_status_flow_through_context() {
        let mut ctx = context();
        ctx.cart_mut().add_item(OrderItem::new("p1", "Wrap", 1, Money::from_cents(500))).unwrap();
        let id = ctx.checkout(OrderDetails::default()).unwrap().id().to_string();

        assert_eq!(ctx.advance_order(&id, OrderStatus::Processing).unwrap().status(), OrderStatus::Processing);
        assert_eq!(ctx.advance_order(&id, OrderStatus::Completed).unwrap().status(), OrderStatus::Completed);
        assert!(ctx.advance_order(&id, OrderStatus::Cancelled).is_err());

        // the raw store primitive still accepts it
        assert_eq!(ctx.set_order_status(&id, OrderStatus::Cancelled), Outcome::Applied);
        assert_eq!(ctx.orders().get(&id).unwrap().status(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_test_receipt_is_not_stored() {
        let mut ctx = context();
        let request = ctx.test_receipt();
        assert!(request.order.id().starts_with("TEST-"));
        assert!(ctx.orders().is_empty());
    }
}
