//! # Domain Types
//!
//! Core domain types used throughout Driwich POS.
//!
//! ## Type Hierarchy
//! ```text
//!   Product              OrderItem             Order
//!   ────────────         ────────────          ──────────────
//!   id           ──────► product_id    ──────► id, short_id
//!   name, price          product_name          items  (frozen)
//!   category             quantity >= 1         total  (frozen)
//!   is_available         unit_price            status, details
//! ```
//!
//! ## Snapshot Pattern
//! An `OrderItem` copies the product name and price when the line is
//! created. Editing or deleting the product later never touches cart lines
//! or committed orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::status::OrderStatus;

// =============================================================================
// Tax Rate
// =============================================================================

/// Sales tax in hundredths of a percent: `TaxRate::from_bps(825)` is 8.25%.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(basis_points: u32) -> Self {
        Self(basis_points)
    }

    /// Negative input clamps to zero. Use
    /// [`crate::validation::validate_tax_rate`] to reject it instead.
    pub fn from_percentage(percent: f64) -> Self {
        Self((percent * 100.0).round().max(0.0) as u32)
    }

    #[inline]
    pub const fn bps(self) -> u32 {
        self.0
    }

    /// Display only; never feed this back into arithmetic.
    #[inline]
    pub fn percentage(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Assigned by the catalog, never reused.
    pub id: String,
    pub name: String,
    pub price: Money,
    pub category: String,
    pub description: Option<String>,
    /// Image URI, if any.
    pub image: Option<String>,
    /// Unavailable products stay in the catalog but cannot be sold.
    pub is_available: bool,
}

impl Product {
    /// Returns the editable fields, e.g. to prefill an edit form.
    pub fn to_draft(&self) -> NewProduct {
        NewProduct {
            name: self.name.clone(),
            price: self.price,
            category: self.category.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            is_available: self.is_available,
        }
    }
}

/// A product that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub category: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_available: bool,
}

impl NewProduct {
    /// An available product with no description or image.
    pub fn new(name: impl Into<String>, price: Money, category: impl Into<String>) -> Self {
        NewProduct {
            name: name.into(),
            price,
            category: category.into(),
            description: None,
            image: None,
            is_available: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.is_available = false;
        self
    }

    /// Attaches an id, producing the stored form.
    pub fn into_product(self, id: String) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            category: self.category,
            description: self.description,
            image: self.image,
            is_available: self.is_available,
        }
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line in the cart or in a committed order.
///
/// Unique by `product_id` within one cart or order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    /// Product name at time of adding (frozen).
    pub product_name: String,
    pub quantity: u32,
    /// Price at time of adding (frozen).
    pub unit_price: Money,
}

impl OrderItem {
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        OrderItem {
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
            unit_price,
        }
    }

    /// Snapshots a catalog product into a line.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        OrderItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
        }
    }

    /// `quantity × unit_price`, saturating. Exact for every line of a
    /// committed order.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    #[inline]
    pub fn checked_line_total(&self) -> Option<Money> {
        self.unit_price.checked_multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order
// =============================================================================

/// Optional extras an operator may attach when committing the cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub notes: Option<String>,
    pub table_number: Option<String>,
}

impl OrderDetails {
    pub fn for_table(table_number: impl Into<String>) -> Self {
        OrderDetails {
            notes: None,
            table_number: Some(table_number.into()),
        }
    }
}

/// A committed order.
///
/// Everything except `status` is frozen at commit time, so the fields are
/// only readable from outside the crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    id: String,
    items: Vec<OrderItem>,
    total: Money,
    pub(crate) status: OrderStatus,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
    notes: Option<String>,
    table_number: Option<String>,
}

impl Order {
    /// Exact sum of `quantity × unit_price` over `items`.
    pub fn total_of(items: &[OrderItem]) -> CoreResult<Money> {
        items
            .iter()
            .try_fold(Money::ZERO, |sum, item| {
                item.checked_line_total().and_then(|line| sum.checked_add(line))
            })
            .ok_or(CoreError::TotalOverflow)
    }

    /// Freezes `items` into an order.
    ///
    /// Callers guarantee `items` is non-empty and that `total` came from
    /// [`Order::total_of`] on the same lines.
    pub(crate) fn freeze(
        id: String,
        items: Vec<OrderItem>,
        total: Money,
        created_at: DateTime<Utc>,
        details: OrderDetails,
    ) -> Self {
        Order {
            id,
            items,
            total,
            status: OrderStatus::New,
            created_at,
            notes: details.notes,
            table_number: details.table_number,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_lines(
        id: &str,
        items: Vec<OrderItem>,
        created_at: DateTime<Utc>,
        details: OrderDetails,
    ) -> CoreResult<Self> {
        let total = Order::total_of(&items)?;
        Ok(Order::freeze(id.to_string(), items, total, created_at, details))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// First eight characters of the id, as printed on receipts.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Total frozen at commit time.
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn table_number(&self) -> Option<&str> {
        self.table_number.as_deref()
    }

    /// Number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Line total for one product, if it is part of the order.
    pub fn line_total(&self, product_id: &str) -> Option<Money> {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map(OrderItem::line_total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_order() -> Order {
        Order::from_lines(
            "a1b2c3d4e5f6",
            vec![
                OrderItem::new("p1", "Falafel Wrap", 2, Money::from_cents(500)),
                OrderItem::new("p2", "Mint Tea", 1, Money::from_cents(350)),
            ],
            Utc.with_ymd_and_hms(2026, 3, 14, 12, 30, 0).unwrap(),
            OrderDetails::for_table("7"),
        )
        .unwrap()
    }

    #[test]
    fn test_tax_rate_percent_conversion() {
        let ontario = TaxRate::from_percentage(13.0);
        assert_eq!(ontario.bps(), 1300);
        assert_eq!(TaxRate::from_percentage(8.25).bps(), 825);
        assert!((TaxRate::from_bps(725).percentage() - 7.25).abs() < 1e-9);
        assert_eq!(TaxRate::from_percentage(-3.0), TaxRate::zero());
        assert!(TaxRate::default().is_zero());
    }

    #[test]
    fn test_order_total_is_sum_of_lines() {
        let order = sample_order();
        assert_eq!(order.total(), Money::from_cents(1350));
        assert_eq!(order.status(), OrderStatus::New);
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.line_total("p1"), Some(Money::from_cents(1000)));
        assert_eq!(order.line_total("nope"), None);
        assert_eq!(order.table_number(), Some("7"));
        assert_eq!(order.notes(), None);
    }

    #[test]
    fn test_total_of_rejects_overflowing_lines() {
        let wide = OrderItem::new("p1", "Catering", u32::MAX, Money::from_cents(3_000_000_000));
        assert_eq!(wide.checked_line_total(), None);
        assert_eq!(Order::total_of(&[wide]), Err(CoreError::TotalOverflow));

        let big = OrderItem::new("p1", "Catering", 1, Money::from_cents(i64::MAX));
        let one = OrderItem::new("p2", "Tea", 1, Money::from_cents(1));
        assert_eq!(Order::total_of(&[big.clone()]), Ok(Money::from_cents(i64::MAX)));
        assert_eq!(Order::total_of(&[big, one]), Err(CoreError::TotalOverflow));
    }

    #[test]
    fn test_short_id() {
        let order = sample_order();
        assert_eq!(order.short_id(), "a1b2c3d4");

        let short = Order::from_lines(
            "abc",
            vec![OrderItem::new("p1", "Tea", 1, Money::from_cents(100))],
            Utc::now(),
            OrderDetails::default(),
        )
        .unwrap();
        assert_eq!(short.short_id(), "abc");
    }

    #[test]
    fn test_order_item_snapshot_from_product() {
        let product = NewProduct::new("Shawarma", Money::from_cents(899), "Wraps")
            .into_product("p9".to_string());
        let item = OrderItem::from_product(&product, 2);

        assert_eq!(item.product_id, "p9");
        assert_eq!(item.product_name, "Shawarma");
        assert_eq!(item.unit_price, Money::from_cents(899));
        assert_eq!(item.line_total(), Money::from_cents(1798));
    }

    #[test]
    fn test_product_draft_roundtrip_keeps_fields() {
        let draft = NewProduct::new("Lemonade", Money::from_cents(250), "Drinks")
            .with_description("Fresh")
            .unavailable();
        let product = draft.clone().into_product("x".to_string());
        assert_eq!(product.to_draft(), draft);
        assert!(!product.is_available);
    }

    #[test]
    fn test_serde_field_names_are_camel_case() {
        let item = OrderItem::new("p1", "Tea", 1, Money::from_cents(350));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["productId"], "p1");
        assert_eq!(json["productName"], "Tea");
        assert_eq!(json["unitPrice"], 350);

        let json = serde_json::to_value(sample_order()).unwrap();
        assert_eq!(json["status"], "new");
        assert_eq!(json["tableNumber"], "7");
        assert_eq!(json["total"], 1350);
    }
}
