//! # Catalog Store
//!
//! Owns the menu: the set of sellable products, in insertion order.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator Action            Catalog Operation        Effect            │
//! │  ───────────────            ─────────────────        ──────            │
//! │  Save new product ────────► add(draft) ────────────► push + fresh id   │
//! │  Save edited product ─────► update(product) ───────► replace by id     │
//! │  Delete product ──────────► remove(id) ────────────► drop by id        │
//! │                                                                         │
//! │  Unknown ids are ignored. Nothing here cascades into the cart or the   │
//! │  order history: they hold their own snapshots.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Input is trusted. The presentation layer runs [`crate::validation`]
//! before calling in.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Outcome;
use crate::id::IdGenerator;
use crate::types::{NewProduct, Product};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStore {
    products: Vec<Product>,
}

impl CatalogStore {
    pub fn new() -> Self {
        CatalogStore::default()
    }

    /// Stores a new product under a fresh id and returns it.
    pub fn add(&mut self, draft: NewProduct, ids: &mut dyn IdGenerator) -> Product {
        let product = draft.into_product(ids.next_id());
        debug!(id = %product.id, name = %product.name, "product added");
        self.products.push(product.clone());
        product
    }

    /// Replaces the product with the same id.
    ///
    /// An unknown id is ignored: nothing is inserted.
    pub fn update(&mut self, product: Product) -> Outcome {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => {
                debug!(id = %product.id, "product updated");
                *slot = product;
                Outcome::Applied
            }
            None => {
                warn!(id = %product.id, "update for unknown product ignored");
                Outcome::Ignored
            }
        }
    }

    /// Removes the product with `id`, if present.
    pub fn remove(&mut self, id: &str) -> Outcome {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        let outcome = Outcome::from_match(self.products.len() != before);
        debug!(id, ?outcome, "product remove");
        outcome
    }

    /// All products, in insertion order.
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products that can be tapped into the cart.
    pub fn available(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_available)
    }

    /// Distinct categories, in the order they first appear.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.contains(&product.category.as_str()) {
                seen.push(&product.category);
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIds;
    use crate::money::Money;

    fn catalog_with_two() -> (CatalogStore, SequentialIds) {
        let mut ids = SequentialIds::new("p");
        let mut catalog = CatalogStore::new();
        catalog.add(NewProduct::new("Falafel Wrap", Money::from_cents(500), "Wraps"), &mut ids);
        catalog.add(NewProduct::new("Mint Tea", Money::from_cents(350), "Drinks"), &mut ids);
        (catalog, ids)
    }

    #[test]
    fn test_add_assigns_fresh_ids_in_order() {
        let (catalog, _) = catalog_with_two();
        let ids: Vec<&str> = catalog.list().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p-1", "p-2"]);
        assert_eq!(catalog.list()[0].name, "Falafel Wrap");
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let (mut catalog, mut ids) = catalog_with_two();
        assert_eq!(catalog.remove("p-2"), Outcome::Applied);

        let added = catalog.add(NewProduct::new("Ayran", Money::from_cents(200), "Drinks"), &mut ids);
        assert_eq!(added.id, "p-3");
        assert!(catalog.get("p-2").is_none());
    }

    #[test]
    fn test_update_replaces_matching_product() {
        let (mut catalog, _) = catalog_with_two();
        let mut edited = catalog.get("p-1").unwrap().clone();
        edited.price = Money::from_cents(650);
        edited.name = "Large Falafel Wrap".to_string();

        assert_eq!(catalog.update(edited.clone()), Outcome::Applied);
        assert_eq!(catalog.get("p-1"), Some(&edited));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_update_unknown_id_does_not_insert() {
        let (mut catalog, _) = catalog_with_two();
        let before = catalog.list().to_vec();

        let ghost = NewProduct::new("Ghost", Money::from_cents(1), "None")
            .into_product("missing".to_string());
        assert_eq!(catalog.update(ghost), Outcome::Ignored);
        assert_eq!(catalog.list(), before.as_slice());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let (mut catalog, _) = catalog_with_two();
        assert_eq!(catalog.remove("missing"), Outcome::Ignored);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_available_and_categories() {
        let (mut catalog, mut ids) = catalog_with_two();
        catalog.add(
            NewProduct::new("Baklava", Money::from_cents(300), "Desserts").unavailable(),
            &mut ids,
        );
        catalog.add(NewProduct::new("Lemonade", Money::from_cents(250), "Drinks"), &mut ids);

        let available: Vec<&str> = catalog.available().map(|p| p.name.as_str()).collect();
        assert_eq!(available, vec!["Falafel Wrap", "Mint Tea", "Lemonade"]);
        assert_eq!(catalog.categories(), vec!["Wraps", "Drinks", "Desserts"]);
    }
}
