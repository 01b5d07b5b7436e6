//! # Error Types
//!
//! Domain-specific error types for driwich-core.
//!
//! ## Error Hierarchy
//! ```text
//! driwich-core (this file)
//! ├── CoreError        business rules: empty cart, bad transition, ...
//! └── ValidationError  operator input that failed a field check
//!
//! driwich-printer
//! └── PrintError       socket / timeout / bad printer address
//!
//! apps/register
//! └── ApiError         code + message shown at the prompt
//! ```
//!
//! ## Missing ids are not errors
//! Updating, removing or re-statusing something that does not exist is a
//! silent no-op everywhere in the stores. Those operations return an
//! [`Outcome`] instead of a `Result`, so callers can still tell the two
//! cases apart.

use crate::status::OrderStatus;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Everything a store operation can refuse.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoreError {
    /// Attempt to commit a cart with no lines.
    ///
    /// The cart and the order history are left untouched.
    #[error("Cannot create an empty order")]
    EmptyCart,

    /// Product exists but is switched off in the catalog.
    #[error("Product {0} is not available")]
    ProductUnavailable(String),

    /// Product id is not in the catalog.
    #[error("No product with id {0}")]
    ProductNotFound(String),

    /// Order id is not in the history.
    ///
    /// Only raised by the policy-checked [`crate::OrderHistory::advance`];
    /// the raw `set_status` treats a missing id as a no-op.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// A cart line would go past [`crate::MAX_ITEM_QUANTITY`].
    ///
    /// The line keeps the quantity it had.
    #[error("{product_id} cannot go above {max} units")]
    QuantityLimit { product_id: String, max: u32 },

    /// The order total does not fit in a `Money`. The cart is left as it was.
    #[error("Order total is too large to record")]
    TotalOverflow,

    /// The requested status change is not in the transition table.
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// A field check failed before the store was touched.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single field that failed its check.
///
/// Raised by the helpers in [`crate::validation`], which the presentation
/// layer runs before it hands data to the stores.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// Blank after trimming.
    #[error("{field} cannot be blank")]
    Required { field: String },

    #[error("{field} is longer than {max} characters")]
    TooLong { field: String, max: usize },

    /// Outside the inclusive `min..=max` window.
    #[error("{field} has to be from {min} to {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} has to be greater than zero")]
    MustBePositive { field: String },

    /// Unparseable, e.g. a price with three decimals.
    #[error("{field} is malformed: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Outcome
// =============================================================================

/// Result of an id-addressed store mutation.
///
/// `Ignored` means nothing matched and nothing changed.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Ignored,
}

impl Outcome {
    /// Builds an outcome from a "did anything match" flag.
    #[inline]
    pub fn from_match(matched: bool) -> Self {
        if matched {
            Outcome::Applied
        } else {
            Outcome::Ignored
        }
    }

    #[inline]
    pub fn is_applied(self) -> bool {
        self == Outcome::Applied
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Result alias used by every fallible store call.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
