//! # Order Status
//!
//! The order lifecycle and its transition policy.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │   ┌─────┐  Start Processing  ┌────────────┐  Complete Order  ┌───────┐ │
//! │   │ new │ ─────────────────► │ processing │ ───────────────► │ done  │ │
//! │   └──┬──┘                    └─────┬──────┘                  └───────┘ │
//! │      │          Cancel             │ Cancel                             │
//! │      └──────────────┬──────────────┘                                    │
//! │                     ▼                                                   │
//! │               ┌───────────┐                                             │
//! │               │ cancelled │     completed / cancelled are terminal      │
//! │               └───────────┘                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The table is a policy for callers. [`crate::OrderHistory::set_status`]
//! overwrites unconditionally; [`crate::OrderHistory::advance`] checks
//! [`OrderStatus::can_transition_to`] first.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// The status of a committed order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Just committed from the cart.
    #[default]
    New,
    /// Being prepared.
    Processing,
    /// Handed over. Terminal.
    Completed,
    /// Abandoned. Terminal.
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::New,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Statuses a conforming caller may request next.
    ///
    /// ```rust
    /// use driwich_core::OrderStatus;
    ///
    /// assert_eq!(
    ///     OrderStatus::New.allowed_next(),
    ///     &[OrderStatus::Processing, OrderStatus::Cancelled]
    /// );
    /// assert!(OrderStatus::Completed.allowed_next().is_empty());
    /// ```
    pub const fn allowed_next(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::New => &[OrderStatus::Processing, OrderStatus::Cancelled],
            OrderStatus::Processing => &[OrderStatus::Completed, OrderStatus::Cancelled],
            OrderStatus::Completed | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    /// The forward action offered as the primary button, if any.
    ///
    /// Cancellation is never the primary step.
    pub const fn next_step(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::New => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Badge text.
    pub const fn label(self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::Processing => "Processing",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Wire name, as serialized.
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: "expected new, processing, completed or cancelled".to_string(),
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
