//! # Identifier Generator
//!
//! Produces opaque ids for products and orders.
//!
//! Ids only need to be unique within one process lifetime. They are not
//! sortable and not meant to be unguessable.

use uuid::Uuid;

/// Source of fresh identifiers.
///
/// The context owns one generator and hands its ids to the catalog and the
/// order history, so a test can swap in [`SequentialIds`].
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> String;
}

/// UUID v4 in its 32-char simple form. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic `prefix-1`, `prefix-2`, ... ids.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialIds {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
