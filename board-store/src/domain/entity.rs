//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all domain entities.
//! All entities must have a unique ID and be thread-safe.

use serde::{Deserialize, Serialize};

use super::filter::FieldValue;

/// Order value meaning "after the current last sibling".
///
/// Stores resolve it on `create` to `max(order) + 1` among the record's
/// siblings, or 0 for the first child.
pub const APPEND: i32 = -1;

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone + 'static {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync;

    /// Partial update carried by `Repository::update`
    type Patch: std::fmt::Debug + Send + Sync;

    /// Singular name used in messages
    const KIND: &'static str;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;

    /// Give a freshly created record its store-allocated id.
    /// Entities keyed by an external id keep the one they were built with.
    fn assign_id(&mut self, _seq: u32) {}

    /// Read a column by name, for filtering and ordering.
    fn field(&self, column: &str) -> Option<FieldValue>;

    /// Overwrite the fields present in `patch`.
    fn apply_patch(&mut self, patch: &Self::Patch);

    /// `(parent_id, order)` for entities ranked among siblings.
    fn sibling_rank(&self) -> Option<(u32, i32)> {
        None
    }

    /// Set the rank among siblings. No-op for unranked entities.
    fn set_order(&mut self, _order: i32) {}
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found<T: Entity>(id: &T::Id) -> Self {
        DomainError::NotFound(format!("{} {:?} not found", T::KIND, id))
    }
}
