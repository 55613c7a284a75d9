//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;

use crate::domain::{DomainResult, Entity, Filter};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type.
/// All operations are async to support various backends. There is no
/// transaction or batch primitive: every call stands alone and the last
/// write to a record wins.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity. The store allocates the id; an `APPEND` order
    /// is resolved against the record's siblings.
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: &T::Id) -> DomainResult<Option<T>>;

    /// List entities matching `filter`, in the filter's order
    async fn list(&self, filter: &Filter) -> DomainResult<Vec<T>>;

    /// Apply a partial update and return the full updated record
    async fn update(&self, id: &T::Id, patch: &T::Patch) -> DomainResult<T>;

    /// Delete entity by ID. Deleting a missing record is not an error.
    async fn delete(&self, id: &T::Id) -> DomainResult<()>;
}

/// Sibling rank maintenance for ranked entities
#[async_trait]
pub trait PositioningOperations {
    /// Get next position under a parent (used in create)
    async fn next_position(&self, parent_id: u32) -> DomainResult<i32>;

    /// Reindex children of a parent to be sequential (0, 1, 2, ...)
    async fn reindex(&self, parent_id: u32) -> DomainResult<()>;
}
