//! In-Memory Repository
//!
//! Generic `Repository` over a vector, for tests and offline use.
//! Unlike the SQLite store it does not cascade deletes: callers that need
//! children gone delete them explicitly.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, Entity, Filter};
use super::traits::Repository;

struct Table<T> {
    rows: Vec<T>,
    next_id: u32,
}

/// In-memory implementation of `Repository<T>` for any entity
pub struct MemoryRepository<T: Entity> {
    table: Mutex<Table<T>>,
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table { rows: Vec::new(), next_id: 1 }),
        }
    }

    /// Seed with existing records, keeping their ids
    pub fn with_records(records: Vec<T>) -> Self {
        let repo = Self::new();
        {
            let table = repo.table.try_lock();
            if let Ok(mut table) = table {
                table.rows = records;
                table.next_id = table.rows.len() as u32 + 1;
            }
        }
        repo
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn next_order<T: Entity>(rows: &[T], parent: u32) -> i32 {
    rows.iter()
        .filter_map(T::sibling_rank)
        .filter(|(p, _)| *p == parent)
        .map(|(_, order)| order)
        .max()
        .map(|max| max + 1)
        .unwrap_or(0)
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn create(&self, entity: &T) -> DomainResult<T> {
        let mut table = self.table.lock().await;

        let mut created = entity.clone();
        loop {
            created.assign_id(table.next_id);
            table.next_id += 1;
            let id = created.id();
            if !table.rows.iter().any(|r| r.id() == id) {
                break;
            }
            // Externally keyed entities keep their id, so a clash is a real conflict
            let mut retry = created.clone();
            retry.assign_id(table.next_id);
            if retry.id() == id {
                return Err(DomainError::Conflict(format!("{} {:?} already exists", T::KIND, id)));
            }
        }

        if let Some((parent, order)) = created.sibling_rank() {
            if order < 0 {
                let resolved = next_order(&table.rows, parent);
                created.set_order(resolved);
            }
        }

        table.rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &T::Id) -> DomainResult<Option<T>> {
        let table = self.table.lock().await;
        Ok(table.rows.iter().find(|r| &r.id() == id).cloned())
    }

    async fn list(&self, filter: &Filter) -> DomainResult<Vec<T>> {
        let table = self.table.lock().await;
        let mut matched: Vec<T> = table.rows.iter().filter(|r| filter.matches(*r)).cloned().collect();
        filter.sort(&mut matched);
        Ok(matched)
    }

    async fn update(&self, id: &T::Id, patch: &T::Patch) -> DomainResult<T> {
        let mut table = self.table.lock().await;
        let record = table
            .rows
            .iter_mut()
            .find(|r| &r.id() == id)
            .ok_or_else(|| DomainError::not_found::<T>(id))?;
        record.apply_patch(patch);
        Ok(record.clone())
    }

    async fn delete(&self, id: &T::Id) -> DomainResult<()> {
        let mut table = self.table.lock().await;
        table.rows.retain(|r| &r.id() != id);
        Ok(())
    }
}
