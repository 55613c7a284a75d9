use board_store::{Subtask, SubtaskPatch};

use super::BoardStore;
use crate::error::{StoreError, StoreResult};
use crate::ordering::ItemId;

impl BoardStore {
    pub async fn add_subtask(&self, card_id: ItemId, title: &str) -> StoreResult<Subtask> {
        let title = self.require_title(title, "Subtask")?;
        let created = self
            .backend
            .subtasks
            .create(&Subtask::new(card_id, title))
            .await
            .map_err(|e| self.report("Failed to create subtask", e))?;

        self.cache.borrow_mut().upsert(created.clone());
        Ok(created)
    }

    /// Flip completion. Subtasks not in the cache are rejected quietly.
    pub async fn toggle_subtask(&self, id: ItemId) -> StoreResult<Subtask> {
        let completed = self
            .cache
            .borrow()
            .get::<Subtask>(&id)
            .map(|s| s.completed)
            .ok_or_else(|| StoreError::NotCached(format!("Subtask {}", id)))?;

        let patch = SubtaskPatch { completed: Some(!completed), ..Default::default() };
        let updated = self
            .backend
            .subtasks
            .update(&id, &patch)
            .await
            .map_err(|e| self.report("Failed to update subtask", e))?;

        self.cache.borrow_mut().upsert(updated.clone());
        let verb = if updated.completed { "completed" } else { "reopened" };
        self.announce(&format!("\"{}\" {}", updated.title, verb));
        Ok(updated)
    }

    pub async fn delete_subtask(&self, id: ItemId) -> StoreResult<()> {
        self.backend
            .subtasks
            .delete(&id)
            .await
            .map_err(|e| self.report("Failed to delete subtask", e))?;

        self.cache.borrow_mut().remove_subtask(id);
        Ok(())
    }

    /// `(completed, total)` subtasks of a cached card
    pub fn subtask_progress(&self, card_id: ItemId) -> (usize, usize) {
        self.cache.borrow().subtask_progress(card_id)
    }
}
