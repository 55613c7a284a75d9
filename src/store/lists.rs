use board_store::{List, ListPatch};

use super::BoardStore;
use crate::error::{StoreError, StoreResult};
use crate::ordering::ItemId;

impl BoardStore {
    /// Append a list to the board
    pub async fn add_list(&self, board_id: ItemId, title: &str) -> StoreResult<List> {
        let title = self.require_title(title, "List")?;
        let created = self
            .backend
            .lists
            .create(&List::new(board_id, title))
            .await
            .map_err(|e| self.report("Failed to create list", e))?;

        self.cache.borrow_mut().upsert(created.clone());
        Ok(created)
    }

    pub async fn rename_list(&self, id: ItemId, title: &str) -> StoreResult<List> {
        let title = self.require_title(title, "List")?;
        let patch = ListPatch { title: Some(title), ..Default::default() };
        let updated = self
            .backend
            .lists
            .update(&id, &patch)
            .await
            .map_err(|e| self.report("Failed to rename list", e))?;

        self.cache.borrow_mut().upsert(updated.clone());
        Ok(updated)
    }

    /// Delete a list with its cards
    pub async fn delete_list(&self, id: ItemId) -> StoreResult<()> {
        let title = self
            .cache
            .borrow()
            .get::<List>(&id)
            .map(|l| l.title.clone())
            .ok_or_else(|| StoreError::NotCached(format!("List {}", id)))?;

        self.backend
            .lists
            .delete(&id)
            .await
            .map_err(|e| self.report("Failed to delete list", e))?;

        self.cache.borrow_mut().remove_list(id);
        self.announce(&format!("List \"{}\" deleted", title));
        Ok(())
    }
}
