use board_store::{Board, BoardPatch};

use super::BoardStore;
use crate::error::{StoreError, StoreResult};
use crate::ordering::ItemId;

impl BoardStore {
    /// Create a board in the session's company with the user as first member
    pub async fn add_board(&self, title: &str) -> StoreResult<Board> {
        let session = self.require_session("create boards")?;
        let title = self.require_title(title, "Board")?;

        let board = Board::new(session.company_id.clone(), title, Some(session.user_id.clone()));
        let created = self
            .backend
            .boards
            .create(&board)
            .await
            .map_err(|e| self.report("Failed to create board", e))?;

        self.cache.borrow_mut().upsert(created.clone());
        self.announce(&format!("Board \"{}\" created successfully", created.title));
        Ok(created)
    }

    pub async fn rename_board(&self, id: ItemId, title: &str) -> StoreResult<Board> {
        let title = self.require_title(title, "Board")?;
        let patch = BoardPatch { title: Some(title), ..Default::default() };
        self.patch_board(id, &patch, "Failed to rename board").await
    }

    /// Replace the member list; membership drives card auto-assignment
    pub async fn set_board_members(&self, id: ItemId, members: Vec<String>) -> StoreResult<Board> {
        let patch = BoardPatch { members: Some(members), ..Default::default() };
        let board = self.patch_board(id, &patch, "Failed to update board members").await?;
        self.announce("Board members updated");
        Ok(board)
    }

    async fn patch_board(&self, id: ItemId, patch: &BoardPatch, failure: &str) -> StoreResult<Board> {
        let mut updated = self
            .backend
            .boards
            .update(&id, patch)
            .await
            .map_err(|e| self.report(failure, e))?;

        let mut cache = self.cache.borrow_mut();
        // Not every record store derives the count; the cache tracks it
        if let Some(cached) = cache.get::<Board>(&id) {
            updated.task_count = cached.task_count;
        }
        cache.upsert(updated.clone());
        Ok(updated)
    }

    pub async fn delete_board(&self, id: ItemId) -> StoreResult<()> {
        let title = self
            .cache
            .borrow()
            .get::<Board>(&id)
            .map(|b| b.title.clone())
            .ok_or_else(|| StoreError::NotCached(format!("Board {}", id)))?;

        self.backend
            .boards
            .delete(&id)
            .await
            .map_err(|e| self.report("Failed to delete board", e))?;

        self.cache.borrow_mut().remove_board(id);
        self.announce(&format!("Board \"{}\" deleted", title));
        Ok(())
    }
}
