use board_store::{Board, Card, CardPatch, TaskStatus};

use super::BoardStore;
use crate::error::{StoreError, StoreResult};
use crate::ordering::ItemId;

/// Field edits from the card detail view. `None` leaves a field alone;
/// `description: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardEdit {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Vec<String>>,
}

impl CardEdit {
    pub fn status(status: TaskStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Default::default() }
    }

    pub fn description(description: Option<String>) -> Self {
        Self { description: Some(description), ..Default::default() }
    }
}

impl BoardStore {
    /// Append a card to the list, assigned to the board's members
    pub async fn add_card(&self, list_id: ItemId, title: &str) -> StoreResult<Card> {
        let session = self.require_session("create cards")?;
        let title = self.require_title(title, "Card")?;

        let (board_id, assigned_to) = {
            let cache = self.cache.borrow();
            let board_id = cache.board_of_list(list_id);
            let members = board_id
                .and_then(|id| cache.get::<Board>(&id))
                .map(|b| b.members.clone())
                .unwrap_or_default();
            (board_id, members)
        };

        let mut card = Card::new(list_id, title, Some(session.user_id.clone()));
        card.assigned_to = assigned_to;
        let created = self
            .backend
            .cards
            .create(&card)
            .await
            .map_err(|e| self.report("Failed to create card", e))?;

        let mut cache = self.cache.borrow_mut();
        cache.upsert(created.clone());
        if let Some(board_id) = board_id {
            cache.adjust_task_count(board_id, 1);
        }
        Ok(created)
    }

    /// Apply edits and tell the user what changed
    pub async fn update_card(&self, id: ItemId, edit: CardEdit) -> StoreResult<Card> {
        let previous = self
            .cache
            .borrow()
            .get::<Card>(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotCached(format!("Card {}", id)))?;

        let title = match &edit.title {
            Some(title) => Some(self.require_title(title, "Card")?),
            None => None,
        };
        let patch = CardPatch {
            title,
            description: edit.description.clone(),
            status: edit.status,
            assigned_to: edit.assigned_to.clone(),
            ..Default::default()
        };

        let updated = self
            .backend
            .cards
            .update(&id, &patch)
            .await
            .map_err(|e| self.report("Failed to update card", e))?;
        self.cache.borrow_mut().upsert(updated.clone());

        if let Some(status) = edit.status.filter(|s| *s != previous.status) {
            self.announce(&format!("\"{}\" status updated to {}", updated.title, status.label()));
        }
        if updated.title != previous.title {
            self.announce(&format!("Card renamed to \"{}\"", updated.title));
        }
        if edit.description.is_some() && updated.description != previous.description {
            self.announce("Description updated successfully");
        }
        Ok(updated)
    }

    pub async fn delete_card(&self, id: ItemId) -> StoreResult<()> {
        let title = self
            .cache
            .borrow()
            .get::<Card>(&id)
            .map(|c| c.title.clone())
            .ok_or_else(|| StoreError::NotCached(format!("Card {}", id)))?;

        self.backend
            .cards
            .delete(&id)
            .await
            .map_err(|e| self.report("Failed to delete card", e))?;

        self.cache.borrow_mut().remove_card(id);
        self.announce(&format!("\"{}\" deleted", title));
        Ok(())
    }
}
