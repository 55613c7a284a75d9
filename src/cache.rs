//! Optimistic Cache
//!
//! In-memory mirror of the records the session has loaded. The UI renders
//! from it; store actions mutate it before (reorders) or after (CRUD) the
//! record store answers. Every mutation bumps `revision`, once per logical
//! change, so a view re-renders a whole reorder in one go.

use board_store::{Board, Card, Entity, List, Member, Subtask};

use crate::ordering::{rank, ContainerId, ItemId, Ordered};
use crate::reconcile::Placement;

#[derive(Debug, Clone, Default)]
pub struct BoardCache {
    pub boards: Vec<Board>,
    pub lists: Vec<List>,
    pub cards: Vec<Card>,
    pub subtasks: Vec<Subtask>,
    pub members: Vec<Member>,
    revision: u64,
}

/// Typed access to the collection an entity lives in
pub trait CacheSlot: Entity {
    fn records(cache: &BoardCache) -> &Vec<Self>;
    fn records_mut(cache: &mut BoardCache) -> &mut Vec<Self>;

    /// Whether the container this entity is ranked in is cached.
    /// Entities that are not ranked have no container.
    fn container_cached(_cache: &BoardCache, _container: ContainerId) -> bool {
        false
    }
}

macro_rules! cache_slot {
    ($entity:ty, $field:ident) => {
        impl CacheSlot for $entity {
            fn records(cache: &BoardCache) -> &Vec<Self> {
                &cache.$field
            }

            fn records_mut(cache: &mut BoardCache) -> &mut Vec<Self> {
                &mut cache.$field
            }
        }
    };
    ($entity:ty, $field:ident, in $parent:ident) => {
        impl CacheSlot for $entity {
            fn records(cache: &BoardCache) -> &Vec<Self> {
                &cache.$field
            }

            fn records_mut(cache: &mut BoardCache) -> &mut Vec<Self> {
                &mut cache.$field
            }

            fn container_cached(cache: &BoardCache, container: ContainerId) -> bool {
                cache.$parent.iter().any(|p| p.id == container)
            }
        }
    };
}

cache_slot!(Board, boards);
cache_slot!(List, lists, in boards);
cache_slot!(Card, cards, in lists);
cache_slot!(Subtask, subtasks, in cards);
cache_slot!(Member, members);

impl BoardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped on every change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn get<T: CacheSlot>(&self, id: &T::Id) -> Option<&T> {
        T::records(self).iter().find(|r| &r.id() == id)
    }

    /// Whether `container` can hold `T` records
    pub fn has_container<T: CacheSlot>(&self, container: ContainerId) -> bool {
        T::container_cached(self, container)
    }

    /// Children of `container` in display order
    pub fn ranked<T: CacheSlot + Ordered>(&self, container: ContainerId) -> Vec<T> {
        rank(T::records(self), container).into_iter().cloned().collect()
    }

    /// Insert or replace by id
    pub fn upsert<T: CacheSlot>(&mut self, record: T) {
        let records = T::records_mut(self);
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.touch();
    }

    /// Replace every cached record matching `stale` with `fresh`
    pub fn replace_where<T: CacheSlot>(&mut self, stale: impl Fn(&T) -> bool, fresh: Vec<T>) {
        let records = T::records_mut(self);
        records.retain(|r| !stale(r));
        records.extend(fresh);
        self.touch();
    }

    /// Apply a reorder in one step. Returns the prior placement of every
    /// record touched, for rollback; placements for uncached ids are skipped.
    pub fn apply_placements<T: CacheSlot + Ordered>(&mut self, placements: &[Placement]) -> Vec<Placement> {
        let records = T::records_mut(self);
        let mut priors = Vec::with_capacity(placements.len());
        for placement in placements {
            if let Some(record) = records.iter_mut().find(|r| r.id() == placement.id) {
                priors.push(Placement {
                    id: placement.id,
                    container: record.container_id(),
                    order: record.order(),
                    moved: placement.moved,
                });
                record.place(placement.container, placement.order);
            }
        }
        if !priors.is_empty() {
            self.touch();
        }
        priors
    }

    /// Put a record back to `prior`, but only while it still holds the
    /// placement `written` by the reorder being undone. A later reorder of
    /// the same record wins over the rollback.
    pub fn revert_placement<T: CacheSlot + Ordered>(&mut self, prior: &Placement, written: &Placement) -> bool {
        let Some(record) = T::records_mut(self).iter_mut().find(|r| r.id() == prior.id) else {
            return false;
        };
        if record.container_id() != written.container || record.order() != written.order {
            return false;
        }
        record.place(prior.container, prior.order);
        self.touch();
        true
    }

    pub fn remove_subtask(&mut self, id: ItemId) -> Option<Subtask> {
        let index = self.subtasks.iter().position(|s| s.id == id)?;
        let removed = self.subtasks.remove(index);
        self.touch();
        Some(removed)
    }

    /// Remove a card and its subtasks
    pub fn remove_card(&mut self, id: ItemId) -> Option<Card> {
        let index = self.cards.iter().position(|c| c.id == id)?;
        let removed = self.cards.remove(index);
        self.subtasks.retain(|s| s.card_id != id);
        if let Some(board_id) = self.board_of_list(removed.list_id) {
            self.adjust_task_count(board_id, -1);
        }
        self.touch();
        Some(removed)
    }

    /// Remove a list with its cards and their subtasks
    pub fn remove_list(&mut self, id: ItemId) -> Option<List> {
        let index = self.lists.iter().position(|l| l.id == id)?;
        let removed = self.lists.remove(index);
        let card_ids: Vec<ItemId> = self.cards.iter().filter(|c| c.list_id == id).map(|c| c.id).collect();
        self.cards.retain(|c| c.list_id != id);
        self.subtasks.retain(|s| !card_ids.contains(&s.card_id));
        self.adjust_task_count(removed.board_id, -(card_ids.len() as i64));
        self.touch();
        Some(removed)
    }

    /// Remove a board with everything under it
    pub fn remove_board(&mut self, id: ItemId) -> Option<Board> {
        let index = self.boards.iter().position(|b| b.id == id)?;
        let removed = self.boards.remove(index);
        let list_ids: Vec<ItemId> = self.lists.iter().filter(|l| l.board_id == id).map(|l| l.id).collect();
        let card_ids: Vec<ItemId> = self
            .cards
            .iter()
            .filter(|c| list_ids.contains(&c.list_id))
            .map(|c| c.id)
            .collect();
        self.lists.retain(|l| l.board_id != id);
        self.cards.retain(|c| !list_ids.contains(&c.list_id));
        self.subtasks.retain(|s| !card_ids.contains(&s.card_id));
        self.touch();
        Some(removed)
    }

    pub fn board_of_list(&self, list_id: ItemId) -> Option<ItemId> {
        self.lists.iter().find(|l| l.id == list_id).map(|l| l.board_id)
    }

    /// Shift a board's derived task count, never below zero
    pub fn adjust_task_count(&mut self, board_id: ItemId, delta: i64) {
        if let Some(board) = self.boards.iter_mut().find(|b| b.id == board_id) {
            board.task_count = (board.task_count as i64 + delta).max(0) as u32;
            self.touch();
        }
    }

    /// `(completed, total)` subtasks of a card
    pub fn subtask_progress(&self, card_id: ItemId) -> (usize, usize) {
        let subtasks = self.subtasks.iter().filter(|s| s.card_id == card_id);
        subtasks.fold((0, 0), |(done, total), s| (done + s.completed as usize, total + 1))
    }
}
