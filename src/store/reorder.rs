//! Optimistic reorders
//!
//! A reorder runs in two halves. `begin_reorder` computes the placements and
//! applies them to the cache synchronously, so the next render already shows
//! the new sequence. `commit` then writes every changed record concurrently
//! and, for the writes that fail, puts the cache back.

use std::marker::PhantomData;

use futures_util::future::join_all;
use leptos_dragdrop::{DragItem, DragKind, DropTarget};

use board_store::{Card, DomainError, List, Subtask};

use super::BoardStore;
use crate::backend::Persisted;
use crate::cache::CacheSlot;
use crate::dnd::resolve_drop;
use crate::ordering::{ContainerId, ItemId, Ordered};
use crate::reconcile::{self, Placement, ReorderRequest};

/// Entities the store can reorder
pub trait Reorderable: Ordered + CacheSlot + Persisted {}

impl<T: Ordered + CacheSlot + Persisted> Reorderable for T {}

/// A reorder already visible in the cache, not yet written
#[must_use = "a pending reorder is only persisted by `commit`"]
#[derive(Debug)]
pub struct PendingReorder<T> {
    dragged: ItemId,
    placements: Vec<Placement>,
    priors: Vec<Placement>,
    _kind: PhantomData<T>,
}

impl<T> PendingReorder<T> {
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Outcome of writing a reorder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitReport {
    /// Records written successfully
    pub written: Vec<ItemId>,
    pub failed: Vec<(ItemId, DomainError)>,
    /// Failed records whose cached placement was put back
    pub reverted: Vec<ItemId>,
}

impl CommitReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Nothing needed writing
    pub fn is_noop(&self) -> bool {
        self.written.is_empty() && self.failed.is_empty()
    }
}

impl BoardStore {
    /// Compute a reorder and show it immediately. A destination that is not
    /// cached gives an empty reorder.
    pub fn begin_reorder<T: Reorderable>(&self, request: &ReorderRequest) -> PendingReorder<T> {
        let mut cache = self.cache.borrow_mut();
        if !cache.has_container::<T>(request.dest) {
            log::debug!("{} {} dropped on unknown container {}", T::KIND, request.dragged, request.dest);
            return PendingReorder {
                dragged: request.dragged,
                placements: Vec::new(),
                priors: Vec::new(),
                _kind: PhantomData,
            };
        }
        let placements = reconcile::reorder(T::records(&cache), request);
        let priors = cache.apply_placements::<T>(&placements);
        PendingReorder {
            dragged: request.dragged,
            placements,
            priors,
            _kind: PhantomData,
        }
    }

    /// Write a pending reorder, one update per changed record, all in flight
    /// together. There is no transaction: some writes can land while others
    /// fail, and only the failed ones are rolled back.
    pub async fn commit<T: Reorderable>(&self, pending: PendingReorder<T>) -> CommitReport {
        let mut report = CommitReport::default();
        if pending.is_empty() {
            return report;
        }

        let repo = T::repository(&self.backend).clone();
        let patches: Vec<(ItemId, T::Patch)> = pending
            .placements
            .iter()
            .map(|p| (p.id, T::placement_patch(p)))
            .collect();
        let results = join_all(patches.iter().map(|(id, patch)| repo.update(id, patch))).await;

        let mut cache = self.cache.borrow_mut();
        for (placement, result) in pending.placements.iter().zip(results) {
            match result {
                Ok(_) => report.written.push(placement.id),
                Err(e) => {
                    log::warn!("{} {} reorder write failed: {}", T::KIND, placement.id, e);
                    let prior = pending.priors.iter().find(|p| p.id == placement.id);
                    if let Some(prior) = prior.filter(|_| self.config.rollback_on_failure) {
                        if cache.revert_placement::<T>(prior, placement) {
                            report.reverted.push(placement.id);
                        }
                    }
                    report.failed.push((placement.id, e));
                }
            }
        }

        let dragged = cache.get::<T>(&pending.dragged).map(|r| r.title().to_string());
        drop(cache);

        if !report.is_clean() {
            let noun = T::KIND.to_lowercase();
            self.report(
                &format!("Failed to move {}", noun),
                report.failed[0].1.clone(),
            );
            return report;
        }

        let crossed = pending.placements.iter().any(|p| p.id == pending.dragged && p.moved);
        if crossed && self.config.announce_moves {
            if let Some(title) = dragged {
                self.announce(&format!("\"{}\" moved successfully", title));
            }
        }
        report
    }

    /// Reorder and write in one call
    pub async fn reorder<T: Reorderable>(&self, request: &ReorderRequest) -> CommitReport {
        let pending = self.begin_reorder::<T>(request);
        self.commit(pending).await
    }

    /// Move a card within its list or to another list
    pub async fn reorder_cards(&self, request: &ReorderRequest) -> CommitReport {
        self.reorder::<Card>(request).await
    }

    /// Move a list within its board
    pub async fn reorder_lists(&self, board_id: ContainerId, list_id: ItemId, dest_index: i64) -> CommitReport {
        let request = ReorderRequest { dragged: list_id, source: board_id, dest: board_id, dest_index };
        let report = self.reorder::<List>(&request).await;
        if self.config.announce_moves && report.is_clean() && !report.is_noop() {
            self.announce("List reordered successfully");
        }
        report
    }

    /// Move a subtask within its card
    pub async fn reorder_subtasks(&self, card_id: ContainerId, subtask_id: ItemId, dest_index: i64) -> CommitReport {
        let request = ReorderRequest { dragged: subtask_id, source: card_id, dest: card_id, dest_index };
        self.reorder::<Subtask>(&request).await
    }

    /// Complete a drag gesture. `None` when the target does not resolve.
    pub async fn drop_item(&self, item: DragItem, target: DropTarget) -> Option<CommitReport> {
        let request = resolve_drop(&self.cache.borrow(), item, target)?;
        log::debug!("drop {:?} on {:?} -> {:?}", item, target, request);
        let report = match item.kind {
            DragKind::Card => self.reorder::<Card>(&request).await,
            DragKind::List => self.reorder_lists(request.dest, request.dragged, request.dest_index).await,
            DragKind::Subtask => self.reorder::<Subtask>(&request).await,
        };
        Some(report)
    }
}
