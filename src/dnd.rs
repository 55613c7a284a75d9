//! Drop Resolution
//!
//! Turns what the drag layer reports, an item and the target under the
//! pointer, into a reorder request against the cache. Targets that cannot
//! be resolved (gone items, wrong container kind, another board) give
//! `None` and the drop is ignored.

use leptos_dragdrop::{DragItem, DragKind, DropTarget};

use crate::cache::{BoardCache, CacheSlot};
use crate::ordering::{rank, Ordered};
use crate::reconcile::ReorderRequest;

fn resolve<T: CacheSlot + Ordered>(
    cache: &BoardCache,
    dragged_id: u32,
    target: DropTarget,
) -> Option<ReorderRequest> {
    let dragged = cache.get::<T>(&dragged_id)?;
    let source = dragged.container_id();

    let (dest, dest_index) = match target {
        DropTarget::Item(target_id) => {
            let target = cache.get::<T>(&target_id)?;
            let dest = target.container_id();
            // Taking the hovered item's slot: its index in the full sequence
            let index = rank(T::records(cache), dest).iter().position(|i| i.id() == target_id)?;
            (dest, index as i64)
        }
        DropTarget::Zone(dest, gap) => {
            if !cache.has_container::<T>(dest) {
                return None;
            }
            // Gaps are counted with the dragged item still in place
            let mut index = gap as i64;
            if dest == source {
                let current = rank(T::records(cache), source).iter().position(|i| i.id() == dragged_id)?;
                if (current as i64) < index {
                    index -= 1;
                }
            }
            (dest, index)
        }
        DropTarget::Container(dest) => {
            if !cache.has_container::<T>(dest) {
                return None;
            }
            (dest, i64::MAX)
        }
    };

    if dest != source && !T::crosses_containers() {
        return None;
    }
    Some(ReorderRequest { dragged: dragged_id, source, dest, dest_index })
}

/// Reorder request for dropping `item` on `target`, if it resolves
pub fn resolve_drop(cache: &BoardCache, item: DragItem, target: DropTarget) -> Option<ReorderRequest> {
    match item.kind {
        DragKind::Card => resolve::<board_store::Card>(cache, item.id, target),
        DragKind::List => resolve::<board_store::List>(cache, item.id, target),
        DragKind::Subtask => resolve::<board_store::Subtask>(cache, item.id, target),
    }
}
