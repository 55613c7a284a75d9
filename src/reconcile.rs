//! Reconciler
//!
//! Computes the new `(container, order)` of every sibling a drag touches.
//! The destination sequence is rebuilt without the dragged item, the item
//! is spliced in at the dropped index and the whole sequence is renumbered
//! 0..n. A cross-container move also renumbers what is left in the source.
//! Only records whose placement actually changes are returned.

use serde::{Deserialize, Serialize};

use crate::ordering::{rank, ContainerId, ItemId, Ordered};

/// A finished drag: put `dragged` at `dest_index` inside `dest`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub dragged: ItemId,
    /// Container the gesture started in, as reported by the UI
    pub source: ContainerId,
    pub dest: ContainerId,
    /// Requested slot; clamped to the destination's bounds
    pub dest_index: i64,
}

/// New placement of one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub id: ItemId,
    pub container: ContainerId,
    pub order: i32,
    /// The record changes container
    pub moved: bool,
}

fn renumber<T: Ordered>(
    sequence: &[&T],
    container: ContainerId,
    changes: &mut Vec<Placement>,
) {
    for (index, item) in sequence.iter().enumerate() {
        let order = index as i32;
        let moved = item.container_id() != container;
        if moved || item.order() != order {
            changes.push(Placement { id: item.id(), container, order, moved });
        }
    }
}

/// Placements that realise `request` over `items`.
///
/// Empty when the dragged item is unknown, when the drop lands where the
/// item already is, or when the item kind cannot change container.
pub fn reorder<T: Ordered>(items: &[T], request: &ReorderRequest) -> Vec<Placement> {
    let Some(dragged) = items.iter().find(|i| i.id() == request.dragged) else {
        log::debug!("{} {} is gone, ignoring drop", T::KIND, request.dragged);
        return Vec::new();
    };

    // The cache knows where the item really is; the gesture may be stale
    let source = dragged.container_id();
    if source != request.source {
        log::debug!(
            "{} {} reported in {} but cached in {}",
            T::KIND,
            request.dragged,
            request.source,
            source
        );
    }
    if source != request.dest && !T::crosses_containers() {
        return Vec::new();
    }

    let mut dest_sequence: Vec<&T> = rank(items, request.dest)
        .into_iter()
        .filter(|i| i.id() != request.dragged)
        .collect();
    let index = request.dest_index.clamp(0, dest_sequence.len() as i64) as usize;

    if source == request.dest {
        let current = rank(items, source).iter().position(|i| i.id() == request.dragged);
        if current == Some(index) {
            return Vec::new();
        }
    }

    dest_sequence.insert(index, dragged);
    let mut changes = Vec::new();
    renumber(&dest_sequence, request.dest, &mut changes);

    if source != request.dest {
        let remaining: Vec<&T> = rank(items, source)
            .into_iter()
            .filter(|i| i.id() != request.dragged)
            .collect();
        renumber(&remaining, source, &mut changes);
    }

    log::debug!(
        "{} {} -> {}[{}]: {} change(s)",
        T::KIND,
        request.dragged,
        request.dest,
        index,
        changes.len()
    );
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::ranked_ids;
    use board_store::{Card, List};

    fn card(id: u32, list_id: u32, order: i32) -> Card {
        let mut card = Card::new(list_id, format!("Card{}", id), None);
        card.id = id;
        card.order = order;
        card
    }

    fn apply(cards: &mut [Card], changes: &[Placement]) {
        for change in changes {
            if let Some(card) = cards.iter_mut().find(|c| c.id == change.id) {
                card.place(change.container, change.order);
            }
        }
    }

    fn orders(cards: &[Card], list_id: u32) -> Vec<i32> {
        rank(cards, list_id).iter().map(|c| c.order).collect()
    }

    fn request(dragged: u32, source: u32, dest: u32, dest_index: i64) -> ReorderRequest {
        ReorderRequest { dragged, source, dest, dest_index }
    }

    // Container 1: A=1, B=2, C=3, D=4
    fn abcd() -> Vec<Card> {
        vec![card(1, 1, 0), card(2, 1, 1), card(3, 1, 2), card(4, 1, 3)]
    }

    #[test]
    fn test_move_to_front_within_container() {
        let mut cards = abcd();
        let changes = reorder(&cards, &request(2, 1, 1, 0));
        apply(&mut cards, &changes);
        assert_eq!(ranked_ids(&cards, 1), vec![2, 1, 3, 4]);
        assert_eq!(orders(&cards, 1), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_cross_container_move() {
        // Source 1: A, B, C. Destination 2: X=10, Y=11
        let mut cards = vec![
            card(1, 1, 0),
            card(2, 1, 1),
            card(3, 1, 2),
            card(10, 2, 0),
            card(11, 2, 1),
        ];
        let changes = reorder(&cards, &request(2, 1, 2, 1));
        apply(&mut cards, &changes);

        assert_eq!(ranked_ids(&cards, 1), vec![1, 3]);
        assert_eq!(orders(&cards, 1), vec![0, 1]);
        assert_eq!(ranked_ids(&cards, 2), vec![10, 2, 11]);
        assert_eq!(orders(&cards, 2), vec![0, 1, 2]);

        let b = changes.iter().find(|c| c.id == 2).unwrap();
        assert!(b.moved);
        assert!(changes.iter().filter(|c| c.id != 2).all(|c| !c.moved));
    }

    #[test]
    fn test_self_drop_is_noop() {
        let cards = abcd();
        for (id, index) in [(1, 0), (2, 1), (4, 3)] {
            assert!(reorder(&cards, &request(id, 1, 1, index)).is_empty());
        }
    }

    #[test]
    fn test_self_drop_with_gapped_orders_is_noop() {
        let cards = vec![card(1, 1, 0), card(2, 1, 5), card(3, 1, 9)];
        assert!(reorder(&cards, &request(2, 1, 1, 1)).is_empty());
    }

    #[test]
    fn test_index_past_end_appends() {
        let mut cards = vec![card(1, 1, 0), card(10, 2, 0), card(11, 2, 1)];
        let changes = reorder(&cards, &request(1, 1, 2, 9999));
        apply(&mut cards, &changes);
        assert_eq!(ranked_ids(&cards, 2), vec![10, 11, 1]);
        assert_eq!(cards[0].order, 2);
    }

    #[test]
    fn test_negative_index_clamps_to_front() {
        let mut cards = abcd();
        let changes = reorder(&cards, &request(3, 1, 1, -4));
        apply(&mut cards, &changes);
        assert_eq!(ranked_ids(&cards, 1), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_empty_destination_takes_index_zero() {
        let mut cards = vec![card(1, 1, 0), card(2, 1, 1)];
        let changes = reorder(&cards, &request(2, 1, 7, 3));
        apply(&mut cards, &changes);
        assert_eq!(changes, vec![Placement { id: 2, container: 7, order: 0, moved: true }]);
        assert_eq!(ranked_ids(&cards, 7), vec![2]);
    }

    #[test]
    fn test_minimal_change_set() {
        // Dropping the last card at the end of another list shifts nobody
        let cards = vec![card(1, 1, 0), card(10, 2, 0), card(11, 2, 1)];
        let changes = reorder(&cards, &request(1, 1, 2, 2));
        assert_eq!(changes, vec![Placement { id: 1, container: 2, order: 2, moved: true }]);

        // Swapping the last two of a list touches only those two
        let cards = abcd();
        let changes = reorder(&cards, &request(4, 1, 1, 2));
        let ids: Vec<u32> = changes.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4, 3]);
    }

    #[test]
    fn test_missing_item_is_noop() {
        let cards = abcd();
        assert!(reorder(&cards, &request(99, 1, 1, 0)).is_empty());
    }

    #[test]
    fn test_cache_parent_wins_over_reported_source() {
        let mut cards = vec![card(1, 1, 0), card(2, 2, 0), card(3, 2, 1)];
        // UI claims card 2 came from list 1; it is cached in list 2
        let changes = reorder(&cards, &request(2, 1, 2, 1));
        apply(&mut cards, &changes);
        assert_eq!(ranked_ids(&cards, 2), vec![3, 2]);
        assert_eq!(ranked_ids(&cards, 1), vec![1]);
    }

    #[test]
    fn test_repeated_reorders_keep_ranks_distinct() {
        let mut cards = vec![
            card(1, 1, 0),
            card(2, 1, 0),
            card(3, 1, 4),
            card(4, 2, 0),
            card(5, 2, 1),
        ];
        let moves = [
            (3, 1, 0),
            (4, 1, 2),
            (1, 2, 9),
            (5, 2, 0),
            (2, 2, 1),
            (4, 1, 0),
        ];
        for (dragged, dest, index) in moves {
            let source = cards.iter().find(|c| c.id == dragged).unwrap().list_id;
            let changes = reorder(&cards, &request(dragged, source, dest, index));
            apply(&mut cards, &changes);
            for list_id in [1, 2] {
                let expected: Vec<i32> = (0..rank(&cards, list_id).len() as i32).collect();
                assert_eq!(orders(&cards, list_id), expected);
            }
        }
    }

    #[test]
    fn test_lists_never_change_board() {
        let mut a = List::new(1, "A".to_string());
        a.id = 1;
        a.order = 0;
        let mut b = List::new(1, "B".to_string());
        b.id = 2;
        b.order = 1;
        let lists = vec![a, b];

        assert!(reorder(&lists, &request(1, 1, 2, 0)).is_empty());
        let changes = reorder(&lists, &request(2, 1, 1, 0));
        assert_eq!(changes.len(), 2);
    }
}
