//! Ordered Collection Model
//!
//! Lists, cards and subtasks are ranked among the children of their
//! container by an integer `order`. Display sequence is always re-derived by
//! sorting; ties keep their original relative position, so duplicate ranks
//! give a possibly wrong but never a crashing order.

use board_store::{Card, CardPatch, Entity, List, ListPatch, Subtask, SubtaskPatch};

use crate::reconcile::Placement;

pub type ItemId = u32;
pub type ContainerId = u32;

/// An entity ranked among the children of a container
pub trait Ordered: Entity<Id = ItemId> {
    fn container_id(&self) -> ContainerId;

    fn order(&self) -> i32;

    fn title(&self) -> &str;

    /// Move to `container` at rank `order`
    fn place(&mut self, container: ContainerId, order: i32);

    /// Whether items may move to another container (cards between lists)
    fn crosses_containers() -> bool {
        false
    }

    /// Update carrying only what a placement changes
    fn placement_patch(placement: &Placement) -> Self::Patch;
}

impl Ordered for List {
    fn container_id(&self) -> ContainerId {
        self.board_id
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn place(&mut self, container: ContainerId, order: i32) {
        self.board_id = container;
        self.order = order;
    }

    fn placement_patch(placement: &Placement) -> ListPatch {
        ListPatch {
            order: Some(placement.order),
            ..Default::default()
        }
    }
}

impl Ordered for Card {
    fn container_id(&self) -> ContainerId {
        self.list_id
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn place(&mut self, container: ContainerId, order: i32) {
        self.list_id = container;
        self.order = order;
    }

    fn crosses_containers() -> bool {
        true
    }

    fn placement_patch(placement: &Placement) -> CardPatch {
        CardPatch {
            list_id: placement.moved.then_some(placement.container),
            order: Some(placement.order),
            ..Default::default()
        }
    }
}

impl Ordered for Subtask {
    fn container_id(&self) -> ContainerId {
        self.card_id
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn place(&mut self, container: ContainerId, order: i32) {
        self.card_id = container;
        self.order = order;
    }

    fn placement_patch(placement: &Placement) -> SubtaskPatch {
        SubtaskPatch {
            order: Some(placement.order),
            ..Default::default()
        }
    }
}

/// Children of `container`, ascending by order. Stable on ties.
pub fn rank<T: Ordered>(items: &[T], container: ContainerId) -> Vec<&T> {
    let mut children: Vec<&T> = items.iter().filter(|i| i.container_id() == container).collect();
    children.sort_by_key(|i| i.order());
    children
}

/// Ids of `container`'s children in display sequence
pub fn ranked_ids<T: Ordered>(items: &[T], container: ContainerId) -> Vec<ItemId> {
    rank(items, container).into_iter().map(|i| i.id()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: u32, list_id: u32, order: i32) -> Card {
        let mut card = Card::new(list_id, format!("Card{}", id), None);
        card.id = id;
        card.order = order;
        card
    }

    #[test]
    fn test_rank_filters_and_sorts() {
        let cards = vec![card(1, 1, 2), card(2, 2, 0), card(3, 1, 0), card(4, 1, 1)];
        assert_eq!(ranked_ids(&cards, 1), vec![3, 4, 1]);
        assert_eq!(ranked_ids(&cards, 2), vec![2]);
        assert!(ranked_ids(&cards, 9).is_empty());
    }

    #[test]
    fn test_rank_keeps_array_position_on_duplicates() {
        let cards = vec![card(5, 1, 1), card(6, 1, 0), card(7, 1, 1)];
        assert_eq!(ranked_ids(&cards, 1), vec![6, 5, 7]);
    }

    #[test]
    fn test_card_patch_only_names_list_when_moved() {
        let same = Placement { id: 1, container: 4, order: 2, moved: false };
        let moved = Placement { moved: true, ..same };
        assert_eq!(Card::placement_patch(&same).list_id, None);
        assert_eq!(Card::placement_patch(&moved).list_id, Some(4));
        assert_eq!(Card::placement_patch(&moved).order, Some(2));
    }
}
