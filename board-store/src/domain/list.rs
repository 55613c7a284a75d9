//! List Entity
//!
//! A column of cards, ranked among the lists of its board.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, APPEND};
use super::filter::FieldValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: u32,
    /// Parent board
    pub board_id: u32,
    pub title: String,
    /// Rank among the board's lists
    pub order: i32,
}

impl List {
    /// New list appended after the board's existing lists
    pub fn new(board_id: u32, title: String) -> Self {
        Self {
            id: 0,
            board_id,
            title,
            order: APPEND,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPatch {
    pub title: Option<String>,
    pub order: Option<i32>,
}

impl Entity for List {
    type Id = u32;
    type Patch = ListPatch;

    const KIND: &'static str = "List";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn assign_id(&mut self, seq: u32) {
        self.id = seq;
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "id" => Some(self.id.into()),
            "board_id" => Some(self.board_id.into()),
            "title" => Some(self.title.clone().into()),
            "order" => Some(self.order.into()),
            _ => None,
        }
    }

    fn apply_patch(&mut self, patch: &ListPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }

    fn sibling_rank(&self) -> Option<(u32, i32)> {
        Some((self.board_id, self.order))
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}
