//! Subtask Entity
//!
//! Checklist entry under a card.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, APPEND};
use super::filter::FieldValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: u32,
    /// Parent card
    pub card_id: u32,
    pub title: String,
    pub completed: bool,
    /// Rank among the card's subtasks
    pub order: i32,
}

impl Subtask {
    pub fn new(card_id: u32, title: String) -> Self {
        Self {
            id: 0,
            card_id,
            title,
            completed: false,
            order: APPEND,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub order: Option<i32>,
}

impl Entity for Subtask {
    type Id = u32;
    type Patch = SubtaskPatch;

    const KIND: &'static str = "Subtask";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn assign_id(&mut self, seq: u32) {
        self.id = seq;
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "id" => Some(self.id.into()),
            "card_id" => Some(self.card_id.into()),
            "title" => Some(self.title.clone().into()),
            "completed" => Some(self.completed.into()),
            "order" => Some(self.order.into()),
            _ => None,
        }
    }

    fn apply_patch(&mut self, patch: &SubtaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }

    fn sibling_rank(&self) -> Option<(u32, i32)> {
        Some((self.card_id, self.order))
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}
