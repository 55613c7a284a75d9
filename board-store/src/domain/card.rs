//! Card Entity
//!
//! A task on a list. Cards move between lists, which changes both
//! `list_id` and `order`.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, APPEND};
use super::filter::FieldValue;

/// Workflow state of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not_started",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "in_progress" => TaskStatus::InProgress,
            "done" => TaskStatus::Done,
            _ => TaskStatus::NotStarted,
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: u32,
    /// Parent list
    pub list_id: u32,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    /// Assigned user ids
    #[serde(default)]
    pub assigned_to: Vec<String>,
    pub created_by: Option<String>,
    /// Creation time (unix millis)
    pub created_at: i64,
    /// Rank among the list's cards
    pub order: i32,
}

impl Card {
    /// New card appended to the end of `list_id`
    pub fn new(list_id: u32, title: String, created_by: Option<String>) -> Self {
        Self {
            id: 0,
            list_id,
            title,
            description: None,
            status: TaskStatus::NotStarted,
            assigned_to: Vec::new(),
            created_by,
            created_at: chrono::Utc::now().timestamp_millis(),
            order: APPEND,
        }
    }

    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.assigned_to.iter().any(|u| u == user_id)
    }
}

/// Partial card update. `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardPatch {
    pub list_id: Option<u32>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Vec<String>>,
    pub order: Option<i32>,
}

impl Entity for Card {
    type Id = u32;
    type Patch = CardPatch;

    const KIND: &'static str = "Card";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn assign_id(&mut self, seq: u32) {
        self.id = seq;
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "id" => Some(self.id.into()),
            "list_id" => Some(self.list_id.into()),
            "title" => Some(self.title.clone().into()),
            "status" => Some(self.status.as_str().into()),
            "created_by" => Some(self.created_by.clone().into()),
            "created_at" => Some(self.created_at.into()),
            "order" => Some(self.order.into()),
            _ => None,
        }
    }

    fn apply_patch(&mut self, patch: &CardPatch) {
        if let Some(list_id) = patch.list_id {
            self.list_id = list_id;
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(assigned_to) = &patch.assigned_to {
            self.assigned_to = assigned_to.clone();
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }

    fn sibling_rank(&self) -> Option<(u32, i32)> {
        Some((self.list_id, self.order))
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_and_fallback() {
        assert_eq!(TaskStatus::from_str(TaskStatus::InProgress.as_str()), TaskStatus::InProgress);
        assert_eq!(TaskStatus::from_str("garbage"), TaskStatus::NotStarted);
        assert_eq!(TaskStatus::Done.label(), "Done");
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&TaskStatus::NotStarted).unwrap();
        assert_eq!(json, "\"not_started\"");
    }

    #[test]
    fn test_patch_moves_card() {
        let mut card = Card::new(1, "Ship".to_string(), None);
        card.description = Some("details".to_string());
        card.apply_patch(&CardPatch {
            list_id: Some(2),
            order: Some(0),
            description: Some(None),
            ..Default::default()
        });
        assert_eq!(card.list_id, 2);
        assert_eq!(card.order, 0);
        assert_eq!(card.description, None);
        assert_eq!(card.title, "Ship");
    }
}
