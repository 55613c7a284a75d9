//! Board Entity
//!
//! Top-level container owned by a tenant (company). Lists hang off a board.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::filter::FieldValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Unique identifier
    pub id: u32,
    /// Owning tenant
    pub company_id: String,
    pub title: String,
    /// Creating user, if known
    pub created_by: Option<String>,
    /// Member user ids
    #[serde(default)]
    pub members: Vec<String>,
    /// Creation time (unix millis)
    pub created_at: i64,
    /// Number of cards across the board's lists. Derived, never written.
    #[serde(default)]
    pub task_count: u32,
}

impl Board {
    /// Create a board; the creator, if any, becomes the first member
    pub fn new(company_id: String, title: String, created_by: Option<String>) -> Self {
        Self {
            id: 0,
            company_id,
            title,
            members: created_by.iter().cloned().collect(),
            created_by,
            created_at: chrono::Utc::now().timestamp_millis(),
            task_count: 0,
        }
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardPatch {
    pub title: Option<String>,
    pub members: Option<Vec<String>>,
}

impl Entity for Board {
    type Id = u32;
    type Patch = BoardPatch;

    const KIND: &'static str = "Board";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn assign_id(&mut self, seq: u32) {
        self.id = seq;
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "id" => Some(self.id.into()),
            "company_id" => Some(self.company_id.clone().into()),
            "title" => Some(self.title.clone().into()),
            "created_by" => Some(self.created_by.clone().into()),
            "created_at" => Some(self.created_at.into()),
            _ => None,
        }
    }

    fn apply_patch(&mut self, patch: &BoardPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(members) = &patch.members {
            self.members = members.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_becomes_member() {
        let board = Board::new("biz_1".to_string(), "Launch".to_string(), Some("user_a".to_string()));
        assert!(board.is_member("user_a"));
        assert_eq!(board.members.len(), 1);

        let anonymous = Board::new("biz_1".to_string(), "Ops".to_string(), None);
        assert!(anonymous.members.is_empty());
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut board = Board::new("biz_1".to_string(), "Launch".to_string(), Some("user_a".to_string()));
        board.apply_patch(&BoardPatch { title: Some("Relaunch".to_string()), members: None });
        assert_eq!(board.title, "Relaunch");
        assert_eq!(board.members, vec!["user_a".to_string()]);
    }
}
