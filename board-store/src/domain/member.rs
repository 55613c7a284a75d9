//! Member Entity
//!
//! Local cache of a user known to the identity provider, scoped to a
//! company. Keyed by the provider's user id rather than a store sequence.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::filter::FieldValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Identity provider user id
    pub id: String,
    pub company_id: String,
    pub username: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    /// Last time the user was seen (unix millis)
    pub last_seen: i64,
}

impl Member {
    pub fn new(id: String, company_id: String, username: String) -> Self {
        Self {
            id,
            company_id,
            username,
            name: None,
            avatar: None,
            last_seen: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Real name when known, otherwise `@username`
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("@{}", self.username),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberPatch {
    pub username: Option<String>,
    pub name: Option<Option<String>>,
    pub avatar: Option<Option<String>>,
    pub last_seen: Option<i64>,
}

impl Entity for Member {
    type Id = String;
    type Patch = MemberPatch;

    const KIND: &'static str = "Member";

    fn id(&self) -> Self::Id {
        self.id.clone()
    }

    fn field(&self, column: &str) -> Option<FieldValue> {
        match column {
            "id" => Some(self.id.clone().into()),
            "company_id" => Some(self.company_id.clone().into()),
            "username" => Some(self.username.clone().into()),
            "last_seen" => Some(self.last_seen.into()),
            _ => None,
        }
    }

    fn apply_patch(&mut self, patch: &MemberPatch) {
        if let Some(username) = &patch.username {
            self.username = username.clone();
        }
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(avatar) = &patch.avatar {
            self.avatar = avatar.clone();
        }
        if let Some(last_seen) = patch.last_seen {
            self.last_seen = last_seen;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut member = Member::new("user_1".to_string(), "biz_1".to_string(), "ada".to_string());
        assert_eq!(member.display_name(), "@ada");
        member.name = Some("Ada Lovelace".to_string());
        assert_eq!(member.display_name(), "Ada Lovelace");
    }
}
