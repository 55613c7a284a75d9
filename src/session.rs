//! Identity Session
//!
//! The identity provider hands over a user id, username, display name and a
//! coarse access level. The level maps to a role that decides which actions
//! the UI offers; the reorder core does not check it.

use serde::{Deserialize, Serialize};

use board_store::Member;

/// Access level as reported by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Admin,
    Customer,
    NoAccess,
}

impl AccessLevel {
    pub fn from_provider(level: &str) -> Self {
        match level {
            "admin" => AccessLevel::Admin,
            "customer" => AccessLevel::Customer,
            _ => AccessLevel::NoAccess,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Member,
}

impl From<AccessLevel> for Role {
    fn from(level: AccessLevel) -> Self {
        match level {
            AccessLevel::Admin => Role::Admin,
            _ => Role::Member,
        }
    }
}

/// Which dashboard is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Admin,
    #[default]
    Member,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    /// Tenant the user is acting in
    pub company_id: String,
    pub access_level: AccessLevel,
}

impl Session {
    pub fn role(&self) -> Role {
        self.access_level.into()
    }

    pub fn has_access(&self) -> bool {
        self.access_level != AccessLevel::NoAccess
    }

    pub fn can_view_analytics(&self) -> bool {
        self.role() == Role::Admin
    }

    /// Views this session may switch to
    pub fn allows(&self, mode: ViewMode) -> bool {
        match mode {
            ViewMode::Admin => self.role() == Role::Admin,
            ViewMode::Member => self.has_access(),
        }
    }

    /// Member cache row for this user, stamped now
    pub fn member_record(&self) -> Member {
        let mut member = Member::new(
            self.user_id.clone(),
            self.company_id.clone(),
            self.username.clone(),
        );
        member.name = self.display_name.clone();
        member.avatar = self.avatar.clone();
        member
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(level: &str) -> Session {
        Session {
            user_id: "user_1".to_string(),
            username: "ada".to_string(),
            display_name: Some("Ada".to_string()),
            avatar: None,
            company_id: "biz_1".to_string(),
            access_level: AccessLevel::from_provider(level),
        }
    }

    #[test]
    fn test_access_level_maps_to_role() {
        assert_eq!(session("admin").role(), Role::Admin);
        assert_eq!(session("customer").role(), Role::Member);
        assert_eq!(session("no_access").role(), Role::Member);
        assert_eq!(session("something-new").access_level, AccessLevel::NoAccess);
    }

    #[test]
    fn test_view_permissions() {
        assert!(session("admin").allows(ViewMode::Admin));
        assert!(!session("customer").allows(ViewMode::Admin));
        assert!(session("customer").allows(ViewMode::Member));
        assert!(!session("no_access").allows(ViewMode::Member));
    }

    #[test]
    fn test_member_record_carries_profile() {
        let member = session("customer").member_record();
        assert_eq!(member.id, "user_1");
        assert_eq!(member.company_id, "biz_1");
        assert_eq!(member.display_name(), "Ada");
    }
}
