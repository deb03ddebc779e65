//! Session identity: a self-declared email and role, never verified.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Closed set of dashboard roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Program manager overseeing every project.
    Manager,
    /// Team leader for one project team.
    Leader,
    /// Regular team member.
    Team,
}

impl Role {
    /// Parses a role name case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "manager" => Some(Self::Manager),
            "leader" => Some(Self::Leader),
            "team" => Some(Self::Team),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Leader => "leader",
            Self::Team => "team",
        }
    }

    /// Managers and leaders create, edit and delete tasks.
    pub fn can_manage_tasks(self) -> bool {
        matches!(self, Self::Manager | Self::Leader)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity of whoever is using the dashboard right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub email: String,
    pub role: Role,
}

impl SessionIdentity {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Role, SessionIdentity};

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(Role::parse(" Manager "), Some(Role::Manager));
        assert_eq!(Role::parse("TEAM"), Some(Role::Team));
        assert_eq!(Role::parse("admin"), None);
    }

    #[test]
    fn only_manager_and_leader_manage_tasks() {
        assert!(Role::Manager.can_manage_tasks());
        assert!(Role::Leader.can_manage_tasks());
        assert!(!Role::Team.can_manage_tasks());
    }

    #[test]
    fn identity_serializes_as_email_and_lowercase_role() {
        let identity = SessionIdentity::new("bob@x.com", Role::Team);
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json, serde_json::json!({"email": "bob@x.com", "role": "team"}));
    }
}
