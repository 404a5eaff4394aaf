use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder user id for sessions that have not authenticated yet.
/// Layouts for this identity are never persisted.
pub const GUEST_USER_ID: &str = "guest";

/// District hierarchy roles, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Ceo,
    Deo,
    Ddeo,
    Aeo,
    HeadTeacher,
    Teacher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Ceo => "ceo",
            Role::Deo => "deo",
            Role::Ddeo => "ddeo",
            Role::Aeo => "aeo",
            Role::HeadTeacher => "head_teacher",
            Role::Teacher => "teacher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ceo" => Ok(Role::Ceo),
            "deo" => Ok(Role::Deo),
            "ddeo" => Ok(Role::Ddeo),
            "aeo" => Ok(Role::Aeo),
            "head_teacher" => Ok(Role::HeadTeacher),
            "teacher" => Ok(Role::Teacher),
            _ => Err(()),
        }
    }
}

/// The (userId, role) pair every layout is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn guest() -> Self {
        Self::new(GUEST_USER_ID, Role::Teacher)
    }

    pub fn is_guest(&self) -> bool {
        self.user_id == GUEST_USER_ID
    }

    /// Key the layout is stored under for this identity.
    pub fn storage_key(&self) -> String {
        format!("dashboard_layout_{}_{}", self.user_id, self.role)
    }
}
