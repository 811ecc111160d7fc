use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Responder,
    Citizen,
}

impl Role {
    /// Admins and responders may triage incidents and read the dashboard.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Responder)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Responder => write!(f, "responder"),
            Role::Citizen => write!(f, "citizen"),
        }
    }
}

/// An authenticated principal. Never carries a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub name: String,
}
