use crate::models::{Role, User};
use crate::{CivicAlertError, CivicResult};

struct Credential {
    password: String,
    user: User,
}

/// Fixed username/password table for staff accounts
pub struct CredentialTable {
    entries: Vec<Credential>,
}

impl CredentialTable {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_user(mut self, user: User, password: impl Into<String>) -> Self {
        self.entries.retain(|entry| entry.user.username != user.username);
        self.entries.push(Credential {
            password: password.into(),
            user,
        });
        self
    }

    /// Both a wrong password and an unknown username yield `InvalidCredentials`
    pub fn authenticate(&self, username: &str, password: &str) -> CivicResult<User> {
        self.entries
            .iter()
            .find(|entry| entry.user.username == username && entry.password == password)
            .map(|entry| entry.user.clone())
            .ok_or(CivicAlertError::InvalidCredentials)
    }
}

impl Default for CredentialTable {
    fn default() -> Self {
        Self::empty()
            .with_user(
                User {
                    id: "1".to_string(),
                    username: "admin".to_string(),
                    role: Role::Admin,
                    name: "System Administrator".to_string(),
                },
                "admin@123",
            )
            .with_user(
                User {
                    id: "2".to_string(),
                    username: "responder".to_string(),
                    role: Role::Responder,
                    name: "First Responder".to_string(),
                },
                "resp@123",
            )
    }
}

impl std::fmt::Debug for CredentialTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| &entry.user.username))
            .finish()
    }
}
