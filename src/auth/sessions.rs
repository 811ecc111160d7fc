use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::User;
use crate::{CivicAlertError, CivicResult};

/// An issued bearer token and the user it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub token: String,
    pub user: User,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory token store with a fixed time-to-live
pub struct SessionManager {
    sessions: RwLock<HashMap<String, AuthSession>>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn login(&self, user: User) -> CivicResult<AuthSession> {
        self.login_at(user, Utc::now()).await
    }

    pub async fn login_at(&self, user: User, now: DateTime<Utc>) -> CivicResult<AuthSession> {
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            CivicAlertError::configuration("session lifetime overflows the calendar")
        })?;
        let session = AuthSession {
            token: Uuid::new_v4().to_string(),
            user,
            issued_at: now,
            expires_at,
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, existing| !existing.is_expired(now));
        sessions.insert(session.token.clone(), session.clone());

        info!(
            username = %session.user.username,
            role = %session.user.role,
            "Staff session opened"
        );
        Ok(session)
    }

    /// Look up a live session. Unknown and expired tokens are both `Unauthorized`.
    pub async fn resolve(&self, token: &str) -> CivicResult<AuthSession> {
        self.resolve_at(token, Utc::now()).await
    }

    pub async fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> CivicResult<AuthSession> {
        let session = self.sessions.read().await.get(token).cloned();

        match session {
            Some(session) if !session.is_expired(now) => Ok(session),
            Some(_) => {
                self.sessions.write().await.remove(token);
                debug!("Rejected expired session token");
                Err(CivicAlertError::unauthorized("session expired"))
            }
            None => Err(CivicAlertError::unauthorized("unknown session token")),
        }
    }

    /// Resolve a token whose user may triage incidents
    pub async fn require_staff(&self, token: &str) -> CivicResult<User> {
        let session = self.resolve(token).await?;
        if session.user.role.is_staff() {
            Ok(session.user)
        } else {
            Err(CivicAlertError::unauthorized(format!(
                "role {} may not perform this operation",
                session.user.role
            )))
        }
    }

    /// Revoke a token; returns whether it was live
    pub async fn logout(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(token);
        if let Some(session) = &removed {
            info!(username = %session.user.username, "Staff session closed");
        }
        removed.is_some()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user(role: Role) -> User {
        User {
            id: "9".to_string(),
            username: format!("{}-user", role),
            role,
            name: "Test User".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_then_resolve() {
        let manager = SessionManager::new(Duration::minutes(30));
        let session = manager.login(user(Role::Admin)).await.unwrap();

        assert!(Uuid::parse_str(&session.token).is_ok());
        assert_eq!(session.expires_at - session.issued_at, Duration::minutes(30));

        let resolved = manager.resolve(&session.token).await.unwrap();
        assert_eq!(resolved.user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected_and_purged() {
        let manager = SessionManager::new(Duration::minutes(5));
        let issued = Utc::now() - Duration::minutes(10);
        let session = manager.login_at(user(Role::Responder), issued).await.unwrap();

        let result = manager.resolve_at(&session.token, Utc::now()).await;
        assert!(matches!(result, Err(CivicAlertError::Unauthorized { .. })));
        assert!(!manager.logout(&session.token).await);
    }

    #[tokio::test]
    async fn test_require_staff() {
        let manager = SessionManager::new(Duration::minutes(5));

        let responder = manager.login(user(Role::Responder)).await.unwrap();
        assert!(manager.require_staff(&responder.token).await.is_ok());

        let citizen = manager.login(user(Role::Citizen)).await.unwrap();
        assert!(matches!(
            manager.require_staff(&citizen.token).await,
            Err(CivicAlertError::Unauthorized { .. })
        ));

        assert!(manager.require_staff("not-a-token").await.is_err());
    }

    #[tokio::test]
    async fn test_logout_revokes() {
        let manager = SessionManager::new(Duration::minutes(5));
        let session = manager.login(user(Role::Admin)).await.unwrap();

        assert!(manager.logout(&session.token).await);
        assert!(!manager.logout(&session.token).await);
        assert!(manager.resolve(&session.token).await.is_err());
    }

    #[tokio::test]
    async fn test_expiry_past_calendar_end_is_an_error() {
        let manager = SessionManager::new(Duration::days(365));
        let result = manager.login_at(user(Role::Admin), DateTime::<Utc>::MAX_UTC).await;

        assert!(matches!(result, Err(CivicAlertError::Configuration { .. })));
    }
}
