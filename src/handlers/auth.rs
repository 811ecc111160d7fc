use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use validator::Validate;

use super::validate_request;
use crate::auth::{CredentialTable, SessionManager};
use crate::models::User;
use crate::{CivicAlertError, CivicResult};

/// Params for `civicalert/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

/// Params for `civicalert/auth/logout`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogoutRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    /// False when the token was unknown or already expired
    pub logged_out: bool,
}

pub struct AuthHandler {
    credentials: Arc<CredentialTable>,
    sessions: Arc<SessionManager>,
}

impl AuthHandler {
    pub fn new(credentials: Arc<CredentialTable>, sessions: Arc<SessionManager>) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> CivicResult<LoginResponse> {
        validate_request(&request)?;

        let user = match self
            .credentials
            .authenticate(&request.username, &request.password)
        {
            Ok(user) => user,
            Err(e @ CivicAlertError::InvalidCredentials) => {
                warn!(username = %request.username, "Rejected login");
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        let session = self.sessions.login(user).await?;
        Ok(LoginResponse {
            token: session.token,
            user: session.user,
            expires_at: session.expires_at,
        })
    }

    pub async fn logout(&self, request: LogoutRequest) -> CivicResult<LogoutResponse> {
        validate_request(&request)?;
        Ok(LogoutResponse {
            logged_out: self.sessions.logout(&request.token).await,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Duration;

    fn handler() -> AuthHandler {
        AuthHandler::new(
            Arc::new(CredentialTable::default()),
            Arc::new(SessionManager::new(Duration::minutes(60))),
        )
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let handler = handler();
        let response = handler.login(login("admin", "admin@123")).await.unwrap();

        assert_eq!(response.user.role, Role::Admin);
        assert!(response.expires_at > Utc::now());

        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("expiresAt").is_some());
        assert!(value["user"].get("password").is_none());

        let out = handler
            .logout(LogoutRequest {
                token: response.token.clone(),
            })
            .await
            .unwrap();
        assert!(out.logged_out);

        let again = handler
            .logout(LogoutRequest {
                token: response.token,
            })
            .await
            .unwrap();
        assert!(!again.logged_out);
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let handler = handler();
        assert!(matches!(
            handler.login(login("responder", "admin@123")).await,
            Err(CivicAlertError::InvalidCredentials)
        ));
        assert!(matches!(
            handler.login(login("", "resp@123")).await,
            Err(CivicAlertError::Validation { .. })
        ));
    }
}
