//! CivicAlert incident service
//!
//! Citizen incident reporting with priority scoring, a small triage lifecycle
//! and dashboard aggregation. Served as JSON-RPC 2.0 over stdio or a Unix socket.

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod handlers;
pub mod jsonrpc;
pub mod models;
pub mod server;
pub mod store;

/// Application-wide error types with context preservation
#[derive(Debug, thiserror::Error)]
pub enum CivicAlertError {
    #[error("Incident not found: {0}")]
    IncidentNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Incident is locked: {0}")]
    IncidentLocked(String),

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl CivicAlertError {
    /// Create a not-found error for an incident id
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::IncidentNotFound(id.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a boundary validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Get error code for JSON-RPC responses
    pub fn error_code(&self) -> i32 {
        use crate::jsonrpc::protocol::error_codes;

        match self {
            CivicAlertError::IncidentNotFound(_) => error_codes::INCIDENT_NOT_FOUND,
            CivicAlertError::InvalidCredentials => error_codes::INVALID_CREDENTIALS,
            CivicAlertError::Unauthorized { .. } => error_codes::UNAUTHORIZED,
            CivicAlertError::IncidentLocked(_) => error_codes::INCIDENT_LOCKED,
            CivicAlertError::Validation { .. } => error_codes::INVALID_PARAMS,
            CivicAlertError::Configuration { .. } => error_codes::CONFIGURATION_ERROR,
            CivicAlertError::Transport { .. } => error_codes::TRANSPORT_ERROR,
            CivicAlertError::Internal(_) => error_codes::INTERNAL_ERROR,
            CivicAlertError::Io { .. } => error_codes::INTERNAL_ERROR,
            CivicAlertError::Serialization { .. } => error_codes::PARSE_ERROR,
        }
    }

    /// Incident id the error refers to, if any
    pub fn incident_id(&self) -> Option<&str> {
        match self {
            CivicAlertError::IncidentNotFound(id) | CivicAlertError::IncidentLocked(id) => {
                Some(id.as_str())
            }
            _ => None,
        }
    }

    /// Short machine-readable name used in JSON-RPC error data
    pub fn kind(&self) -> &'static str {
        match self {
            CivicAlertError::IncidentNotFound(_) => "not_found",
            CivicAlertError::InvalidCredentials => "invalid_credentials",
            CivicAlertError::Unauthorized { .. } => "unauthorized",
            CivicAlertError::IncidentLocked(_) => "incident_locked",
            CivicAlertError::Validation { .. } => "validation",
            CivicAlertError::Configuration { .. } => "configuration",
            CivicAlertError::Transport { .. } => "transport",
            CivicAlertError::Internal(_) => "internal",
            CivicAlertError::Io { .. } => "io",
            CivicAlertError::Serialization { .. } => "serialization",
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CivicAlertError::IncidentNotFound(id) => format!("Incident not found: {}", id),
            CivicAlertError::InvalidCredentials => "Invalid username or password".to_string(),
            CivicAlertError::Unauthorized { message } => {
                format!("Not authorized: {}", message)
            }
            CivicAlertError::IncidentLocked(id) => {
                format!(
                    "Incident {} was marked as a false report and can no longer change status or severity",
                    id
                )
            }
            CivicAlertError::Validation { message } => format!("Invalid input: {}", message),
            CivicAlertError::Configuration { message } => {
                format!("Configuration issue: {}", message)
            }
            CivicAlertError::Transport { message } => {
                format!("Communication error: {}", message)
            }
            CivicAlertError::Internal(message) => format!("Internal error: {}", message),
            CivicAlertError::Io { source } => format!("File system error: {}", source),
            CivicAlertError::Serialization { source } => {
                format!("Data format error: {}", source)
            }
        }
    }
}

/// Convenience type alias for Results
pub type CivicResult<T> = Result<T, CivicAlertError>;
