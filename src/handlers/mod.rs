//! Request handlers: typed params, boundary validation and staff gating in
//! front of the incident service.

pub mod auth;
pub mod dashboard;
pub mod incidents;

use std::sync::Arc;
use validator::{Validate, ValidationErrors};

use crate::auth::{CredentialTable, SessionManager};
use crate::domain::IncidentService;
use crate::{CivicAlertError, CivicResult};

pub use auth::{AuthHandler, LoginRequest, LoginResponse, LogoutRequest, LogoutResponse};
pub use dashboard::{DashboardHandler, StatsRequest};
pub use incidents::{
    AddNoteRequest, CreateIncidentRequest, IncidentHandler, IncidentIdRequest,
    ListIncidentsRequest, ListIncidentsResponse, SetSeverityRequest, SetStatusRequest,
    StaffIncidentRequest,
};

/// Shared state every handler is built from
#[derive(Clone)]
pub struct HandlerContext {
    pub incidents: Arc<IncidentService>,
    pub sessions: Arc<SessionManager>,
    pub credentials: Arc<CredentialTable>,
}

impl HandlerContext {
    pub fn incident_handler(&self) -> IncidentHandler {
        IncidentHandler::new(self.incidents.clone(), self.sessions.clone())
    }

    pub fn auth_handler(&self) -> AuthHandler {
        AuthHandler::new(self.credentials.clone(), self.sessions.clone())
    }

    pub fn dashboard_handler(&self) -> DashboardHandler {
        DashboardHandler::new(self.incidents.clone(), self.sessions.clone())
    }
}

/// Run derive-based validation and flatten the failures into one message
pub fn validate_request<T: Validate>(request: &T) -> CivicResult<()> {
    request
        .validate()
        .map_err(|errors| CivicAlertError::validation(describe_errors(&errors)))
}

fn describe_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "Field '{}': {}",
                    field,
                    error
                        .message
                        .as_ref()
                        .map(|m| m.as_ref())
                        .unwrap_or("validation error")
                )
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
