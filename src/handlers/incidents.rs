use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use super::validate_request;
use crate::auth::SessionManager;
use crate::domain::{query, IncidentService};
use crate::models::{
    Incident, IncidentDraft, IncidentFilter, IncidentStatus, IncidentType, Location, Severity,
};
use crate::{CivicAlertError, CivicResult};

/// Page size used when a caller asks for a page without saying how big
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Params for `civicalert/incident/create`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    #[validate(length(min = 10, max = 500, message = "Description must be 10-500 characters"))]
    #[validate(custom(function = "non_blank"))]
    pub description: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100, message = "Reporter name cannot exceed 100 characters"))]
    pub reporter_name: Option<String>,
}

impl CreateIncidentRequest {
    pub fn into_draft(self) -> IncidentDraft {
        let reporter_name = self
            .reporter_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        IncidentDraft::new(
            self.incident_type,
            self.description,
            Location::new(self.latitude, self.longitude),
            reporter_name,
        )
    }
}

/// Params for the public single-incident methods
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IncidentIdRequest {
    #[validate(length(min = 1, message = "Incident ID cannot be empty"))]
    pub id: String,
}

/// Params for staff methods that only need an id
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StaffIncidentRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,
    #[validate(length(min = 1, message = "Incident ID cannot be empty"))]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetStatusRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,
    #[validate(length(min = 1, message = "Incident ID cannot be empty"))]
    pub id: String,
    pub status: IncidentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetSeverityRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,
    #[validate(length(min = 1, message = "Incident ID cannot be empty"))]
    pub id: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddNoteRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,
    #[validate(length(min = 1, message = "Incident ID cannot be empty"))]
    pub id: String,
    #[validate(length(min = 1, max = 1000, message = "Note must be 1-1000 characters"))]
    #[validate(custom(function = "non_blank"))]
    pub note: String,
}

/// Params for `civicalert/incident/list`: filter fields plus optional paging
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListIncidentsRequest {
    #[serde(flatten)]
    pub filter: IncidentFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "Page numbers start at 1"))]
    pub page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIncidentsResponse {
    pub incidents: Vec<Incident>,
    /// Matches before paging
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

fn non_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut error = validator::ValidationError::new("blank");
        error.message = Some("Value cannot be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Handler for the `civicalert/incident/*` methods
pub struct IncidentHandler {
    service: Arc<IncidentService>,
    sessions: Arc<SessionManager>,
}

impl IncidentHandler {
    pub fn new(service: Arc<IncidentService>, sessions: Arc<SessionManager>) -> Self {
        Self { service, sessions }
    }

    pub async fn create(&self, request: CreateIncidentRequest) -> CivicResult<Incident> {
        validate_request(&request)?;
        self.service.create_incident(request.into_draft()).await
    }

    pub async fn confirm(&self, request: IncidentIdRequest) -> CivicResult<Incident> {
        validate_request(&request)?;
        self.service.confirm_incident(&request.id).await
    }

    /// Unknown ids surface as `IncidentNotFound` on the wire
    pub async fn get(&self, request: IncidentIdRequest) -> CivicResult<Incident> {
        validate_request(&request)?;
        self.service
            .get_incident(&request.id)
            .await?
            .ok_or_else(|| CivicAlertError::not_found(&request.id))
    }

    pub async fn list(&self, request: ListIncidentsRequest) -> CivicResult<ListIncidentsResponse> {
        validate_request(&request)?;

        let incidents = self.service.list_incidents(&request.filter).await?;
        let total = incidents.len();

        let response = match (request.page, request.page_size) {
            (None, None) => ListIncidentsResponse {
                incidents,
                total,
                page: 1,
                page_size: total,
            },
            (page, page_size) => {
                let page = page.unwrap_or(1);
                let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
                ListIncidentsResponse {
                    incidents: query::paginate(incidents, page, page_size),
                    total,
                    page,
                    page_size,
                }
            }
        };

        debug!(
            total = response.total,
            returned = response.incidents.len(),
            "Listed incidents"
        );
        Ok(response)
    }

    pub async fn set_status(&self, request: SetStatusRequest) -> CivicResult<Incident> {
        validate_request(&request)?;
        let actor = self.sessions.require_staff(&request.token).await?;
        info!(actor = %actor.username, incident_id = %request.id, status = %request.status, "Status change requested");
        self.service.set_status(&request.id, request.status).await
    }

    pub async fn set_severity(&self, request: SetSeverityRequest) -> CivicResult<Incident> {
        validate_request(&request)?;
        let actor = self.sessions.require_staff(&request.token).await?;
        info!(actor = %actor.username, incident_id = %request.id, severity = %request.severity, "Severity change requested");
        self.service.set_severity(&request.id, request.severity).await
    }

    pub async fn add_note(&self, request: AddNoteRequest) -> CivicResult<Incident> {
        validate_request(&request)?;
        let actor = self.sessions.require_staff(&request.token).await?;
        debug!(actor = %actor.username, incident_id = %request.id, "Note requested");
        self.service.add_note(&request.id, request.note.trim()).await
    }

    pub async fn mark_false_report(&self, request: StaffIncidentRequest) -> CivicResult<Incident> {
        validate_request(&request)?;
        let actor = self.sessions.require_staff(&request.token).await?;
        info!(actor = %actor.username, incident_id = %request.id, "False report flag requested");
        self.service.mark_false_report(&request.id).await
    }
}
