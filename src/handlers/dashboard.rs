use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use super::validate_request;
use crate::auth::SessionManager;
use crate::domain::IncidentService;
use crate::models::DashboardStats;
use crate::CivicResult;

/// Params for `civicalert/stats`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StatsRequest {
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,
}

/// Staff-only dashboard aggregation
pub struct DashboardHandler {
    service: Arc<IncidentService>,
    sessions: Arc<SessionManager>,
}

impl DashboardHandler {
    pub fn new(service: Arc<IncidentService>, sessions: Arc<SessionManager>) -> Self {
        Self { service, sessions }
    }

    pub async fn stats(&self, request: StatsRequest) -> CivicResult<DashboardStats> {
        validate_request(&request)?;
        self.sessions.require_staff(&request.token).await?;
        self.service.stats().await
    }
}
