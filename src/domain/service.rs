//! Incident service: the operations exposed to handlers.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use super::{aggregation, lifecycle, query};
use crate::log_event;
use crate::models::{
    DashboardStats, Incident, IncidentDraft, IncidentFilter, IncidentStatus, Severity,
};
use crate::store::IncidentRepository;
use crate::CivicResult;

/// Coordinates scoring and lifecycle rules over an injected repository.
pub struct IncidentService {
    repository: Arc<dyn IncidentRepository>,
}

impl IncidentService {
    pub fn new(repository: Arc<dyn IncidentRepository>) -> Self {
        Self { repository }
    }

    /// Store a citizen report. Status, severity, confirmations and score
    /// start at their initial values.
    pub async fn create_incident(&self, draft: IncidentDraft) -> CivicResult<Incident> {
        let incident = self.repository.insert(draft).await?;
        log_event!(
            incident = incident.id.as_str(),
            info,
            incident_type = %incident.incident_type,
            priority_score = incident.priority_score,
            "Incident reported"
        );
        Ok(incident)
    }

    pub async fn confirm_incident(&self, id: &str) -> CivicResult<Incident> {
        let incident = self
            .repository
            .update(
                id,
                Box::new(|incident| {
                    lifecycle::confirm(incident, Utc::now());
                    Ok(())
                }),
            )
            .await?;

        log_event!(
            incident = id,
            debug,
            confirmations = incident.confirmations,
            status = %incident.status,
            "Incident confirmed"
        );
        Ok(incident)
    }

    pub async fn set_status(&self, id: &str, status: IncidentStatus) -> CivicResult<Incident> {
        let incident = self
            .repository
            .update(
                id,
                Box::new(move |incident| lifecycle::set_status(incident, status, Utc::now())),
            )
            .await?;

        log_event!(incident = id, info, status = %status, "Incident status changed");
        Ok(incident)
    }

    pub async fn set_severity(&self, id: &str, severity: Severity) -> CivicResult<Incident> {
        let incident = self
            .repository
            .update(
                id,
                Box::new(move |incident| lifecycle::set_severity(incident, severity, Utc::now())),
            )
            .await?;

        log_event!(
            incident = id,
            info,
            severity = %severity,
            priority_score = incident.priority_score,
            "Incident severity changed"
        );
        Ok(incident)
    }

    pub async fn add_note(&self, id: &str, text: &str) -> CivicResult<Incident> {
        let text = text.to_string();
        let incident = self
            .repository
            .update(
                id,
                Box::new(move |incident| {
                    lifecycle::add_note(incident, &text, Utc::now());
                    Ok(())
                }),
            )
            .await?;

        log_event!(incident = id, debug, notes = incident.notes().len(), "Note added");
        Ok(incident)
    }

    pub async fn mark_false_report(&self, id: &str) -> CivicResult<Incident> {
        let incident = self
            .repository
            .update(
                id,
                Box::new(|incident| {
                    if !lifecycle::mark_false_report(incident, Utc::now()) {
                        debug!(incident_id = %incident.id, "Already marked as false report");
                    }
                    Ok(())
                }),
            )
            .await?;

        log_event!(incident = id, info, "Incident marked as false report");
        Ok(incident)
    }

    /// Filtered listing ordered by descending priority.
    pub async fn list_incidents(&self, filter: &IncidentFilter) -> CivicResult<Vec<Incident>> {
        let snapshot = self.repository.snapshot().await?;
        Ok(query::list(snapshot, filter))
    }

    /// Absence is a valid answer, not an error.
    pub async fn get_incident(&self, id: &str) -> CivicResult<Option<Incident>> {
        self.repository.get(id).await
    }

    pub async fn stats(&self) -> CivicResult<DashboardStats> {
        let snapshot = self.repository.snapshot().await?;
        let stats = aggregation::dashboard_stats(&snapshot, Utc::now().date_naive());
        info!(
            total = stats.total_incidents,
            active = stats.active_incidents,
            "Computed dashboard stats"
        );
        Ok(stats)
    }
}
