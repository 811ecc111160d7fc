use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::scoring;

/// Category of a reported incident. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentType {
    Accident,
    Medical,
    Fire,
    Infrastructure,
    Safety,
}

impl IncidentType {
    pub const ALL: [IncidentType; 5] = [
        IncidentType::Accident,
        IncidentType::Medical,
        IncidentType::Fire,
        IncidentType::Infrastructure,
        IncidentType::Safety,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::Accident => "accident",
            IncidentType::Medical => "medical",
            IncidentType::Fire => "fire",
            IncidentType::Infrastructure => "infrastructure",
            IncidentType::Safety => "safety",
        }
    }
}

impl std::fmt::Display for IncidentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage status. Starts at `Unverified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncidentStatus {
    Unverified,
    Verified,
    InProgress,
    Resolved,
}

impl IncidentStatus {
    pub const ALL: [IncidentStatus; 4] = [
        IncidentStatus::Unverified,
        IncidentStatus::Verified,
        IncidentStatus::InProgress,
        IncidentStatus::Resolved,
    ];

    /// Unverified, verified and in-progress incidents still need attention.
    pub fn is_active(&self) -> bool {
        !matches!(self, IncidentStatus::Resolved)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Unverified => "unverified",
            IncidentStatus::Verified => "verified",
            IncidentStatus::InProgress => "in-progress",
            IncidentStatus::Resolved => "resolved",
        }
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn is_high(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Medium
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WGS84 coordinates of the reported incident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A reported incident.
///
/// `priority_score` is derived from type, severity and confirmations and is
/// only ever written through [`Incident::refresh_score`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub description: String,
    #[serde(flatten)]
    pub location: Location,
    pub status: IncidentStatus,
    pub severity: Severity,
    pub confirmations: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
    pub priority_score: f64,
    #[serde(default)]
    pub is_false_report: bool,
}

impl Incident {
    /// Recompute the derived priority score from the current fields.
    pub fn refresh_score(&mut self) {
        self.priority_score =
            scoring::score(self.incident_type, self.severity, self.confirmations);
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    pub fn notes(&self) -> &[String] {
        self.notes.as_deref().unwrap_or(&[])
    }
}

impl std::fmt::Display for Incident {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}/{}] {} (score {:.1})",
            self.id, self.incident_type, self.severity, self.status, self.priority_score
        )
    }
}

/// A citizen submission before the store assigns it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentDraft {
    pub incident_type: IncidentType,
    pub description: String,
    pub location: Location,
    pub reporter_name: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl IncidentDraft {
    pub fn new(
        incident_type: IncidentType,
        description: impl Into<String>,
        location: Location,
        reporter_name: Option<String>,
    ) -> Self {
        Self {
            incident_type,
            description: description.into(),
            location,
            reporter_name,
            submitted_at: Utc::now(),
        }
    }

    /// Materialise the draft with the initial lifecycle state.
    pub fn into_incident(self, id: String) -> Incident {
        let mut incident = Incident {
            id,
            incident_type: self.incident_type,
            description: self.description,
            location: self.location,
            status: IncidentStatus::Unverified,
            severity: Severity::Medium,
            confirmations: 1,
            created_at: self.submitted_at,
            updated_at: self.submitted_at,
            reporter_name: self.reporter_name,
            notes: None,
            priority_score: 0.0,
            is_false_report: false,
        };
        incident.refresh_score();
        incident
    }
}

/// Format a store sequence number as a public incident id.
pub fn format_incident_id(sequence: u64) -> String {
    format!("INC-{:06}", sequence)
}

/// Parse the sequence number back out of an `INC-` id.
pub fn parse_incident_sequence(id: &str) -> Option<u64> {
    id.strip_prefix("INC-")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(incident_type: IncidentType) -> IncidentDraft {
        IncidentDraft::new(
            incident_type,
            "Smoke coming out of a warehouse",
            Location::new(37.77, -122.41),
            Some("Dana".to_string()),
        )
    }

    #[test]
    fn test_draft_initial_state() {
        let incident = draft(IncidentType::Fire).into_incident(format_incident_id(7));

        assert_eq!(incident.id, "INC-000007");
        assert_eq!(incident.status, IncidentStatus::Unverified);
        assert_eq!(incident.severity, Severity::Medium);
        assert_eq!(incident.confirmations, 1);
        assert_eq!(incident.priority_score, 10.5);
        assert_eq!(incident.created_at, incident.updated_at);
        assert!(!incident.is_false_report);
        assert!(incident.notes().is_empty());
    }

    #[test]
    fn test_incident_json_shape() {
        let incident = draft(IncidentType::Medical).into_incident(format_incident_id(1));
        let value = serde_json::to_value(&incident).unwrap();

        assert_eq!(value["type"], "medical");
        assert_eq!(value["status"], "unverified");
        assert_eq!(value["latitude"], 37.77);
        assert_eq!(value["reporterName"], "Dana");
        assert_eq!(value["isFalseReport"], false);
        assert!(value.get("notes").is_none());
        assert!(value.get("priorityScore").is_some());
    }

    #[test]
    fn test_status_serialization() {
        let serialized = serde_json::to_string(&IncidentStatus::InProgress).unwrap();
        assert_eq!(serialized, "\"in-progress\"");

        let parsed: IncidentStatus = serde_json::from_str("\"resolved\"").unwrap();
        assert_eq!(parsed, IncidentStatus::Resolved);
        assert!(!parsed.is_active());
    }

    #[test]
    fn test_location_bounds() {
        assert!(Location::new(90.0, -180.0).is_valid());
        assert!(!Location::new(90.5, 0.0).is_valid());
        assert!(!Location::new(0.0, 181.0).is_valid());
    }

    #[test]
    fn test_incident_id_roundtrip() {
        assert_eq!(parse_incident_sequence(&format_incident_id(123)), Some(123));
        assert_eq!(parse_incident_sequence("CASE-1"), None);
    }

    #[test]
    fn test_incident_display() {
        let incident = draft(IncidentType::Fire).into_incident(format_incident_id(3));
        assert_eq!(
            incident.to_string(),
            "INC-000003 [fire/medium] unverified (score 10.5)"
        );
    }
}
