use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::incident::{Incident, IncidentStatus, IncidentType, Severity};

/// Narrowing criteria for incident listings. Every field is optional; an
/// empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentFilter {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<IncidentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Inclusive lower bound on `createdAt`. A bare `YYYY-MM-DD` starts at
    /// midnight UTC.
    #[serde(
        default,
        deserialize_with = "date_bound::start_of_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `createdAt`. A bare `YYYY-MM-DD` covers the
    /// whole UTC day.
    #[serde(
        default,
        deserialize_with = "date_bound::end_of_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<DateTime<Utc>>,
    /// Case-insensitive substring over id and description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Date-range bounds given either as RFC 3339 timestamps or calendar dates
mod date_bound {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn start_of_day<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        parse(deserializer, |date| date.and_hms_opt(0, 0, 0))
    }

    pub fn end_of_day<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        parse(deserializer, |date| date.and_hms_nano_opt(23, 59, 59, 999_999_999))
    }

    fn parse<'de, D>(
        deserializer: D,
        at: fn(NaiveDate) -> Option<NaiveDateTime>,
    ) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match Option::<String>::deserialize(deserializer)? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(timestamp.with_timezone(&Utc)));
        }

        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .ok()
            .and_then(at)
            .map(|naive| Some(Utc.from_utc_datetime(&naive)))
            .ok_or_else(|| D::Error::custom("expected an RFC 3339 timestamp or a YYYY-MM-DD date"))
    }
}

impl IncidentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, incident_type: IncidentType) -> Self {
        self.incident_type = Some(incident_type);
        self
    }

    pub fn with_status(mut self, status: IncidentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn created_between(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Exact-match structured criteria (type, status, severity, date range).
    pub fn matches_structured(&self, incident: &Incident) -> bool {
        if self.incident_type.is_some_and(|t| t != incident.incident_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != incident.status) {
            return false;
        }
        if self.severity.is_some_and(|s| s != incident.severity) {
            return false;
        }
        if self.start_date.is_some_and(|start| incident.created_at < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| incident.created_at > end) {
            return false;
        }
        true
    }

    /// Free-text criterion. A blank search term matches everything.
    pub fn matches_search(&self, incident: &Incident) -> bool {
        let needle = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => term.to_lowercase(),
            _ => return true,
        };

        incident.id.to_lowercase().contains(&needle)
            || incident.description.to_lowercase().contains(&needle)
    }
}
