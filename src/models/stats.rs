use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::incident::{IncidentType, Severity};

/// One day of the dashboard trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Display label, e.g. "Mon, Oct 19"
    pub date: String,
    /// Calendar day (UTC) the count refers to
    pub day: NaiveDate,
    pub count: usize,
}

/// Dashboard summary computed fresh from the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_incidents: usize,
    pub active_incidents: usize,
    pub high_severity_alerts: usize,
    pub resolved_incidents: usize,
    pub incidents_by_type: BTreeMap<IncidentType, usize>,
    pub incidents_trend: Vec<TrendPoint>,
    pub severity_distribution: BTreeMap<Severity, usize>,
}
