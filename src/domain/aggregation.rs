//! Dashboard statistics.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

use crate::models::{DashboardStats, Incident, IncidentType, Severity, TrendPoint};

/// Number of calendar days in the trend series, ending today.
pub const TREND_DAYS: i64 = 7;

/// Compute a full snapshot. Nothing is cached between calls.
pub fn dashboard_stats(incidents: &[Incident], today: NaiveDate) -> DashboardStats {
    let mut incidents_by_type: BTreeMap<IncidentType, usize> =
        IncidentType::ALL.iter().map(|t| (*t, 0)).collect();
    let mut severity_distribution: BTreeMap<Severity, usize> =
        Severity::ALL.iter().map(|s| (*s, 0)).collect();

    let mut active_incidents = 0;
    let mut high_severity_alerts = 0;

    for incident in incidents {
        *incidents_by_type.entry(incident.incident_type).or_insert(0) += 1;
        *severity_distribution.entry(incident.severity).or_insert(0) += 1;

        if incident.status.is_active() {
            active_incidents += 1;
            if incident.severity.is_high() {
                high_severity_alerts += 1;
            }
        }
    }

    DashboardStats {
        total_incidents: incidents.len(),
        active_incidents,
        high_severity_alerts,
        resolved_incidents: incidents.len() - active_incidents,
        incidents_by_type,
        incidents_trend: trend(incidents, today),
        severity_distribution,
    }
}

/// Per-day counts of `createdAt` (UTC) for the last [`TREND_DAYS`] days.
pub fn trend(incidents: &[Incident], today: NaiveDate) -> Vec<TrendPoint> {
    (0..TREND_DAYS)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            let count = incidents
                .iter()
                .filter(|incident| incident.created_at.date_naive() == day)
                .count();

            TrendPoint {
                date: day.format("%a, %b %-d").to_string(),
                day,
                count,
            }
        })
        .collect()
}
