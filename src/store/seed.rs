//! Demo data for a fresh store.

use chrono::{Duration, Utc};
use rand::Rng;

use crate::models::{
    format_incident_id, Incident, IncidentStatus, IncidentType, Location, Severity,
};

/// Demo incidents cluster around San Francisco city hall.
const BASE_LATITUDE: f64 = 37.7749;
const BASE_LONGITUDE: f64 = -122.4194;
const COORDINATE_SPREAD: f64 = 0.1;
const MAX_AGE_SECONDS: i64 = 7 * 24 * 60 * 60;

fn descriptions(incident_type: IncidentType) -> &'static [&'static str] {
    match incident_type {
        IncidentType::Accident => &[
            "Vehicle collision at intersection",
            "Multi-car pileup on highway",
            "Pedestrian struck by vehicle",
            "Motorcycle accident near school zone",
            "Bus and truck collision",
        ],
        IncidentType::Medical => &[
            "Person collapsed in shopping center",
            "Cardiac emergency at office building",
            "Severe allergic reaction reported",
            "Individual in respiratory distress",
            "Unconscious person found in park",
        ],
        IncidentType::Fire => &[
            "Building fire reported",
            "Smoke emanating from residential area",
            "Kitchen fire in restaurant",
            "Electrical fire in commercial building",
            "Wildfire approaching residential zone",
        ],
        IncidentType::Infrastructure => &[
            "Water main break flooding street",
            "Power line down across road",
            "Sinkhole forming in parking lot",
            "Bridge structural damage reported",
            "Gas leak detected in neighborhood",
        ],
        IncidentType::Safety => &[
            "Suspicious activity reported",
            "Armed individual spotted near school",
            "Public disturbance in downtown area",
            "Chemical spill on highway",
            "Hazardous material found in public area",
        ],
    }
}

fn pick<T: Copy, R: Rng>(rng: &mut R, items: &[T]) -> T {
    items[rng.random_range(0..items.len())]
}

/// Generate one random incident with sequence number `sequence`.
pub fn demo_incident<R: Rng>(rng: &mut R, sequence: u64) -> Incident {
    let incident_type = pick(rng, &IncidentType::ALL);
    let status = pick(rng, &IncidentStatus::ALL);
    let severity = pick(rng, &Severity::ALL);
    let confirmations = rng.random_range(0..20);
    let description = pick(rng, descriptions(incident_type));

    let location = Location::new(
        BASE_LATITUDE + (rng.random::<f64>() - 0.5) * COORDINATE_SPREAD,
        BASE_LONGITUDE + (rng.random::<f64>() - 0.5) * COORDINATE_SPREAD,
    );
    let created_at = Utc::now() - Duration::seconds(rng.random_range(0..MAX_AGE_SECONDS));

    let notes = (status != IncidentStatus::Unverified).then(|| {
        vec![
            "Initial assessment completed".to_string(),
            "Resources dispatched".to_string(),
        ]
    });

    let mut incident = Incident {
        id: format_incident_id(sequence),
        incident_type,
        description: description.to_string(),
        location,
        status,
        severity,
        confirmations,
        created_at,
        updated_at: created_at,
        reporter_name: None,
        notes,
        priority_score: 0.0,
        is_false_report: false,
    };
    incident.refresh_score();
    incident
}

/// Generate `count` incidents numbered from 1, highest priority first.
pub fn demo_incidents<R: Rng>(rng: &mut R, count: usize) -> Vec<Incident> {
    let mut incidents: Vec<Incident> = (1..=count as u64)
        .map(|sequence| demo_incident(rng, sequence))
        .collect();
    incidents.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
    incidents
}
