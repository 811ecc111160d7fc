//! Priority scoring.
//!
//! `score = round1(type_weight * severity_weight + min(confirmations * 0.5, 5))`

use crate::models::{IncidentType, Severity};

/// Largest contribution confirmations can make to a score.
pub const MAX_CONFIRMATION_BONUS: f64 = 5.0;
const BONUS_PER_CONFIRMATION: f64 = 0.5;

pub fn type_weight(incident_type: IncidentType) -> u32 {
    match incident_type {
        IncidentType::Accident => 3,
        IncidentType::Medical => 4,
        IncidentType::Fire => 5,
        IncidentType::Infrastructure => 2,
        IncidentType::Safety => 4,
    }
}

pub fn severity_weight(severity: Severity) -> u32 {
    match severity {
        Severity::Low => 1,
        Severity::Medium => 2,
        Severity::High => 3,
        Severity::Critical => 5,
    }
}

pub fn confirmation_bonus(confirmations: u32) -> f64 {
    (f64::from(confirmations) * BONUS_PER_CONFIRMATION).min(MAX_CONFIRMATION_BONUS)
}

/// Priority score rounded to one decimal place.
pub fn score(incident_type: IncidentType, severity: Severity, confirmations: u32) -> f64 {
    let base = f64::from(type_weight(incident_type) * severity_weight(severity));
    ((base + confirmation_bonus(confirmations)) * 10.0).round() / 10.0
}
