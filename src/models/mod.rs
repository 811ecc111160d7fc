// Public exports for data models

pub mod filter;
pub mod incident;
pub mod stats;
pub mod user;

pub use filter::IncidentFilter;
pub use incident::{
    format_incident_id, parse_incident_sequence, Incident, IncidentDraft, IncidentStatus,
    IncidentType, Location, Severity,
};
pub use stats::{DashboardStats, TrendPoint};
pub use user::{Role, User};
