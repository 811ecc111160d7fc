//! Incident domain logic: scoring, lifecycle rules, queries and aggregation.

pub mod aggregation;
pub mod lifecycle;
pub mod query;
pub mod scoring;
pub mod service;

pub use service::IncidentService;
