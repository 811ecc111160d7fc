//! Filtered, priority-ordered views over a snapshot of the store.

use crate::models::{Incident, IncidentFilter};

/// Apply `filter` and order by descending priority score.
///
/// Structured criteria run first, then the free-text search. The sort is
/// stable, so equal scores keep the snapshot's (newest-first) order.
pub fn list(incidents: Vec<Incident>, filter: &IncidentFilter) -> Vec<Incident> {
    let mut matched: Vec<Incident> = incidents
        .into_iter()
        .filter(|incident| filter.matches_structured(incident))
        .filter(|incident| filter.matches_search(incident))
        .collect();

    matched.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
    matched
}

/// One page of a listing. `page` is 1-based; pages past the end are empty.
pub fn paginate(incidents: Vec<Incident>, page: usize, page_size: usize) -> Vec<Incident> {
    let skip = page.saturating_sub(1).saturating_mul(page_size);
    incidents.into_iter().skip(skip).take(page_size).collect()
}
