use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::RwLock;
use tracing::debug;

use super::{IncidentMutation, IncidentRepository};
use crate::models::{format_incident_id, parse_incident_sequence, Incident, IncidentDraft};
use crate::{CivicAlertError, CivicResult};

#[derive(Debug, Default)]
struct StoreState {
    /// Newest first
    incidents: VecDeque<Incident>,
    last_sequence: u64,
}

/// Process-memory incident store.
///
/// One lock guards the whole collection: sequence allocation, insertion and
/// each read-modify-write run under the write guard, so concurrent updates
/// to the same record are serialized.
#[derive(Debug, Default)]
pub struct InMemoryIncidentStore {
    state: RwLock<StoreState>,
}

impl InMemoryIncidentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing records, kept in the given order. New ids continue
    /// after the highest `INC-` sequence present.
    pub fn with_incidents(incidents: Vec<Incident>) -> Self {
        let last_sequence = incidents
            .iter()
            .filter_map(|incident| parse_incident_sequence(&incident.id))
            .max()
            .unwrap_or(0)
            .max(incidents.len() as u64);

        Self {
            state: RwLock::new(StoreState {
                incidents: incidents.into(),
                last_sequence,
            }),
        }
    }
}

#[async_trait]
impl IncidentRepository for InMemoryIncidentStore {
    async fn insert(&self, draft: IncidentDraft) -> CivicResult<Incident> {
        let mut state = self.state.write().await;
        state.last_sequence += 1;

        let incident = draft.into_incident(format_incident_id(state.last_sequence));
        state.incidents.push_front(incident.clone());

        debug!(incident_id = %incident.id, total = state.incidents.len(), "Stored new incident");
        Ok(incident)
    }

    async fn get(&self, id: &str) -> CivicResult<Option<Incident>> {
        let state = self.state.read().await;
        Ok(state.incidents.iter().find(|i| i.id == id).cloned())
    }

    async fn update(&self, id: &str, mutation: IncidentMutation) -> CivicResult<Incident> {
        let mut state = self.state.write().await;
        let slot = state
            .incidents
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| CivicAlertError::not_found(id))?;

        let mut working = slot.clone();
        mutation(&mut working)?;
        *slot = working.clone();

        Ok(working)
    }

    async fn snapshot(&self) -> CivicResult<Vec<Incident>> {
        let state = self.state.read().await;
        Ok(state.incidents.iter().cloned().collect())
    }
}
