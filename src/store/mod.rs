//! Incident persistence.
//!
//! The service only talks to [`IncidentRepository`], so a durable backend can
//! replace [`InMemoryIncidentStore`] without touching scoring or lifecycle code.

pub mod memory;
pub mod seed;

use async_trait::async_trait;

use crate::models::{Incident, IncidentDraft};
use crate::CivicResult;

pub use memory::InMemoryIncidentStore;

/// A read-modify-write step applied to one record. Returning an error aborts
/// the mutation and leaves the stored record untouched.
pub type IncidentMutation = Box<dyn FnOnce(&mut Incident) -> CivicResult<()> + Send>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// Assign the next sequential id and store the record ahead of all
    /// existing ones.
    async fn insert(&self, draft: IncidentDraft) -> CivicResult<Incident>;

    async fn get(&self, id: &str) -> CivicResult<Option<Incident>>;

    /// Apply `mutation` atomically. Fails with `IncidentNotFound` for an
    /// unknown id.
    async fn update(&self, id: &str, mutation: IncidentMutation) -> CivicResult<Incident>;

    /// Every record, newest insertion first.
    async fn snapshot(&self) -> CivicResult<Vec<Incident>>;
}
