//! In-memory journey store.

use tokio::sync::RwLock;

use crate::domain::{Journey, JourneyId, UserId};

use super::{JourneyStore, StoreError, owned_newest_first, push_capped, remove_owned};

/// Journey store that lives for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryJourneyStore {
    journeys: RwLock<Vec<Journey>>,
}

impl MemoryJourneyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JourneyStore for MemoryJourneyStore {
    async fn insert_capped(&self, journey: Journey, limit: usize) -> Result<(), StoreError> {
        push_capped(&mut *self.journeys.write().await, journey, limit)
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Journey>, StoreError> {
        Ok(owned_newest_first(&self.journeys.read().await, user))
    }

    async fn get(&self, id: JourneyId) -> Result<Option<Journey>, StoreError> {
        let guard = self.journeys.read().await;
        Ok(guard.iter().find(|j| j.journey_id == id).cloned())
    }

    async fn delete(&self, user: &UserId, id: JourneyId) -> Result<(), StoreError> {
        remove_owned(&mut *self.journeys.write().await, user, id)
    }
}
