//! Saved journey persistence.
//!
//! Journeys are stored whole and never edited. The per-user ceiling is
//! checked in the same critical section as the insert.

mod error;
mod file;
mod memory;

use std::future::Future;

use crate::domain::{Journey, JourneyId, UserId};

pub use error::StoreError;
pub use file::FileJourneyStore;
pub use memory::MemoryJourneyStore;

/// Persistence for saved journeys.
pub trait JourneyStore {
    /// Insert a journey unless its owner already has `limit` saved.
    ///
    /// Fails with [`StoreError::LimitReached`] when the owner is at the limit.
    fn insert_capped(
        &self,
        journey: Journey,
        limit: usize,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// The user's journeys, newest first.
    fn list_for_user(
        &self,
        user: &UserId,
    ) -> impl Future<Output = Result<Vec<Journey>, StoreError>> + Send;

    fn get(&self, id: JourneyId) -> impl Future<Output = Result<Option<Journey>, StoreError>> + Send;

    /// Delete a journey owned by `user`.
    ///
    /// A journey owned by someone else is reported as [`StoreError::NotFound`],
    /// the same as one that does not exist.
    fn delete(
        &self,
        user: &UserId,
        id: JourneyId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// The store selected at startup.
#[derive(Debug)]
pub enum Journeys {
    Memory(MemoryJourneyStore),
    File(FileJourneyStore),
}

impl JourneyStore for Journeys {
    async fn insert_capped(&self, journey: Journey, limit: usize) -> Result<(), StoreError> {
        match self {
            Journeys::Memory(s) => s.insert_capped(journey, limit).await,
            Journeys::File(s) => s.insert_capped(journey, limit).await,
        }
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Journey>, StoreError> {
        match self {
            Journeys::Memory(s) => s.list_for_user(user).await,
            Journeys::File(s) => s.list_for_user(user).await,
        }
    }

    async fn get(&self, id: JourneyId) -> Result<Option<Journey>, StoreError> {
        match self {
            Journeys::Memory(s) => s.get(id).await,
            Journeys::File(s) => s.get(id).await,
        }
    }

    async fn delete(&self, user: &UserId, id: JourneyId) -> Result<(), StoreError> {
        match self {
            Journeys::Memory(s) => s.delete(user, id).await,
            Journeys::File(s) => s.delete(user, id).await,
        }
    }
}

/// Push `journey` unless its owner already has `limit` journeys.
fn push_capped(journeys: &mut Vec<Journey>, journey: Journey, limit: usize) -> Result<(), StoreError> {
    let owned = journeys
        .iter()
        .filter(|j| j.is_owned_by(&journey.user_id))
        .count();
    if owned >= limit {
        return Err(StoreError::LimitReached { limit });
    }
    journeys.push(journey);
    Ok(())
}

/// Journeys owned by `user`, newest first.
fn owned_newest_first(journeys: &[Journey], user: &UserId) -> Vec<Journey> {
    let mut owned: Vec<Journey> = journeys
        .iter()
        .filter(|j| j.is_owned_by(user))
        .cloned()
        .collect();
    owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    owned
}

/// Remove `id` from `journeys` if `user` owns it.
fn remove_owned(journeys: &mut Vec<Journey>, user: &UserId, id: JourneyId) -> Result<(), StoreError> {
    let pos = journeys
        .iter()
        .position(|j| j.journey_id == id && j.is_owned_by(user))
        .ok_or(StoreError::NotFound(id))?;
    journeys.remove(pos);
    Ok(())
}
