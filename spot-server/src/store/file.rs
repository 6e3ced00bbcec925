//! File-backed journey store.
//!
//! The whole collection is kept in one JSON file and rewritten on every
//! change. Suitable for a single server process.

use std::path::PathBuf;

use tokio::sync::Mutex;

use crate::domain::{Journey, JourneyId, UserId};

use super::{JourneyStore, StoreError, owned_newest_first, push_capped, remove_owned};

/// Journey store persisted to a JSON file.
#[derive(Debug)]
pub struct FileJourneyStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl FileJourneyStore {
    /// Create a store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Vec<Journey>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Io {
                    message: format!("failed to read store file: {e}"),
                });
            }
        };

        serde_json::from_str(&contents).map_err(|e| StoreError::Json {
            message: format!("failed to parse store file: {e}"),
        })
    }

    /// Write the collection, creating parent directories if needed.
    async fn write_all(&self, journeys: &[Journey]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io {
                    message: format!("failed to create store directory: {e}"),
                })?;
        }

        let json = serde_json::to_string_pretty(journeys).map_err(|e| StoreError::Json {
            message: format!("failed to serialize journeys: {e}"),
        })?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StoreError::Io {
                message: format!("failed to write store file: {e}"),
            })
    }
}

impl JourneyStore for FileJourneyStore {
    #[tracing::instrument(skip_all, fields(journey_id = %journey.journey_id))]
    async fn insert_capped(&self, journey: Journey, limit: usize) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut journeys = self.read_all().await?;
        push_capped(&mut journeys, journey, limit)?;
        self.write_all(&journeys).await
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Journey>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(owned_newest_first(&self.read_all().await?, user))
    }

    async fn get(&self, id: JourneyId) -> Result<Option<Journey>, StoreError> {
        let _guard = self.lock.lock().await;
        let journeys = self.read_all().await?;
        Ok(journeys.into_iter().find(|j| j.journey_id == id))
    }

    #[tracing::instrument(skip(self, user))]
    async fn delete(&self, user: &UserId, id: JourneyId) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut journeys = self.read_all().await?;
        remove_owned(&mut journeys, user, id)?;
        self.write_all(&journeys).await
    }
}
