//! In-memory spot catalog backed by a JSON file.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::Invalidation;
use crate::domain::{Category, Spot, SpotId};
use crate::planner::{StatusIndex, StatusRecord};

use super::error::CatalogError;

/// Read access to spots, as needed by the HTTP layer and revalidation.
pub trait SpotRepository {
    /// Published spots, optionally restricted to one category.
    fn list_spots(
        &self,
        category: Option<Category>,
    ) -> impl Future<Output = Result<Vec<Spot>, CatalogError>> + Send;

    /// Published spots by id, in the order requested.
    ///
    /// Fails with [`CatalogError::UnknownSpots`] naming every id that is
    /// missing or not published.
    fn get_spots(
        &self,
        ids: &[SpotId],
    ) -> impl Future<Output = Result<Vec<Spot>, CatalogError>> + Send;

    /// Status records for the given ids. Ids not in the catalog are absent.
    fn fetch_statuses(
        &self,
        ids: &[SpotId],
    ) -> impl Future<Output = Result<StatusIndex, CatalogError>> + Send;
}

#[derive(Debug, Default)]
struct Snapshot {
    /// Spots in file order.
    spots: Vec<Spot>,
    index: HashMap<SpotId, usize>,
}

impl Snapshot {
    fn get(&self, id: &SpotId) -> Option<&Spot> {
        self.index.get(id).map(|&i| &self.spots[i])
    }
}

/// Thread-safe spot catalog.
///
/// Cloning shares the underlying data, so a clone handed to a background
/// refresh task updates what request handlers see.
#[derive(Clone)]
pub struct SpotCatalog {
    inner: Arc<RwLock<Snapshot>>,
    path: PathBuf,
}

impl SpotCatalog {
    /// Load the catalog from a JSON array of spots.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let snapshot = read_snapshot(&path).await?;
        tracing::info!(path = %path.display(), spots = snapshot.spots.len(), "loaded spot catalog");

        Ok(Self {
            inner: Arc::new(RwLock::new(snapshot)),
            path,
        })
    }

    /// Build a catalog from spots already in memory. `reload` will read
    /// from `path`.
    pub fn from_spots(spots: Vec<Spot>, path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        Ok(Self {
            inner: Arc::new(RwLock::new(build_snapshot(spots)?)),
            path: path.into(),
        })
    }

    /// Look up a single spot, published or not.
    pub async fn get(&self, id: &SpotId) -> Option<Spot> {
        self.inner.read().await.get(id).cloned()
    }

    /// Number of spots in the catalog.
    pub async fn len(&self) -> usize {
        self.inner.read().await.spots.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.spots.is_empty()
    }

    /// Re-read the file and replace the current data.
    ///
    /// Returns the listing invalidations the change implies. On failure the
    /// existing data is kept and the error is returned.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn reload(&self) -> Result<Vec<Invalidation>, CatalogError> {
        let fresh = read_snapshot(&self.path).await?;

        let mut guard = self.inner.write().await;
        let changes = diff(&guard, &fresh);
        *guard = fresh;

        Ok(changes)
    }
}

impl SpotRepository for SpotCatalog {
    async fn list_spots(&self, category: Option<Category>) -> Result<Vec<Spot>, CatalogError> {
        let guard = self.inner.read().await;
        Ok(guard
            .spots
            .iter()
            .filter(|s| s.is_published())
            .filter(|s| category.is_none_or(|c| s.category == c))
            .cloned()
            .collect())
    }

    async fn get_spots(&self, ids: &[SpotId]) -> Result<Vec<Spot>, CatalogError> {
        let guard = self.inner.read().await;

        let mut found = Vec::with_capacity(ids.len());
        let mut unknown = Vec::new();
        for id in ids {
            match guard.get(id).filter(|s| s.is_published()) {
                Some(spot) => found.push(spot.clone()),
                None => unknown.push(id.clone()),
            }
        }

        if !unknown.is_empty() {
            return Err(CatalogError::UnknownSpots(unknown));
        }
        Ok(found)
    }

    async fn fetch_statuses(&self, ids: &[SpotId]) -> Result<StatusIndex, CatalogError> {
        let guard = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| {
                let spot = guard.get(id)?;
                let record = StatusRecord::new(spot.status.as_ref().map(|s| s.as_str()));
                Some((id.clone(), record))
            })
            .collect())
    }
}

async fn read_snapshot(path: &Path) -> Result<Snapshot, CatalogError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let spots: Vec<Spot> = serde_json::from_str(&contents).map_err(|e| CatalogError::Json {
        message: e.to_string(),
    })?;

    build_snapshot(spots)
}

fn build_snapshot(spots: Vec<Spot>) -> Result<Snapshot, CatalogError> {
    let mut index = HashMap::with_capacity(spots.len());

    for (i, spot) in spots.iter().enumerate() {
        spot.validate().map_err(|e| CatalogError::Invalid {
            spot_id: spot.spot_id.clone(),
            message: e.to_string(),
        })?;

        if spot.location.is_some() && spot.coord().is_none() {
            tracing::warn!(spot_id = %spot.spot_id, "undecodable location, spot cannot be routed");
        }

        if index.insert(spot.spot_id.clone(), i).is_some() {
            return Err(CatalogError::Invalid {
                spot_id: spot.spot_id.clone(),
                message: "duplicate id".to_string(),
            });
        }
    }

    Ok(Snapshot { spots, index })
}

/// Invalidations implied by replacing `old` with `new`, without duplicates.
fn diff(old: &Snapshot, new: &Snapshot) -> Vec<Invalidation> {
    let mut out = Vec::new();
    let mut push = |change: Invalidation| {
        if !out.contains(&change) {
            out.push(change);
        }
    };

    for spot in &new.spots {
        match old.get(&spot.spot_id) {
            None => push(Invalidation::CategoryChanged(spot.category)),
            Some(prev) if prev == spot => {}
            Some(prev) => {
                if prev.location != spot.location {
                    push(Invalidation::LocationChanged(spot.spot_id.clone()));
                }
                push(Invalidation::CategoryChanged(prev.category));
                push(Invalidation::CategoryChanged(spot.category));
            }
        }
    }

    for spot in &old.spots {
        if new.get(&spot.spot_id).is_none() {
            push(Invalidation::CategoryChanged(spot.category));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteData, RouteStop, SpotStatus};
    use crate::planner::revalidate;
    use tempfile::tempdir;

    fn id(s: &str) -> SpotId {
        SpotId::parse(s).unwrap()
    }

    fn spot(spot_id: &str, category: Category) -> Spot {
        Spot::new(id(spot_id), spot_id, category).with_location("POINT(139.77 35.70)")
    }

    fn write(path: &Path, spots: &[Spot]) {
        std::fs::write(path, serde_json::to_string(spots).unwrap()).unwrap();
    }

    fn catalog(spots: Vec<Spot>) -> SpotCatalog {
        SpotCatalog::from_spots(spots, "unused.json").unwrap()
    }

    #[tokio::test]
    async fn load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spots.json");
        write(&path, &[spot("1", Category::Retro), spot("2", Category::Craft)]);

        let catalog = SpotCatalog::load(&path).await.unwrap();
        assert_eq!(catalog.len().await, 2);
        assert_eq!(catalog.get(&id("2")).await.unwrap().category, Category::Craft);
    }

    #[tokio::test]
    async fn load_missing_file_fails() {
        let result = SpotCatalog::load("/nonexistent/spots.json").await;
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn load_rejects_bad_difficulty_and_duplicates() {
        let mut bad = spot("1", Category::Retro);
        bad.difficulty = 9;
        assert!(matches!(
            build_snapshot(vec![bad]),
            Err(CatalogError::Invalid { .. })
        ));

        assert!(matches!(
            build_snapshot(vec![spot("1", Category::Retro), spot("1", Category::Craft)]),
            Err(CatalogError::Invalid { .. })
        ));
    }

    #[tokio::test]
    async fn list_hides_unpublished_and_filters() {
        let catalog = catalog(vec![
            spot("1", Category::Retro),
            spot("2", Category::Retro).with_status(SpotStatus::OnHold),
            spot("3", Category::Craft).with_status(SpotStatus::Published),
        ]);

        let all = catalog.list_spots(None).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|s| s.spot_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        let retro = catalog.list_spots(Some(Category::Retro)).await.unwrap();
        assert_eq!(retro.len(), 1);
        assert_eq!(retro[0].spot_id, id("1"));
    }

    #[tokio::test]
    async fn get_spots_keeps_request_order() {
        let catalog = catalog(vec![
            spot("1", Category::Retro),
            spot("2", Category::Craft),
            spot("3", Category::Subculture),
        ]);

        let spots = catalog.get_spots(&[id("3"), id("1")]).await.unwrap();
        assert_eq!(spots[0].spot_id, id("3"));
        assert_eq!(spots[1].spot_id, id("1"));
    }

    #[tokio::test]
    async fn get_spots_names_all_unknown() {
        let catalog = catalog(vec![
            spot("1", Category::Retro),
            spot("2", Category::Craft).with_status(SpotStatus::Closed),
        ]);

        match catalog.get_spots(&[id("1"), id("2"), id("9")]).await {
            Err(CatalogError::UnknownSpots(ids)) => assert_eq!(ids, vec![id("2"), id("9")]),
            other => panic!("expected UnknownSpots, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn statuses_include_raw_values() {
        let catalog = catalog(vec![
            spot("1", Category::Retro),
            spot("2", Category::Craft).with_status(SpotStatus::OnHold),
        ]);

        let index = catalog
            .fetch_statuses(&[id("1"), id("2"), id("3")])
            .await
            .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index[&id("1")].status, None);
        assert_eq!(index[&id("2")].status.as_deref(), Some("on_hold"));
        assert!(!index.contains_key(&id("3")));
    }

    #[tokio::test]
    async fn unrecognised_status_loads_and_is_flagged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spots.json");
        std::fs::write(
            &path,
            r#"[
                {"spot_id": "1", "name_en": "Super Potato", "name_jp": "", "category": "Retro",
                 "difficulty": 1, "location": "POINT(139.771250 35.699250)", "status": "published"},
                {"spot_id": "2", "name_en": "Old Arcade", "name_jp": "", "category": "Retro",
                 "difficulty": 1, "location": "POINT(139.770000 35.700000)", "status": "archived"}
            ]"#,
        )
        .unwrap();

        let catalog = SpotCatalog::load(&path).await.unwrap();
        assert_eq!(catalog.len().await, 2);

        let listed = catalog.list_spots(None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].spot_id, id("1"));

        let index = catalog.fetch_statuses(&[id("1"), id("2")]).await.unwrap();
        assert_eq!(index[&id("2")].status.as_deref(), Some("archived"));

        let route = RouteData {
            stops: vec![
                RouteStop::new(spot("1", Category::Retro)),
                RouteStop::new(spot("2", Category::Retro)),
            ],
            legs: Vec::new(),
            total_duration: 120,
            total_distance: 0,
            start_spot_id: id("1"),
        };
        let flags: Vec<bool> = revalidate(route, &index)
            .stops
            .iter()
            .map(|s| s.is_deleted)
            .collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[tokio::test]
    async fn reload_reports_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spots.json");
        write(
            &path,
            &[
                spot("1", Category::Retro),
                spot("2", Category::Craft),
                spot("3", Category::Subculture),
            ],
        );
        let catalog = SpotCatalog::load(&path).await.unwrap();

        // 1 moves, 2 changes category, 3 is removed
        write(
            &path,
            &[
                spot("1", Category::Retro).with_location("POINT(139.78 35.70)"),
                spot("2", Category::Retro),
            ],
        );
        let changes = catalog.reload().await.unwrap();

        assert!(changes.contains(&Invalidation::LocationChanged(id("1"))));
        assert!(changes.contains(&Invalidation::CategoryChanged(Category::Retro)));
        assert!(changes.contains(&Invalidation::CategoryChanged(Category::Craft)));
        assert!(changes.contains(&Invalidation::CategoryChanged(Category::Subculture)));
        assert_eq!(catalog.len().await, 2);
    }

    #[tokio::test]
    async fn unchanged_reload_reports_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spots.json");
        write(&path, &[spot("1", Category::Retro)]);
        let catalog = SpotCatalog::load(&path).await.unwrap();

        assert!(catalog.reload().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_reload_keeps_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spots.json");
        write(&path, &[spot("1", Category::Retro)]);
        let catalog = SpotCatalog::load(&path).await.unwrap();

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            catalog.reload().await,
            Err(CatalogError::Json { .. })
        ));
        assert_eq!(catalog.len().await, 1);
    }

    #[tokio::test]
    async fn clones_share_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spots.json");
        write(&path, &[spot("1", Category::Retro)]);
        let catalog = SpotCatalog::load(&path).await.unwrap();
        let handle = catalog.clone();

        write(&path, &[spot("1", Category::Retro), spot("2", Category::Craft)]);
        handle.reload().await.unwrap();

        assert_eq!(catalog.len().await, 2);
    }
}
