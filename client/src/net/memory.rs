//! In-process [`ArtifactStore`] for tests, demos and offline sessions.
//!
//! Behaves like the HTTP store: toggles flip the stored cell and return the
//! new value, unknown ids are rejected with 404 and out-of-range cells with
//! 400. Latency and one-shot failures can be injected to exercise the
//! editor's timeout and error paths.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use canvas::grid::{Cell, GridModel};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::store::{ArtifactStore, StoreError};
use super::types::{ArtifactData, ArtifactSummary};

#[derive(Debug, Clone)]
struct StoredArtifact {
    /// `None` models a stored file that cannot be parsed.
    grid: Option<GridModel>,
    original_exists: bool,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: RwLock<BTreeMap<String, StoredArtifact>>,
    latency: Duration,
    toggle_delays: Mutex<VecDeque<Duration>>,
    failures: Mutex<VecDeque<StoreError>>,
    toggles: Mutex<Vec<(String, Cell)>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an artifact.
    #[must_use]
    pub fn with_artifact(mut self, id: impl Into<String>, grid: GridModel, original_exists: bool) -> Self {
        self.artifacts.get_mut().insert(id.into(), StoredArtifact { grid: Some(grid), original_exists });
        self
    }

    /// Add an artifact whose stored matrix cannot be read. It is listed
    /// with null metadata and fails to load.
    #[must_use]
    pub fn with_unreadable(mut self, id: impl Into<String>) -> Self {
        self.artifacts.get_mut().insert(id.into(), StoredArtifact { grid: None, original_exists: false });
        self
    }

    /// Delay applied to every operation.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Extra delay for the next toggle only. Queued delays apply in order.
    pub async fn delay_next_toggle(&self, delay: Duration) {
        self.toggle_delays.lock().await.push_back(delay);
    }

    /// Make the next operation (of any kind) fail with `err`.
    pub async fn fail_next(&self, err: StoreError) {
        self.failures.lock().await.push_back(err);
    }

    /// Current stored matrix for `id`.
    pub async fn grid(&self, id: &str) -> Option<GridModel> {
        self.artifacts.read().await.get(id).and_then(|a| a.grid.clone())
    }

    /// Every toggle the store has applied, in order.
    pub async fn toggles(&self) -> Vec<(String, Cell)> {
        self.toggles.lock().await.clone()
    }

    async fn begin(&self) -> Result<(), StoreError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.failures.lock().await.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn not_found() -> StoreError {
    StoreError::rejected(Some(404), "not found")
}

fn unreadable(id: &str) -> StoreError {
    StoreError::rejected(Some(500), format!("failed to read {id}"))
}

fn stem(id: &str) -> &str {
    id.rsplit_once('.').map_or(id, |(stem, _)| stem)
}

/// Listing order: numeric stems first by value, then the rest by stem, so
/// `9.json` precedes `10.json`.
fn catalog_key(id: &str) -> (bool, i64, &str) {
    let stem = stem(id);
    match stem.parse::<i64>() {
        Ok(n) => (false, n, ""),
        Err(_) => (true, 0, stem),
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn list_artifacts(&self) -> Result<Vec<ArtifactSummary>, StoreError> {
        self.begin().await?;
        let artifacts = self.artifacts.read().await;
        let mut items: Vec<ArtifactSummary> = artifacts
            .iter()
            .map(|(id, stored)| {
                let grid = stored.grid.as_ref();
                ArtifactSummary {
                    id: id.clone(),
                    module: grid.map(GridModel::module_count),
                    width: grid.map(GridModel::width_px),
                    height: grid.map(GridModel::height_px),
                    original_exists: stored.original_exists,
                    original_name: stored.original_exists.then(|| format!("{}.png", stem(id))),
                    stem: Some(stem(id).to_owned()),
                }
            })
            .collect();
        items.sort_by(|a, b| catalog_key(&a.id).cmp(&catalog_key(&b.id)).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn load_artifact(&self, id: &str) -> Result<ArtifactData, StoreError> {
        self.begin().await?;
        let artifacts = self.artifacts.read().await;
        let stored = artifacts.get(id).ok_or_else(not_found)?;
        let grid = stored.grid.as_ref().ok_or_else(|| unreadable(id))?;
        Ok(ArtifactData {
            vector: grid.to_rows(),
            module: grid.module_count(),
            width: grid.width_px(),
            height: grid.height_px(),
            file: stored.original_exists.then(|| format!("{}.png", stem(id))),
        })
    }

    async fn toggle_cell(&self, id: &str, cell: Cell) -> Result<u8, StoreError> {
        self.begin().await?;
        let extra = self.toggle_delays.lock().await.pop_front();
        if let Some(delay) = extra {
            tokio::time::sleep(delay).await;
        }

        let mut artifacts = self.artifacts.write().await;
        let stored = artifacts.get_mut(id).ok_or_else(not_found)?;
        let grid = stored.grid.as_mut().ok_or_else(|| unreadable(id))?;
        let current = grid
            .get(cell.x, cell.y)
            .map_err(|_| StoreError::rejected(Some(400), "index out of range"))?;
        let value = 1 - current;
        grid.set(cell.x, cell.y, value)?;
        self.toggles.lock().await.push((id.to_owned(), cell));
        debug!(id, x = cell.x, y = cell.y, value, "memory store toggled cell");
        Ok(value)
    }

    async fn save_artifact(&self, id: &str, grid: &GridModel) -> Result<String, StoreError> {
        self.begin().await?;
        let mut artifacts = self.artifacts.write().await;
        let stored = artifacts.get_mut(id).ok_or_else(not_found)?;
        stored.grid = Some(grid.clone());
        Ok(format!("memory://{id}"))
    }

    async fn export_png(&self, id: &str, out_name: Option<&str>) -> Result<String, StoreError> {
        self.begin().await?;
        let artifacts = self.artifacts.read().await;
        let stored = artifacts.get(id).ok_or_else(not_found)?;
        if stored.grid.is_none() {
            return Err(unreadable(id));
        }
        let name = out_name.map_or_else(|| format!("{}.png", stem(id)), str::to_owned);
        Ok(format!("memory://exports/{name}"))
    }

    async fn health(&self) -> Result<(), StoreError> {
        self.begin().await
    }

    fn thumbnail_url(&self, id: &str, size: u32) -> String {
        format!("memory://render/{}?size={size}", urlencoding::encode(id))
    }

    fn original_url(&self, id: &str, size: u32) -> String {
        format!("memory://original/{}?size={size}", urlencoding::encode(id))
    }
}
