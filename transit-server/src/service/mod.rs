//! Shared transit service state.
//!
//! Holds the current [`Snapshot`] behind a read-write lock. Readers clone
//! the `Arc` and query without holding the lock. Writers are serialised by
//! a separate gate; each one copies the catalogue, applies its change,
//! builds a fresh graph and only then swaps the new snapshot in. A failed
//! change is dropped before the swap, so readers see either the old state
//! or the new one and never anything in between.

mod error;
mod query;
mod snapshot;

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::catalogue::{BusStat, Catalogue};
use crate::ingest::{
    BusPatch, IngestSummary, LoadDocument, MutationDocument, apply_base_requests, apply_patch,
};
use crate::routing::{DEFAULT_TREE_CACHE, Itinerary, RoutingSettings};

pub use error::ServiceError;
pub use query::{NOT_FOUND, RouteItem, StatRequest, StatResponse};
pub use snapshot::Snapshot;

/// Sizes of a freshly loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub stops: usize,
    pub buses: usize,
    pub vertices: usize,
    pub edges: usize,
}

impl LoadSummary {
    fn of(snapshot: &Snapshot) -> Self {
        Self {
            stops: snapshot.catalogue().stop_count(),
            buses: snapshot.catalogue().bus_count(),
            vertices: snapshot.router().graph().vertex_count(),
            edges: snapshot.router().graph().edge_count(),
        }
    }
}

/// Thread-safe handle to the current dataset. Cheap to clone.
#[derive(Clone)]
pub struct TransitService {
    current: Arc<RwLock<Option<Arc<Snapshot>>>>,
    writer: Arc<Mutex<()>>,
    tree_cache: u64,
}

impl Default for TransitService {
    fn default() -> Self {
        Self::new(DEFAULT_TREE_CACHE)
    }
}

impl TransitService {
    /// Create a service with no dataset loaded.
    ///
    /// `tree_cache` bounds the shortest-path trees cached per snapshot.
    pub fn new(tree_cache: u64) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            writer: Arc::new(Mutex::new(())),
            tree_cache,
        }
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Result<Arc<Snapshot>, ServiceError> {
        self.current.read().await.clone().ok_or(ServiceError::NotLoaded)
    }

    /// Whether a dataset has been loaded.
    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Replace the whole dataset.
    ///
    /// Routing settings are validated before anything is built; on any
    /// error the previous dataset stays in place.
    pub async fn load(&self, document: LoadDocument) -> Result<LoadSummary, ServiceError> {
        let settings = document.routing_settings()?;

        let _gate = self.writer.lock().await;
        let mut catalogue = Catalogue::new();
        apply_base_requests(&mut catalogue, &document.base_requests)?;

        let snapshot = self.build(catalogue, settings).await?;
        let summary = LoadSummary::of(&snapshot);
        self.swap(snapshot).await;

        info!(
            stops = summary.stops,
            buses = summary.buses,
            edges = summary.edges,
            "dataset loaded"
        );
        Ok(summary)
    }

    /// Read a JSON load document from `path` and load it.
    pub async fn load_from_path(&self, path: impl AsRef<Path>) -> Result<LoadSummary, ServiceError> {
        let path = path.as_ref();
        let body = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ServiceError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        let document: LoadDocument =
            serde_json::from_str(&body).map_err(|e| ServiceError::Malformed(e.to_string()))?;
        self.load(document).await
    }

    /// Add or redefine stops and buses in the loaded dataset.
    pub async fn add_stops_and_buses(
        &self,
        document: MutationDocument,
    ) -> Result<IngestSummary, ServiceError> {
        let _gate = self.writer.lock().await;
        let current = self.snapshot().await?;

        let mut catalogue = current.catalogue().clone();
        let summary = apply_base_requests(&mut catalogue, &document.base_requests)
            .inspect_err(|e| warn!(error = %e, "rejected records"))?;

        let snapshot = self.build(catalogue, *current.settings()).await?;
        self.swap(snapshot).await;
        Ok(summary)
    }

    /// Patch the stop list or roundtrip flag of a loaded bus.
    pub async fn patch_bus(&self, patch: &BusPatch) -> Result<(), ServiceError> {
        let _gate = self.writer.lock().await;
        let current = self.snapshot().await?;

        let mut catalogue = current.catalogue().clone();
        apply_patch(&mut catalogue, patch)
            .inspect_err(|e| warn!(bus = %patch.name, error = %e, "rejected patch"))?;

        let snapshot = self.build(catalogue, *current.settings()).await?;
        self.swap(snapshot).await;
        Ok(())
    }

    /// Statistics of the named bus in the current dataset.
    pub async fn bus_stat(&self, bus: &str) -> Result<BusStat, ServiceError> {
        self.snapshot().await?.bus_stat(bus)
    }

    /// Buses serving the named stop in the current dataset.
    pub async fn stop_buses(&self, stop: &str) -> Result<BTreeSet<String>, ServiceError> {
        self.snapshot().await?.stop_buses(stop).cloned()
    }

    /// Fastest itinerary in the current dataset.
    pub async fn route(&self, from: &str, to: &str) -> Result<Itinerary, ServiceError> {
        self.snapshot().await?.route(from, to)
    }

    /// Answer a batch of stat requests against one snapshot.
    pub async fn answer(&self, requests: &[StatRequest]) -> Result<Vec<StatResponse>, ServiceError> {
        Ok(self.snapshot().await?.answer(requests))
    }

    /// Build a snapshot on the blocking pool, keeping runtime threads free.
    async fn build(
        &self,
        catalogue: Catalogue,
        settings: RoutingSettings,
    ) -> Result<Snapshot, ServiceError> {
        let tree_cache = self.tree_cache;
        tokio::task::spawn_blocking(move || Snapshot::build(catalogue, settings, tree_cache))
            .await
            .map_err(|e| ServiceError::Rebuild(e.to_string()))
    }

    async fn swap(&self, snapshot: Snapshot) {
        *self.current.write().await = Some(Arc::new(snapshot));
    }
}
