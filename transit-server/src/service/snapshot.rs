//! An immutable catalogue plus the routing graph built from it.

use std::collections::BTreeSet;

use crate::catalogue::{BusStat, Catalogue};
use crate::routing::{Itinerary, RoutingSettings, TransportRouter};

use super::error::ServiceError;

/// A catalogue and the graph built from exactly that catalogue.
///
/// Never modified after construction; a change produces a new snapshot.
#[derive(Debug)]
pub struct Snapshot {
    catalogue: Catalogue,
    router: TransportRouter,
}

impl Snapshot {
    /// Build the routing graph for `catalogue`.
    pub fn build(catalogue: Catalogue, settings: RoutingSettings, tree_cache: u64) -> Self {
        let router = TransportRouter::with_cache_capacity(&catalogue, settings, tree_cache);
        Self { catalogue, router }
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn router(&self) -> &TransportRouter {
        &self.router
    }

    pub fn settings(&self) -> &RoutingSettings {
        self.router.settings()
    }

    /// Statistics of the named bus.
    pub fn bus_stat(&self, bus: &str) -> Result<BusStat, ServiceError> {
        Ok(self.catalogue.bus_stat(bus)?)
    }

    /// Names of the buses serving the named stop, sorted.
    pub fn stop_buses(&self, stop: &str) -> Result<&BTreeSet<String>, ServiceError> {
        self.catalogue
            .get_stop(stop)
            .map(|s| &s.buses)
            .ok_or_else(|| ServiceError::StopNotFound(stop.to_string()))
    }

    /// Fastest itinerary between two named stops.
    pub fn route(&self, from: &str, to: &str) -> Result<Itinerary, ServiceError> {
        let from_id = self
            .catalogue
            .stop_id(from)
            .ok_or_else(|| ServiceError::StopNotFound(from.to_string()))?;
        let to_id = self
            .catalogue
            .stop_id(to)
            .ok_or_else(|| ServiceError::StopNotFound(to.to_string()))?;

        self.router
            .route(from_id, to_id)
            .ok_or_else(|| ServiceError::Unreachable {
                from: from.to_string(),
                to: to.to_string(),
            })
    }
}
