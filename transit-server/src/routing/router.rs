//! Stop-to-stop itinerary queries.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::catalogue::Catalogue;
use crate::domain::StopId;

use super::builder::{GraphBuilder, VertexPair};
use super::graph::DirectedWeightedGraph;
use super::settings::RoutingSettings;
use super::solver::{DEFAULT_TREE_CACHE, PathSolver};

/// One step of an itinerary.
#[derive(Debug, Clone, PartialEq)]
pub enum ItineraryItem {
    /// Wait at a stop before boarding.
    Wait { stop_name: String, time: f64 },

    /// Ride a bus across `span_count` consecutive hops.
    Bus {
        bus: String,
        span_count: usize,
        time: f64,
    },
}

impl ItineraryItem {
    /// Minutes spent on this step.
    pub fn time(&self) -> f64 {
        match self {
            ItineraryItem::Wait { time, .. } | ItineraryItem::Bus { time, .. } => *time,
        }
    }
}

/// A fastest way from one stop to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    /// Total minutes, the sum of the item times.
    pub total_time: f64,

    pub items: Vec<ItineraryItem>,
}

/// Routing graph for one catalogue snapshot plus its path solver.
///
/// Built once from a catalogue; any change to the catalogue requires
/// building a new router.
#[derive(Debug)]
pub struct TransportRouter {
    settings: RoutingSettings,
    vertices: HashMap<StopId, VertexPair>,
    solver: PathSolver,
}

impl TransportRouter {
    /// Build the graph for `catalogue`.
    pub fn new(catalogue: &Catalogue, settings: RoutingSettings) -> Self {
        Self::with_cache_capacity(catalogue, settings, DEFAULT_TREE_CACHE)
    }

    /// Build the graph, caching at most `capacity` shortest-path trees.
    pub fn with_cache_capacity(
        catalogue: &Catalogue,
        settings: RoutingSettings,
        capacity: u64,
    ) -> Self {
        let built = GraphBuilder::new(catalogue, &settings).build();
        info!(
            stops = catalogue.stop_count(),
            buses = catalogue.bus_count(),
            vertices = built.graph.vertex_count(),
            edges = built.graph.edge_count(),
            "routing graph ready"
        );

        Self {
            settings,
            vertices: built.vertices,
            solver: PathSolver::with_cache_capacity(built.graph, capacity),
        }
    }

    /// Fastest itinerary between two stops.
    ///
    /// Returns `None` if either stop is unknown to this graph or no route
    /// connects them. Routing from a stop to itself is an empty itinerary.
    pub fn route(&self, from: StopId, to: StopId) -> Option<Itinerary> {
        let source = self.vertices.get(&from)?.arrival;
        let target = self.vertices.get(&to)?.arrival;

        let route = self.solver.find_path(source, target)?;
        let graph = self.solver.graph();

        let items = route
            .edges
            .iter()
            .map(|&id| {
                let edge = graph.edge(id)?;
                Some(if edge.is_wait() {
                    ItineraryItem::Wait {
                        stop_name: edge.name.clone(),
                        time: edge.weight,
                    }
                } else {
                    ItineraryItem::Bus {
                        bus: edge.name.clone(),
                        span_count: edge.span_count,
                        time: edge.weight,
                    }
                })
            })
            .collect::<Option<Vec<_>>>()?;

        let total_time = items.iter().map(ItineraryItem::time).fold(0.0, |acc, t| acc + t);
        debug!(%from, %to, total_time, items = items.len(), "routed");

        Some(Itinerary { total_time, items })
    }

    /// Vertex pair of a stop, if the stop was in the catalogue at build time.
    pub fn vertices(&self, stop: StopId) -> Option<VertexPair> {
        self.vertices.get(&stop).copied()
    }

    pub fn graph(&self) -> &DirectedWeightedGraph {
        self.solver.graph()
    }

    pub fn settings(&self) -> &RoutingSettings {
        &self.settings
    }
}
