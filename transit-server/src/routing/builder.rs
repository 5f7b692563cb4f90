//! Construction of the routing graph from a catalogue.
//!
//! Every stop gets two vertices: an arrival vertex and a departure vertex,
//! joined by a wait edge. Riding a bus from stop `i` to any later stop `j`
//! on its route is a single edge from `i`'s departure vertex to `j`'s
//! arrival vertex, so one boarding covering several hops costs one wait.

use std::collections::HashMap;

use tracing::debug;

use crate::catalogue::Catalogue;
use crate::domain::{Bus, StopId};

use super::graph::{DirectedWeightedGraph, Edge, VertexId};
use super::settings::RoutingSettings;

/// The two vertices of one stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexPair {
    /// Where rides end. Routes start and finish here.
    pub arrival: VertexId,

    /// Where rides begin, one wait edge after `arrival`.
    pub departure: VertexId,
}

/// A freshly built graph and the stop to vertex mapping used to build it.
#[derive(Debug, Clone)]
pub struct BuiltGraph {
    pub graph: DirectedWeightedGraph,
    pub vertices: HashMap<StopId, VertexPair>,
}

/// Builds the routing graph for one catalogue snapshot.
pub struct GraphBuilder<'a> {
    catalogue: &'a Catalogue,
    settings: &'a RoutingSettings,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(catalogue: &'a Catalogue, settings: &'a RoutingSettings) -> Self {
        Self {
            catalogue,
            settings,
        }
    }

    /// Build the graph: wait edges for every stop, then ride edges for every bus.
    pub fn build(&self) -> BuiltGraph {
        let mut graph = DirectedWeightedGraph::new(self.catalogue.stop_count() * 2);
        let vertices = self.add_wait_edges(&mut graph);

        for bus in self.catalogue.all_buses().into_values() {
            self.add_ride_edges(&mut graph, &vertices, bus);
        }

        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "built routing graph"
        );

        BuiltGraph { graph, vertices }
    }

    /// Assign vertex pairs in stop-name order and join each pair with a wait edge.
    fn add_wait_edges(&self, graph: &mut DirectedWeightedGraph) -> HashMap<StopId, VertexPair> {
        let wait = f64::from(self.settings.bus_wait_time());
        let mut vertices = HashMap::with_capacity(self.catalogue.stop_count());

        for (index, stop) in self.catalogue.all_stops().into_values().enumerate() {
            let pair = VertexPair {
                arrival: 2 * index,
                departure: 2 * index + 1,
            };
            graph.add_edge(Edge {
                name: stop.name.clone(),
                span_count: 0,
                from: pair.arrival,
                to: pair.departure,
                weight: wait,
            });
            vertices.insert(stop.id, pair);
        }

        vertices
    }

    /// Add one edge per reachable span of the bus route.
    ///
    /// Non-roundtrip buses also get the mirrored edge for each span, weighted
    /// by the distances of the return direction.
    fn add_ride_edges(
        &self,
        graph: &mut DirectedWeightedGraph,
        vertices: &HashMap<StopId, VertexPair>,
        bus: &Bus,
    ) {
        let stops = &bus.stops;

        for i in 0..stops.len() {
            let mut forward = 0u64;
            let mut backward = 0u64;

            for j in (i + 1)..stops.len() {
                forward += u64::from(self.catalogue.get_distance(stops[j - 1], stops[j]));
                backward += u64::from(self.catalogue.get_distance(stops[j], stops[j - 1]));

                let (Some(from), Some(to)) = (vertices.get(&stops[i]), vertices.get(&stops[j]))
                else {
                    continue;
                };

                graph.add_edge(Edge {
                    name: bus.name.clone(),
                    span_count: j - i,
                    from: from.departure,
                    to: to.arrival,
                    weight: self.settings.travel_minutes(forward),
                });

                if !bus.is_roundtrip {
                    graph.add_edge(Edge {
                        name: bus.name.clone(),
                        span_count: j - i,
                        from: to.departure,
                        to: from.arrival,
                        weight: self.settings.travel_minutes(backward),
                    });
                }
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::Coordinates;
    use proptest::prelude::*;

    /// Stop count, directed distances and buses (stop indices, roundtrip) of a catalogue.
    type Layout = (usize, Vec<(usize, usize, u32)>, Vec<(Vec<usize>, bool)>);

    fn arb_layout() -> impl Strategy<Value = Layout> {
        (1usize..8).prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec((0..n, 0..n, 0u32..5_000), 0..20),
                prop::collection::vec((prop::collection::vec(0..n, 1..6), any::<bool>()), 0..4),
            )
        })
    }

    /// Build the catalogue, inserting stops in reverse when `reversed` so
    /// handles differ between the two catalogues.
    fn catalogue((n, distances, buses): &Layout, reversed: bool) -> Catalogue {
        let mut cat = Catalogue::new();
        let mut order: Vec<usize> = (0..*n).collect();
        if reversed {
            order.reverse();
        }
        for i in order {
            cat.add_stop(&format!("S{i}"), Coordinates::new(0.0, i as f64 * 0.01).unwrap());
        }

        let id = |cat: &Catalogue, i: usize| cat.stop_id(&format!("S{i}")).unwrap();
        for &(from, to, d) in distances {
            let (from, to) = (id(&cat, from), id(&cat, to));
            cat.set_distance(from, to, d);
        }
        for (k, (stops, roundtrip)) in buses.iter().enumerate() {
            let names: Vec<String> = stops.iter().map(|i| format!("S{i}")).collect();
            cat.add_bus(&format!("B{k}"), &names, *roundtrip).unwrap();
        }
        cat
    }

    fn edge_multiset(graph: &DirectedWeightedGraph) -> Vec<(String, usize, u64)> {
        let mut edges: Vec<_> = graph
            .edges()
            .map(|e| (e.name.clone(), e.span_count, e.weight.to_bits()))
            .collect();
        edges.sort();
        edges
    }

    proptest! {
        /// Building twice, or from the same data with different handles,
        /// gives the same vertex count and edge multiset
        #[test]
        fn rebuild_gives_isomorphic_graph(
            layout in arb_layout(),
            wait in 0u32..30,
            velocity in 1.0f64..100.0,
        ) {
            let settings = RoutingSettings::new(wait, velocity).unwrap();
            let cat = catalogue(&layout, false);

            let first = GraphBuilder::new(&cat, &settings).build();
            let second = GraphBuilder::new(&cat, &settings).build();
            prop_assert_eq!(first.graph.vertex_count(), second.graph.vertex_count());
            prop_assert_eq!(edge_multiset(&first.graph), edge_multiset(&second.graph));

            let relabelled = catalogue(&layout, true);
            let third = GraphBuilder::new(&relabelled, &settings).build();
            prop_assert_eq!(first.graph.vertex_count(), third.graph.vertex_count());
            prop_assert_eq!(edge_multiset(&first.graph), edge_multiset(&third.graph));
        }
    }
}
