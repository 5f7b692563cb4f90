//! Single-pair shortest paths over a static graph.
//!
//! Runs Dijkstra's algorithm from the source vertex and keeps the resulting
//! shortest-path tree in a cache, so later queries from the same source only
//! walk the predecessor chain. All edge weights must be non-negative.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::Arc;

use moka::sync::Cache;
use tracing::trace;

use super::graph::{DirectedWeightedGraph, EdgeId, VertexId};

/// Default number of cached shortest-path trees per solver.
pub const DEFAULT_TREE_CACHE: u64 = 1024;

/// A path found by the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
    /// Sum of the edge weights.
    pub weight: f64,

    /// Edges from source to target, in travel order.
    pub edges: Vec<EdgeId>,
}

/// Distances and predecessor edges from one source vertex.
#[derive(Debug)]
struct ShortestPathTree {
    dist: Vec<Option<f64>>,
    prev_edge: Vec<Option<EdgeId>>,
}

/// Heap entry, ordered so that `BinaryHeap` pops the smallest cost first.
#[derive(Clone, Copy, PartialEq)]
struct State {
    cost: f64,
    vertex: VertexId,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on cost for a min-heap; ties go to the lower vertex id
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest-path engine owning the graph it answers for.
pub struct PathSolver {
    graph: DirectedWeightedGraph,
    trees: Cache<VertexId, Arc<ShortestPathTree>>,
}

impl PathSolver {
    /// Create a solver with the default tree cache size.
    pub fn new(graph: DirectedWeightedGraph) -> Self {
        Self::with_cache_capacity(graph, DEFAULT_TREE_CACHE)
    }

    /// Create a solver caching at most `capacity` shortest-path trees.
    pub fn with_cache_capacity(graph: DirectedWeightedGraph, capacity: u64) -> Self {
        Self {
            graph,
            trees: Cache::new(capacity),
        }
    }

    /// The graph this solver answers for.
    pub fn graph(&self) -> &DirectedWeightedGraph {
        &self.graph
    }

    /// Find a minimum-weight path from `from` to `to`.
    ///
    /// Returns `None` if either vertex is out of range or `to` is unreachable.
    /// A path from a vertex to itself is empty with zero weight. Among equal
    /// weight paths the choice is fixed for a given graph.
    pub fn find_path(&self, from: VertexId, to: VertexId) -> Option<RouteInfo> {
        let vertex_count = self.graph.vertex_count();
        if from >= vertex_count || to >= vertex_count {
            return None;
        }

        let tree = self.trees.get_with(from, || {
            trace!(source = from, "computing shortest-path tree");
            Arc::new(self.compute_tree(from))
        });

        let weight = tree.dist[to]?;
        let mut edges = Vec::new();
        let mut vertex = to;
        while vertex != from {
            let edge_id = tree.prev_edge[vertex]?;
            edges.push(edge_id);
            vertex = self.graph.edge(edge_id)?.from;
        }
        edges.reverse();

        Some(RouteInfo { weight, edges })
    }

    fn compute_tree(&self, source: VertexId) -> ShortestPathTree {
        let vertex_count = self.graph.vertex_count();
        let mut dist: Vec<Option<f64>> = vec![None; vertex_count];
        let mut prev_edge: Vec<Option<EdgeId>> = vec![None; vertex_count];
        let mut heap = BinaryHeap::new();

        dist[source] = Some(0.0);
        heap.push(State {
            cost: 0.0,
            vertex: source,
        });

        while let Some(State { cost, vertex }) = heap.pop() {
            // Stale entry: a shorter path was settled after this was pushed
            if dist[vertex].is_some_and(|best| cost > best) {
                continue;
            }

            for &edge_id in self.graph.incident_edges(vertex) {
                let Some(edge) = self.graph.edge(edge_id) else {
                    continue;
                };
                let next = cost + edge.weight;
                if dist[edge.to].is_none_or(|best| next < best) {
                    dist[edge.to] = Some(next);
                    prev_edge[edge.to] = Some(edge_id);
                    heap.push(State {
                        cost: next,
                        vertex: edge.to,
                    });
                }
            }
        }

        ShortestPathTree { dist, prev_edge }
    }
}

impl fmt::Debug for PathSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathSolver")
            .field("vertices", &self.graph.vertex_count())
            .field("edges", &self.graph.edge_count())
            .field("cached_trees", &self.trees.entry_count())
            .finish()
    }
}
