//! Directed weighted graph with named edges.
//!
//! Vertices are numbered from zero up to the vertex count given at
//! construction. Edges are numbered in insertion order.

/// Index of a vertex.
pub type VertexId = usize;

/// Index of an edge, in insertion order.
pub type EdgeId = usize;

/// A weighted edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Stop name for a wait edge, bus name for a ride edge.
    pub name: String,

    /// Number of stop-to-stop hops covered; zero for a wait edge.
    pub span_count: usize,

    pub from: VertexId,
    pub to: VertexId,

    /// Travel or waiting time in minutes.
    pub weight: f64,
}

impl Edge {
    /// Whether this edge models waiting at a stop rather than riding.
    pub fn is_wait(&self) -> bool {
        self.span_count == 0
    }
}

/// Adjacency-list graph. Memory is linear in vertices plus edges.
#[derive(Debug, Clone, Default)]
pub struct DirectedWeightedGraph {
    edges: Vec<Edge>,
    incidence: Vec<Vec<EdgeId>>,
}

impl DirectedWeightedGraph {
    /// Create a graph with `vertex_count` vertices and no edges.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            edges: Vec::new(),
            incidence: vec![Vec::new(); vertex_count],
        }
    }

    /// Add an edge and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `edge.from` is not a vertex of this graph.
    pub fn add_edge(&mut self, edge: Edge) -> EdgeId {
        debug_assert!(edge.to < self.incidence.len(), "edge target out of range");
        debug_assert!(edge.weight >= 0.0, "negative edge weight");

        let id = self.edges.len();
        self.incidence[edge.from].push(id);
        self.edges.push(edge);
        id
    }

    pub fn vertex_count(&self) -> usize {
        self.incidence.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up an edge by id.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Ids of the edges leaving `vertex`, in insertion order.
    pub fn incident_edges(&self, vertex: VertexId) -> &[EdgeId] {
        self.incidence
            .get(vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
