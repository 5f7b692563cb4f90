//! Routing over the transit network.
//!
//! A catalogue snapshot is turned into a directed graph whose edges are
//! either waits at a stop or bus rides across one or more hops. Queries
//! minimise total elapsed minutes with a shortest-path search.

mod builder;
mod graph;
mod router;
mod settings;
mod solver;

pub use builder::{BuiltGraph, GraphBuilder, VertexPair};
pub use graph::{DirectedWeightedGraph, Edge, EdgeId, VertexId};
pub use router::{Itinerary, ItineraryItem, TransportRouter};
pub use settings::{RoutingError, RoutingSettings};
pub use solver::{DEFAULT_TREE_CACHE, PathSolver, RouteInfo};
