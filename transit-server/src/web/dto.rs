//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::catalogue::BusStat;
use crate::routing::Itinerary;
use crate::service::{LoadSummary, RouteItem, StatRequest};

/// Body of `POST /query`.
#[derive(Debug, Deserialize)]
pub struct QueryDocument {
    /// Requests answered in order
    pub stat_requests: Vec<StatRequest>,
}

/// Query string of `GET /route`.
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub from: String,
    pub to: String,
}

/// Response for a successful load.
#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub status: &'static str,
    pub stops: usize,
    pub buses: usize,

    /// Vertices in the routing graph, two per stop
    pub vertices: usize,

    /// Wait and ride edges in the routing graph
    pub edges: usize,
}

impl From<LoadSummary> for LoadResponse {
    fn from(summary: LoadSummary) -> Self {
        Self {
            status: "ok",
            stops: summary.stops,
            buses: summary.buses,
            vertices: summary.vertices,
            edges: summary.edges,
        }
    }
}

/// Response for a successful mutation.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Buses serving a stop.
#[derive(Debug, Serialize)]
pub struct StopResponse {
    /// Bus names, sorted
    pub buses: Vec<String>,
}

/// Statistics of a bus.
#[derive(Debug, Serialize)]
pub struct BusResponse {
    pub curvature: f64,

    /// Road length in meters
    pub route_length: u64,

    pub stop_count: usize,
    pub unique_stop_count: usize,
}

impl From<BusStat> for BusResponse {
    fn from(stat: BusStat) -> Self {
        Self {
            curvature: stat.curvature,
            route_length: stat.route_length,
            stop_count: stat.total_stops,
            unique_stop_count: stat.unique_stops,
        }
    }
}

/// A fastest route between two stops.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// Total minutes
    pub total_time: f64,

    pub items: Vec<RouteItem>,
}

impl From<&Itinerary> for RouteResponse {
    fn from(itinerary: &Itinerary) -> Self {
        Self {
            total_time: itinerary.total_time,
            items: itinerary.items.iter().map(RouteItem::from).collect(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::ItineraryItem;
    use serde_json::json;

    #[test]
    fn query_document_parses() {
        let doc: QueryDocument = serde_json::from_value(json!({
            "stat_requests": [
                {"type": "Stop", "id": 1, "name": "A"},
                {"type": "Route", "id": 2, "from": "A", "to": "B"}
            ]
        }))
        .unwrap();
        assert_eq!(doc.stat_requests.len(), 2);
    }

    #[test]
    fn bus_response_renames_counts() {
        let stat = BusStat {
            total_stops: 5,
            unique_stops: 3,
            route_length: 5950,
            curvature: 1.36,
        };
        assert_eq!(
            serde_json::to_value(BusResponse::from(stat)).unwrap(),
            json!({
                "curvature": 1.36,
                "route_length": 5950,
                "stop_count": 5,
                "unique_stop_count": 3
            })
        );
    }

    #[test]
    fn route_response_tags_items() {
        let itinerary = Itinerary {
            total_time: 7.5,
            items: vec![
                ItineraryItem::Wait {
                    stop_name: "A".into(),
                    time: 6.0,
                },
                ItineraryItem::Bus {
                    bus: "1".into(),
                    span_count: 2,
                    time: 1.5,
                },
            ],
        };
        assert_eq!(
            serde_json::to_value(RouteResponse::from(&itinerary)).unwrap(),
            json!({
                "total_time": 7.5,
                "items": [
                    {"type": "Wait", "stop_name": "A", "time": 6.0},
                    {"type": "Bus", "bus": "1", "span_count": 2, "time": 1.5}
                ]
            })
        );
    }
}
