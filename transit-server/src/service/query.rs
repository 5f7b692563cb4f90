//! Batched stat requests and their responses.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::catalogue::BusStat;
use crate::routing::{Itinerary, ItineraryItem};

use super::snapshot::Snapshot;

/// Message used for every failed request in a batch.
pub const NOT_FOUND: &str = "not found";

/// One query of a batch, tagged by `"type"`.
///
/// Types other than `Stop`, `Bus` and `Route` (such as `Map`) parse as
/// [`StatRequest::Unsupported`] so the rest of the batch is still answered.
#[derive(Debug, Clone, PartialEq)]
pub enum StatRequest {
    Stop { id: i64, name: String },
    Bus { id: i64, name: String },
    Route { id: i64, from: String, to: String },
    Unsupported { id: i64, kind: String },
}

impl StatRequest {
    pub fn id(&self) -> i64 {
        match self {
            StatRequest::Stop { id, .. }
            | StatRequest::Bus { id, .. }
            | StatRequest::Route { id, .. }
            | StatRequest::Unsupported { id, .. } => *id,
        }
    }
}

/// Wire shape of a request: a known type, or any other tagged object with an id.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireRequest {
    Known(KnownRequest),
    Other {
        id: i64,
        #[serde(rename = "type")]
        kind: String,
    },
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum KnownRequest {
    Stop { id: i64, name: String },
    Bus { id: i64, name: String },
    Route { id: i64, from: String, to: String },
}

impl<'de> Deserialize<'de> for StatRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match WireRequest::deserialize(deserializer)? {
            WireRequest::Known(KnownRequest::Stop { id, name }) => StatRequest::Stop { id, name },
            WireRequest::Known(KnownRequest::Bus { id, name }) => StatRequest::Bus { id, name },
            WireRequest::Known(KnownRequest::Route { id, from, to }) => {
                StatRequest::Route { id, from, to }
            }
            WireRequest::Other { id, kind } => StatRequest::Unsupported { id, kind },
        })
    }
}

/// One step of a route response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum RouteItem {
    Wait {
        stop_name: String,
        time: f64,
    },
    Bus {
        bus: String,
        span_count: usize,
        time: f64,
    },
}

impl From<&ItineraryItem> for RouteItem {
    fn from(item: &ItineraryItem) -> Self {
        match item {
            ItineraryItem::Wait { stop_name, time } => RouteItem::Wait {
                stop_name: stop_name.clone(),
                time: *time,
            },
            ItineraryItem::Bus {
                bus,
                span_count,
                time,
            } => RouteItem::Bus {
                bus: bus.clone(),
                span_count: *span_count,
                time: *time,
            },
        }
    }
}

/// Answer to one [`StatRequest`], echoing its id as `request_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatResponse {
    Stop {
        request_id: i64,
        buses: Vec<String>,
    },
    Bus {
        request_id: i64,
        curvature: f64,
        route_length: u64,
        stop_count: usize,
        unique_stop_count: usize,
    },
    Route {
        request_id: i64,
        total_time: f64,
        items: Vec<RouteItem>,
    },
    Error {
        request_id: i64,
        error_message: String,
    },
}

impl StatResponse {
    pub fn bus(request_id: i64, stat: &BusStat) -> Self {
        StatResponse::Bus {
            request_id,
            curvature: stat.curvature,
            route_length: stat.route_length,
            stop_count: stat.total_stops,
            unique_stop_count: stat.unique_stops,
        }
    }

    pub fn route(request_id: i64, itinerary: &Itinerary) -> Self {
        StatResponse::Route {
            request_id,
            total_time: itinerary.total_time,
            items: itinerary.items.iter().map(RouteItem::from).collect(),
        }
    }

    pub fn not_found(request_id: i64) -> Self {
        StatResponse::Error {
            request_id,
            error_message: NOT_FOUND.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatResponse::Error { .. })
    }
}

impl Snapshot {
    /// Answer a batch of requests in order.
    ///
    /// A failed request yields an error entry and does not affect the rest.
    pub fn answer(&self, requests: &[StatRequest]) -> Vec<StatResponse> {
        requests
            .iter()
            .map(|request| {
                let id = request.id();
                let response = match request {
                    StatRequest::Stop { name, .. } => self.stop_buses(name).map(|buses| {
                        StatResponse::Stop {
                            request_id: id,
                            buses: buses.iter().cloned().collect(),
                        }
                    }),
                    StatRequest::Bus { name, .. } => {
                        self.bus_stat(name).map(|stat| StatResponse::bus(id, &stat))
                    }
                    StatRequest::Route { from, to, .. } => self
                        .route(from, to)
                        .map(|itinerary| StatResponse::route(id, &itinerary)),
                    StatRequest::Unsupported { kind, .. } => {
                        debug!(request_id = id, kind = %kind, "unsupported stat request");
                        return StatResponse::not_found(id);
                    }
                };
                response.unwrap_or_else(|e| {
                    debug!(request_id = id, error = %e, "stat request failed");
                    StatResponse::not_found(id)
                })
            })
            .collect()
    }
}
