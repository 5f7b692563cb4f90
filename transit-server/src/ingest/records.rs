//! Ingestion records, as handed over by the request decoding layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::routing::{RoutingError, RoutingSettings};

/// A stop definition with optional road distances to other stops.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StopRecord {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,

    /// Meters from this stop to each named stop.
    #[serde(default)]
    pub road_distances: BTreeMap<String, u32>,
}

/// A bus definition.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BusRecord {
    pub name: String,

    /// Stop names in route order.
    pub stops: Vec<String>,

    pub is_roundtrip: bool,
}

/// One entry of `base_requests`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop(StopRecord),
    Bus(BusRecord),
}

/// Routing settings as received; absent fields are reported, not defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct RoutingSettingsRecord {
    pub bus_wait_time: Option<i64>,
    pub bus_velocity: Option<f64>,
}

impl TryFrom<RoutingSettingsRecord> for RoutingSettings {
    type Error = RoutingError;

    fn try_from(record: RoutingSettingsRecord) -> Result<Self, Self::Error> {
        RoutingSettings::from_parts(record.bus_wait_time, record.bus_velocity)
    }
}

/// A full dataset: records plus the settings to route with.
///
/// Other top-level keys, such as rendering settings, are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoadDocument {
    #[serde(default)]
    pub base_requests: Vec<BaseRequest>,

    pub routing_settings: Option<RoutingSettingsRecord>,
}

impl LoadDocument {
    /// Validated routing settings of this document.
    pub fn routing_settings(&self) -> Result<RoutingSettings, RoutingError> {
        self.routing_settings
            .ok_or(RoutingError::MissingSetting("routing_settings"))?
            .try_into()
    }
}

/// Additional records for an already loaded dataset.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MutationDocument {
    pub base_requests: Vec<BaseRequest>,
}

/// Insert a stop into a route.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StopInsert {
    pub stop: String,
    pub position: usize,
}

/// A change to an existing bus.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BusPatch {
    /// Name of the bus to change.
    pub name: String,

    #[serde(default)]
    pub insert: Option<StopInsert>,

    #[serde(default)]
    pub is_roundtrip: Option<bool>,
}
