//! Transit catalogue: stops, buses and road distances.
//!
//! The catalogue owns every stop and bus record. Records live in
//! append-only tables and are addressed by [`StopId`] / [`BusId`] handles,
//! so a handle stays valid no matter how many records are added later.
//! Road distances are directional: the distance from A to B may differ
//! from the distance from B to A.

mod error;
mod stat;

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::domain::{Bus, BusId, Coordinates, Stop, StopId, compute_distance};

pub use error::CatalogueError;
pub use stat::BusStat;

/// Store of stops, buses and the directed distance table.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    stops: Vec<Stop>,
    stop_index: HashMap<String, StopId>,
    buses: Vec<Bus>,
    bus_index: HashMap<String, BusId>,
    distances: HashMap<(StopId, StopId), u32>,
}

impl Catalogue {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stop, or move an existing stop of the same name.
    ///
    /// Redefining a stop keeps its handle and the set of buses serving it.
    pub fn add_stop(&mut self, name: &str, coordinates: Coordinates) -> StopId {
        if let Some(&id) = self.stop_index.get(name) {
            self.stops[id.0].coordinates = coordinates;
            debug!(stop = name, "redefined stop coordinates");
            return id;
        }

        let id = StopId(self.stops.len());
        self.stops.push(Stop::new(id, name, coordinates));
        self.stop_index.insert(name.to_string(), id);
        id
    }

    /// Look up a stop by name.
    pub fn get_stop(&self, name: &str) -> Option<&Stop> {
        self.stop_index.get(name).map(|id| &self.stops[id.0])
    }

    /// Look up a stop by handle.
    pub fn stop(&self, id: StopId) -> Option<&Stop> {
        self.stops.get(id.0)
    }

    /// Resolve a stop name to its handle.
    pub fn stop_id(&self, name: &str) -> Option<StopId> {
        self.stop_index.get(name).copied()
    }

    /// Add a bus, or redefine an existing bus of the same name.
    ///
    /// Every stop must already be in the catalogue. Each stop on the route
    /// records the bus in its serving set; on redefinition, stops dropped
    /// from the route forget the bus.
    pub fn add_bus<S: AsRef<str>>(
        &mut self,
        name: &str,
        stop_names: &[S],
        is_roundtrip: bool,
    ) -> Result<BusId, CatalogueError> {
        let stops = stop_names
            .iter()
            .map(|s| {
                self.stop_id(s.as_ref())
                    .ok_or_else(|| CatalogueError::StopNotFound(s.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let id = match self.bus_index.get(name) {
            Some(&id) => {
                let old_stops = std::mem::take(&mut self.buses[id.0].stops);
                for stop in old_stops {
                    if !stops.contains(&stop) {
                        self.stops[stop.0].buses.remove(name);
                    }
                }
                let bus = &mut self.buses[id.0];
                bus.stops = stops;
                bus.is_roundtrip = is_roundtrip;
                debug!(bus = name, "redefined bus");
                id
            }
            None => {
                let id = BusId(self.buses.len());
                self.buses.push(Bus::new(id, name, stops, is_roundtrip));
                self.bus_index.insert(name.to_string(), id);
                id
            }
        };

        for &stop in &self.buses[id.0].stops {
            self.stops[stop.0].buses.insert(name.to_string());
        }

        Ok(id)
    }

    /// Look up a bus by name.
    pub fn get_bus(&self, name: &str) -> Option<&Bus> {
        self.bus_index.get(name).map(|id| &self.buses[id.0])
    }

    /// Look up a bus by handle.
    pub fn bus(&self, id: BusId) -> Option<&Bus> {
        self.buses.get(id.0)
    }

    /// Insert a stop into a bus route at `position`.
    ///
    /// Returns `false` and leaves the catalogue untouched when the bus or
    /// the stop is unknown, or when `position` is past the end of the route.
    pub fn update_bus_stops(&mut self, bus_name: &str, stop_name: &str, position: usize) -> bool {
        let (Some(&bus_id), Some(stop_id)) = (self.bus_index.get(bus_name), self.stop_id(stop_name))
        else {
            warn!(bus = bus_name, stop = stop_name, "ignoring patch of unknown bus or stop");
            return false;
        };

        let bus = &mut self.buses[bus_id.0];
        if position > bus.stops.len() {
            warn!(
                bus = bus_name,
                position,
                len = bus.stops.len(),
                "ignoring patch past the end of the route"
            );
            return false;
        }

        bus.stops.insert(position, stop_id);
        self.stops[stop_id.0].buses.insert(bus_name.to_string());
        true
    }

    /// Change whether a bus is a roundtrip. Returns `false` if the bus is unknown.
    pub fn set_roundtrip(&mut self, bus_name: &str, is_roundtrip: bool) -> bool {
        match self.bus_index.get(bus_name) {
            Some(&id) => {
                self.buses[id.0].is_roundtrip = is_roundtrip;
                true
            }
            None => {
                warn!(bus = bus_name, "ignoring roundtrip change of unknown bus");
                false
            }
        }
    }

    /// Set the road distance from one stop to another, in meters.
    pub fn set_distance(&mut self, from: StopId, to: StopId, meters: u32) {
        self.distances.insert((from, to), meters);
    }

    /// Road distance from one stop to another, in meters.
    ///
    /// Falls back to the reverse direction when only that one is known,
    /// and to zero when neither is.
    pub fn get_distance(&self, from: StopId, to: StopId) -> u32 {
        self.distances
            .get(&(from, to))
            .or_else(|| self.distances.get(&(to, from)))
            .copied()
            .unwrap_or(0)
    }

    /// Compute statistics for the named bus.
    pub fn bus_stat(&self, bus_name: &str) -> Result<BusStat, CatalogueError> {
        let bus = self
            .get_bus(bus_name)
            .ok_or_else(|| CatalogueError::BusNotFound(bus_name.to_string()))?;

        let traversal: Vec<StopId> = bus.traversal().collect();
        let mut route_length = 0u64;
        let mut geo_length = 0.0;

        for hop in traversal.windows(2) {
            let (from, to) = (hop[0], hop[1]);
            route_length += u64::from(self.get_distance(from, to));
            geo_length += compute_distance(
                self.stops[from.0].coordinates,
                self.stops[to.0].coordinates,
            );
        }

        Ok(BusStat {
            total_stops: bus.total_stops(),
            unique_stops: bus.unique_stops(),
            route_length,
            curvature: BusStat::curvature(route_length, geo_length),
        })
    }

    /// All stops, ordered by name.
    pub fn all_stops(&self) -> BTreeMap<&str, &Stop> {
        self.stops.iter().map(|s| (s.name.as_str(), s)).collect()
    }

    /// All buses, ordered by name.
    pub fn all_buses(&self) -> BTreeMap<&str, &Bus> {
        self.buses.iter().map(|b| (b.name.as_str(), b)).collect()
    }

    /// Number of stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Number of buses.
    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }

    /// Number of explicitly set directed distances.
    pub fn distance_count(&self) -> usize {
        self.distances.len()
    }

    /// Returns true if the catalogue holds no stops and no buses.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty() && self.buses.is_empty()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn two_stops() -> (Catalogue, StopId, StopId) {
        let mut cat = Catalogue::new();
        let a = cat.add_stop("A", Coordinates::new(0.0, 0.0).unwrap());
        let b = cat.add_stop("B", Coordinates::new(0.0, 0.01).unwrap());
        (cat, a, b)
    }

    proptest! {
        /// With only one direction set, both directions read it
        #[test]
        fn one_direction_falls_back(d in 0u32..1_000_000) {
            let (mut cat, a, b) = two_stops();
            cat.set_distance(a, b, d);
            prop_assert_eq!(cat.get_distance(a, b), d);
            prop_assert_eq!(cat.get_distance(b, a), d);
        }

        /// With both directions set, each reads its own value
        #[test]
        fn both_directions_independent(d1 in 0u32..1_000_000, d2 in 0u32..1_000_000) {
            let (mut cat, a, b) = two_stops();
            cat.set_distance(a, b, d1);
            cat.set_distance(b, a, d2);
            prop_assert_eq!(cat.get_distance(a, b), d1);
            prop_assert_eq!(cat.get_distance(b, a), d2);
        }

        /// Road distance at least the straight line gives curvature >= 1
        #[test]
        fn curvature_at_least_one(extra in 0u32..10_000, roundtrip in any::<bool>()) {
            let (mut cat, a, b) = two_stops();
            let straight = compute_distance(
                cat.stop(a).unwrap().coordinates,
                cat.stop(b).unwrap().coordinates,
            );
            let road = straight.ceil() as u32 + extra;
            cat.set_distance(a, b, road);
            cat.add_bus("p", &["A", "B"], roundtrip).unwrap();
            prop_assert!(cat.bus_stat("p").unwrap().curvature >= 1.0);
        }
    }
}
