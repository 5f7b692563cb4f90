//! Applying ingestion records to a catalogue.
//!
//! A batch is validated as a whole before anything is written, so a
//! rejected batch leaves the catalogue untouched. Records are then applied
//! in three passes: stops, road distances, buses. Distances and buses may
//! therefore name stops defined later in the same batch.

use std::collections::HashSet;

use tracing::debug;

use crate::catalogue::Catalogue;
use crate::domain::Coordinates;

use super::error::IngestError;
use super::records::{BaseRequest, BusPatch, BusRecord, StopRecord};

/// Counts of what a batch added or redefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestSummary {
    pub stops: usize,
    pub distances: usize,
    pub buses: usize,
}

/// Apply a batch of stop and bus records.
pub fn apply_base_requests(
    catalogue: &mut Catalogue,
    requests: &[BaseRequest],
) -> Result<IngestSummary, IngestError> {
    let stops: Vec<&StopRecord> = requests
        .iter()
        .filter_map(|r| match r {
            BaseRequest::Stop(stop) => Some(stop),
            BaseRequest::Bus(_) => None,
        })
        .collect();
    let buses: Vec<&BusRecord> = requests
        .iter()
        .filter_map(|r| match r {
            BaseRequest::Bus(bus) => Some(bus),
            BaseRequest::Stop(_) => None,
        })
        .collect();

    let coordinates = validate(catalogue, &stops, &buses)?;
    let mut summary = IngestSummary::default();

    for (stop, coords) in stops.iter().zip(coordinates) {
        catalogue.add_stop(&stop.name, coords);
        summary.stops += 1;
    }

    for stop in &stops {
        for (to, &meters) in &stop.road_distances {
            let (Some(from_id), Some(to_id)) = (catalogue.stop_id(&stop.name), catalogue.stop_id(to))
            else {
                continue;
            };
            catalogue.set_distance(from_id, to_id, meters);
            summary.distances += 1;
        }
    }

    for bus in &buses {
        catalogue.add_bus(&bus.name, &bus.stops, bus.is_roundtrip)?;
        summary.buses += 1;
    }

    debug!(
        stops = summary.stops,
        distances = summary.distances,
        buses = summary.buses,
        "applied base requests"
    );
    Ok(summary)
}

/// Check a batch against the catalogue, returning the parsed stop coordinates.
fn validate(
    catalogue: &Catalogue,
    stops: &[&StopRecord],
    buses: &[&BusRecord],
) -> Result<Vec<Coordinates>, IngestError> {
    let batch_stops: HashSet<&str> = stops.iter().map(|s| s.name.as_str()).collect();
    let known = |name: &str| batch_stops.contains(name) || catalogue.get_stop(name).is_some();

    let mut coordinates = Vec::with_capacity(stops.len());
    for stop in stops {
        if stop.name.is_empty() {
            return Err(IngestError::Malformed("stop name is empty".to_string()));
        }
        let coords = Coordinates::new(stop.latitude, stop.longitude)
            .map_err(|e| IngestError::Malformed(format!("stop {}: {e}", stop.name)))?;
        coordinates.push(coords);

        if let Some(missing) = stop.road_distances.keys().find(|to| !known(to.as_str())) {
            return Err(IngestError::UnknownStop {
                referenced_by: format!("stop {}", stop.name),
                stop: missing.clone(),
            });
        }
    }

    for bus in buses {
        if bus.name.is_empty() {
            return Err(IngestError::Malformed("bus name is empty".to_string()));
        }
        if bus.stops.is_empty() {
            return Err(IngestError::Malformed(format!("bus {} has no stops", bus.name)));
        }
        if let Some(missing) = bus.stops.iter().find(|s| !known(s.as_str())) {
            return Err(IngestError::UnknownStop {
                referenced_by: format!("bus {}", bus.name),
                stop: missing.clone(),
            });
        }
    }

    Ok(coordinates)
}

/// Apply a patch to an existing bus.
///
/// Unlike the catalogue primitives, which ignore bad input, this reports
/// exactly what was wrong with the patch.
pub fn apply_patch(catalogue: &mut Catalogue, patch: &BusPatch) -> Result<(), IngestError> {
    if patch.insert.is_none() && patch.is_roundtrip.is_none() {
        return Err(IngestError::Malformed(format!(
            "patch for bus {} changes nothing",
            patch.name
        )));
    }

    let bus = catalogue
        .get_bus(&patch.name)
        .ok_or_else(|| IngestError::UnknownBus(patch.name.clone()))?;

    if let Some(insert) = &patch.insert {
        if catalogue.get_stop(&insert.stop).is_none() {
            return Err(IngestError::UnknownStop {
                referenced_by: format!("patch of bus {}", patch.name),
                stop: insert.stop.clone(),
            });
        }
        if insert.position > bus.stops.len() {
            return Err(IngestError::PositionOutOfRange {
                bus: patch.name.clone(),
                position: insert.position,
                len: bus.stops.len(),
            });
        }
        catalogue.update_bus_stops(&patch.name, &insert.stop, insert.position);
    }

    if let Some(is_roundtrip) = patch.is_roundtrip {
        catalogue.set_roundtrip(&patch.name, is_roundtrip);
    }

    Ok(())
}
