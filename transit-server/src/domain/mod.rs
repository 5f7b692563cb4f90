//! Domain types for the transit catalogue.
//!
//! Stops and buses refer to each other through stable integer handles
//! issued by the catalogue, never through references into its storage.

mod bus;
mod geo;
mod stop;

pub use bus::{Bus, BusId};
pub use geo::{Coordinates, EARTH_RADIUS_M, InvalidCoordinates, compute_distance};
pub use stop::{Stop, StopId};
