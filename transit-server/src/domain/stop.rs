//! Stop records and their stable handles.

use std::collections::BTreeSet;
use std::fmt;

use super::Coordinates;

/// Stable handle of a stop inside a catalogue.
///
/// Handles are assigned in insertion order and never reused, so they stay
/// valid for the lifetime of the catalogue that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StopId(pub usize);

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stop#{}", self.0)
    }
}

/// A named point where passengers board and alight.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Handle of this stop in its catalogue.
    pub id: StopId,

    /// Unique stop name.
    pub name: String,

    pub coordinates: Coordinates,

    /// Names of the buses serving this stop, kept sorted.
    pub buses: BTreeSet<String>,
}

impl Stop {
    /// Create a stop that no bus serves yet.
    pub fn new(id: StopId, name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            id,
            name: name.into(),
            coordinates,
            buses: BTreeSet::new(),
        }
    }

    /// Whether the named bus calls at this stop.
    pub fn is_served_by(&self, bus: &str) -> bool {
        self.buses.contains(bus)
    }
}
