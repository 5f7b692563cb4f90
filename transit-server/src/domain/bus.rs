//! Bus routes and their stable handles.

use std::collections::HashSet;
use std::fmt;

use super::StopId;

/// Stable handle of a bus inside a catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BusId(pub usize);

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bus#{}", self.0)
    }
}

/// A named, ordered sequence of stops.
///
/// A roundtrip bus runs its stop list once. Any other bus runs the list
/// forward and then back again, so the last stop is visited only once at
/// the turnaround.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bus {
    /// Handle of this bus in its catalogue.
    pub id: BusId,

    /// Unique route identifier, e.g. "297".
    pub name: String,

    /// Stops in route order.
    pub stops: Vec<StopId>,

    pub is_roundtrip: bool,
}

impl Bus {
    pub fn new(id: BusId, name: impl Into<String>, stops: Vec<StopId>, is_roundtrip: bool) -> Self {
        Self {
            id,
            name: name.into(),
            stops,
            is_roundtrip,
        }
    }

    /// Number of stops visited along the full traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::{Bus, BusId, StopId};
    ///
    /// let stops = vec![StopId(0), StopId(1), StopId(2)];
    /// assert_eq!(Bus::new(BusId(0), "1", stops.clone(), true).total_stops(), 3);
    /// assert_eq!(Bus::new(BusId(0), "1", stops, false).total_stops(), 5);
    /// ```
    pub fn total_stops(&self) -> usize {
        match (self.is_roundtrip, self.stops.len()) {
            (_, 0) => 0,
            (true, n) => n,
            (false, n) => 2 * n - 1,
        }
    }

    /// Number of distinct stops on the route.
    pub fn unique_stops(&self) -> usize {
        self.stops.iter().collect::<HashSet<_>>().len()
    }

    /// The full traversal in visiting order.
    ///
    /// For a non-roundtrip bus this is the stop list followed by its reverse,
    /// without repeating the turnaround stop.
    pub fn traversal(&self) -> impl Iterator<Item = StopId> + '_ {
        let back: &[StopId] = match (self.is_roundtrip, self.stops.split_last()) {
            (false, Some((_, rest))) => rest,
            _ => &[],
        };
        self.stops.iter().chain(back.iter().rev()).copied()
    }
}
