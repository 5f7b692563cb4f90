//! Aggregate statistics for a single bus route.

/// Derived figures for one bus, computed on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BusStat {
    /// Stops visited along the full traversal.
    pub total_stops: usize,

    /// Distinct stops on the route.
    pub unique_stops: usize,

    /// Road length of the full traversal, in meters.
    pub route_length: u64,

    /// Road length divided by straight-line length.
    ///
    /// Reported as 1.0 when the straight-line length is zero.
    pub curvature: f64,
}

impl BusStat {
    /// Compute the curvature for a road length and a geographic length.
    pub(crate) fn curvature(route_length: u64, geo_length: f64) -> f64 {
        if geo_length > 0.0 {
            route_length as f64 / geo_length
        } else {
            1.0
        }
    }
}
