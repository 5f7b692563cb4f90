//! Geographic coordinates and great-circle distance.

use std::fmt;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Error returned when coordinates are outside the valid range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinates ({lat}, {lng}): {reason}")]
pub struct InvalidCoordinates {
    lat: f64,
    lng: f64,
    reason: &'static str,
}

/// A point on the Earth's surface, in degrees.
///
/// # Examples
///
/// ```
/// use transit_server::domain::Coordinates;
///
/// let point = Coordinates::new(55.611087, 37.20829).unwrap();
/// assert_eq!(point.lat, 55.611087);
///
/// // Latitude must be within [-90, 90]
/// assert!(Coordinates::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create coordinates, checking that both components are finite and in range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinates> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(InvalidCoordinates {
                lat,
                lng,
                reason: "must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinates {
                lat,
                lng,
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidCoordinates {
                lat,
                lng,
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self { lat, lng })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// Great-circle distance between two points, in meters.
///
/// Uses the spherical law of cosines. Identical points are exactly zero apart.
pub fn compute_distance(from: Coordinates, to: Coordinates) -> f64 {
    if from == to {
        return 0.0;
    }

    let (lat1, lat2) = (from.lat.to_radians(), to.lat.to_radians());
    let d_lng = (from.lng - to.lng).abs().to_radians();

    // Rounding can push the cosine just past 1 for nearby points
    let cos_angle = (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * d_lng.cos()).clamp(-1.0, 1.0);

    cos_angle.acos() * EARTH_RADIUS_M
}
