//! Routing configuration.

/// Errors in routing configuration. Any of these aborts a graph build.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoutingError {
    /// A required setting was not supplied
    #[error("missing routing setting: {0}")]
    MissingSetting(&'static str),

    /// Bus velocity must be finite and strictly positive
    #[error("invalid bus velocity {0}: must be a positive number of km/h")]
    InvalidVelocity(f64),

    /// Wait time must be a non-negative number of minutes
    #[error("invalid bus wait time {0}: must be a non-negative number of minutes")]
    InvalidWaitTime(i64),
}

/// Validated parameters for building the routing graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingSettings {
    /// Minutes spent waiting at a stop before boarding.
    bus_wait_time: u32,

    /// Bus speed in km/h.
    bus_velocity: f64,
}

impl RoutingSettings {
    /// Create settings, rejecting a velocity that is not strictly positive.
    pub fn new(bus_wait_time: u32, bus_velocity: f64) -> Result<Self, RoutingError> {
        if !bus_velocity.is_finite() || bus_velocity <= 0.0 {
            return Err(RoutingError::InvalidVelocity(bus_velocity));
        }
        Ok(Self {
            bus_wait_time,
            bus_velocity,
        })
    }

    /// Create settings from raw, possibly absent values.
    pub fn from_parts(
        bus_wait_time: Option<i64>,
        bus_velocity: Option<f64>,
    ) -> Result<Self, RoutingError> {
        let wait = bus_wait_time.ok_or(RoutingError::MissingSetting("bus_wait_time"))?;
        let velocity = bus_velocity.ok_or(RoutingError::MissingSetting("bus_velocity"))?;
        let wait = u32::try_from(wait).map_err(|_| RoutingError::InvalidWaitTime(wait))?;
        Self::new(wait, velocity)
    }

    /// Minutes waited at a stop before boarding.
    pub fn bus_wait_time(&self) -> u32 {
        self.bus_wait_time
    }

    /// Bus speed in km/h.
    pub fn bus_velocity(&self) -> f64 {
        self.bus_velocity
    }

    /// Bus speed converted to meters per minute.
    pub fn velocity_meters_per_minute(&self) -> f64 {
        self.bus_velocity * 1000.0 / 60.0
    }

    /// Minutes needed to cover `meters` at bus speed.
    pub fn travel_minutes(&self, meters: u64) -> f64 {
        meters as f64 / self.velocity_meters_per_minute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_settings() {
        let settings = RoutingSettings::new(6, 40.0).unwrap();
        assert_eq!(settings.bus_wait_time(), 6);
        assert_eq!(settings.bus_velocity(), 40.0);
    }

    #[test]
    fn velocity_conversion() {
        let settings = RoutingSettings::new(6, 60.0).unwrap();
        assert_eq!(settings.velocity_meters_per_minute(), 1000.0);
        assert_eq!(settings.travel_minutes(2100), 2.1);

        let settings = RoutingSettings::new(0, 30.0).unwrap();
        assert_eq!(settings.velocity_meters_per_minute(), 500.0);
        assert_eq!(settings.travel_minutes(700), 1.4);
    }

    #[test]
    fn rejects_non_positive_velocity() {
        assert_eq!(
            RoutingSettings::new(6, 0.0),
            Err(RoutingError::InvalidVelocity(0.0))
        );
        assert_eq!(
            RoutingSettings::new(6, -5.0),
            Err(RoutingError::InvalidVelocity(-5.0))
        );
        assert!(RoutingSettings::new(6, f64::INFINITY).is_err());
        assert!(RoutingSettings::new(6, f64::NAN).is_err());
    }

    #[test]
    fn from_parts_reports_missing_fields() {
        assert_eq!(
            RoutingSettings::from_parts(None, Some(40.0)),
            Err(RoutingError::MissingSetting("bus_wait_time"))
        );
        assert_eq!(
            RoutingSettings::from_parts(Some(6), None),
            Err(RoutingError::MissingSetting("bus_velocity"))
        );
        assert_eq!(
            RoutingSettings::from_parts(Some(-1), Some(40.0)),
            Err(RoutingError::InvalidWaitTime(-1))
        );
        assert!(RoutingSettings::from_parts(Some(6), Some(40.0)).is_ok());
    }

    #[test]
    fn error_display() {
        let err = RoutingError::MissingSetting("bus_velocity");
        assert_eq!(err.to_string(), "missing routing setting: bus_velocity");

        let err = RoutingError::InvalidVelocity(0.0);
        assert_eq!(
            err.to_string(),
            "invalid bus velocity 0: must be a positive number of km/h"
        );
    }
}
