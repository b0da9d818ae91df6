//! Journey requests and their validated form.

use chrono::Duration;

use crate::minutes;
use crate::network::Coord;

use super::error::PlanError;

/// A journey request as supplied by a caller. Times are in minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub start: Coord,
    pub end: Coord,
    pub max_bike_minutes: f64,
    pub station_access_time: f64,
    pub train_waiting_time: f64,
    pub line_change_time: f64,
}

impl RouteRequest {
    /// Create a request with default routing parameters.
    pub fn new(start: Coord, end: Coord) -> Self {
        Self {
            start,
            end,
            max_bike_minutes: 45.0,
            station_access_time: 2.0,
            train_waiting_time: 5.0,
            line_change_time: 5.0,
        }
    }

    pub fn with_max_bike_minutes(mut self, minutes: f64) -> Self {
        self.max_bike_minutes = minutes;
        self
    }

    pub fn with_station_access_time(mut self, minutes: f64) -> Self {
        self.station_access_time = minutes;
        self
    }

    pub fn with_train_waiting_time(mut self, minutes: f64) -> Self {
        self.train_waiting_time = minutes;
        self
    }

    pub fn with_line_change_time(mut self, minutes: f64) -> Self {
        self.line_change_time = minutes;
        self
    }

    /// Check every field before any graph work is done.
    pub fn validate(&self) -> Result<RoutingParams, PlanError> {
        self.start
            .validate()
            .map_err(|e| PlanError::InvalidInput(format!("start: {e}")))?;
        self.end
            .validate()
            .map_err(|e| PlanError::InvalidInput(format!("end: {e}")))?;

        let non_negative = |name: &str, value: f64| {
            if (0.0..=minutes::MAX_MINUTES).contains(&value) {
                Ok(minutes::from_minutes(value))
            } else {
                Err(PlanError::InvalidInput(format!(
                    "{name} must be between 0 and {} minutes (got {value})",
                    minutes::MAX_MINUTES
                )))
            }
        };

        Ok(RoutingParams {
            start: self.start,
            end: self.end,
            max_bike: non_negative("max_bike_minutes", self.max_bike_minutes)?,
            station_access: non_negative("station_access_time", self.station_access_time)?,
            train_waiting: non_negative("train_waiting_time", self.train_waiting_time)?,
            line_change: non_negative("line_change_time", self.line_change_time)?,
        })
    }
}

/// Validated request parameters used by the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingParams {
    pub start: Coord,
    pub end: Coord,
    pub max_bike: Duration,
    pub station_access: Duration,
    pub train_waiting: Duration,
    pub line_change: Duration,
}

impl RoutingParams {
    /// Buffer charged when boarding from outside the network.
    pub fn entry_buffer(&self) -> Duration {
        self.station_access + self.train_waiting
    }

    /// Buffer charged when leaving the network.
    pub fn exit_buffer(&self) -> Duration {
        self.station_access
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RouteRequest {
        RouteRequest::new(Coord::new(51.5074, -0.1278), Coord::new(51.4994, -0.1270))
    }

    #[test]
    fn defaults() {
        let r = request();
        assert_eq!(r.max_bike_minutes, 45.0);
        assert_eq!(r.station_access_time, 2.0);
        assert_eq!(r.train_waiting_time, 5.0);
        assert_eq!(r.line_change_time, 5.0);
    }

    #[test]
    fn validates_to_durations() {
        let params = request().with_line_change_time(2.5).validate().unwrap();
        assert_eq!(params.max_bike, Duration::minutes(45));
        assert_eq!(params.line_change, Duration::seconds(150));
        assert_eq!(params.entry_buffer(), Duration::minutes(7));
        assert_eq!(params.exit_buffer(), Duration::minutes(2));
    }

    #[test]
    fn rejects_bad_numbers() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                request().with_max_bike_minutes(bad).validate(),
                Err(PlanError::InvalidInput(_))
            ));
            assert!(request().with_station_access_time(bad).validate().is_err());
            assert!(request().with_train_waiting_time(bad).validate().is_err());
            assert!(request().with_line_change_time(bad).validate().is_err());
        }
    }

    #[test]
    fn rejects_durations_longer_than_a_day() {
        for huge in [1e300, f64::MAX, minutes::MAX_MINUTES + 0.5] {
            assert!(matches!(
                request().with_station_access_time(huge).validate(),
                Err(PlanError::InvalidInput(_))
            ));
            assert!(request().with_max_bike_minutes(huge).validate().is_err());
            assert!(request().with_train_waiting_time(huge).validate().is_err());
            assert!(request().with_line_change_time(huge).validate().is_err());
        }

        let params = request()
            .with_station_access_time(minutes::MAX_MINUTES)
            .with_train_waiting_time(minutes::MAX_MINUTES)
            .validate()
            .unwrap();
        assert_eq!(params.entry_buffer(), Duration::days(2));
    }

    #[test]
    fn rejects_bad_coordinates() {
        let mut r = request();
        r.start = Coord::new(91.0, 0.0);
        let err = r.validate().unwrap_err();
        assert!(err.to_string().contains("start"));

        let mut r = request();
        r.end = Coord::new(0.0, f64::NAN);
        assert!(r.validate().is_err());
    }

    #[test]
    fn zero_is_allowed() {
        let params = request().with_max_bike_minutes(0.0).validate().unwrap();
        assert_eq!(params.max_bike, Duration::zero());
    }
}
