//! Planner configuration.

use std::time::Duration as StdDuration;

use chrono::Duration;

/// Slowest and fastest cycling speeds accepted for the pre-filter.
const MIN_CYCLE_SPEED_KMH: f64 = 8.0;
const MAX_CYCLE_SPEED_KMH: f64 = 30.0;

/// Process-wide tuning of the planner.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Assumed average cycling speed for the straight-line pre-filter.
    pub cycle_speed_kmh: f64,

    /// Ratio of road distance to straight-line distance assumed by the
    /// pre-filter.
    pub detour_factor: f64,

    /// Maximum number of stations per endpoint sent to the provider.
    pub max_candidates: usize,

    /// Maximum in-flight provider calls per endpoint.
    pub max_concurrent_calls: usize,

    /// Time limit for one provider call.
    pub call_timeout: StdDuration,

    /// Time limit for the whole attachment phase of a request.
    pub request_timeout: StdDuration,

    /// Stations at most this far (metres) from an endpoint are attached
    /// without cycling.
    pub coincident_radius_m: f64,

    /// Walking speed for the transit-only comparison.
    pub walk_speed_kmh: f64,

    /// Ratio of walked distance to straight-line distance.
    pub walk_detour_factor: f64,

    /// Longest walk considered for the transit-only comparison (minutes).
    pub max_walk_minutes: f64,

    /// Nearest stations per endpoint considered for the comparison.
    pub walk_candidates: usize,
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pre-filter cycling speed, clamped to a plausible range.
    pub fn with_cycle_speed(mut self, kmh: f64) -> Self {
        self.cycle_speed_kmh = if kmh.is_finite() {
            kmh.clamp(MIN_CYCLE_SPEED_KMH, MAX_CYCLE_SPEED_KMH)
        } else {
            Self::default().cycle_speed_kmh
        };
        self
    }

    /// Set the per-call provider timeout.
    pub fn with_call_timeout(mut self, timeout: StdDuration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Set the request deadline.
    pub fn with_request_timeout(mut self, timeout: StdDuration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the candidate cap per endpoint.
    pub fn with_max_candidates(mut self, n: usize) -> Self {
        self.max_candidates = n;
        self
    }

    /// Set the provider fan-out width.
    pub fn with_max_concurrent_calls(mut self, n: usize) -> Self {
        self.max_concurrent_calls = n.max(1);
        self
    }

    /// Straight-line radius (km) worth asking the provider about for a
    /// given cycling budget.
    pub fn prefilter_radius_km(&self, budget: Duration) -> f64 {
        let minutes = budget.num_milliseconds().max(0) as f64 / 60_000.0;
        minutes * self.cycle_speed_kmh / 60.0 / self.detour_factor
    }

    /// Estimated walking time for a straight-line distance.
    pub fn walk_time(&self, distance_km: f64) -> Duration {
        let hours = distance_km * self.walk_detour_factor / self.walk_speed_kmh;
        crate::minutes::from_minutes(hours * 60.0)
    }

    /// Straight-line radius (km) covered by the longest walk.
    pub fn max_walk_km(&self) -> f64 {
        self.max_walk_minutes / 60.0 * self.walk_speed_kmh / self.walk_detour_factor
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            cycle_speed_kmh: 15.0,
            detour_factor: 2.0,
            max_candidates: 30,
            max_concurrent_calls: 30,
            call_timeout: StdDuration::from_secs(10),
            request_timeout: StdDuration::from_secs(25),
            coincident_radius_m: 25.0,
            walk_speed_kmh: 4.8,
            walk_detour_factor: 1.3,
            max_walk_minutes: 20.0,
            walk_candidates: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.cycle_speed_kmh, 15.0);
        assert_eq!(config.detour_factor, 2.0);
        assert_eq!(config.max_candidates, 30);
        assert_eq!(config.max_concurrent_calls, 30);
        assert_eq!(config.call_timeout, StdDuration::from_secs(10));
        assert_eq!(config.request_timeout, StdDuration::from_secs(25));
        assert_eq!(config.coincident_radius_m, 25.0);
        assert_eq!(config.walk_candidates, 3);
    }

    #[test]
    fn request_timeout_is_configurable() {
        let config = PlannerConfig::new().with_request_timeout(StdDuration::from_secs(5));
        assert_eq!(config.request_timeout, StdDuration::from_secs(5));
    }

    #[test]
    fn cycle_speed_is_clamped() {
        assert_eq!(PlannerConfig::new().with_cycle_speed(50.0).cycle_speed_kmh, 30.0);
        assert_eq!(PlannerConfig::new().with_cycle_speed(2.0).cycle_speed_kmh, 8.0);
        assert_eq!(PlannerConfig::new().with_cycle_speed(20.0).cycle_speed_kmh, 20.0);
        assert_eq!(
            PlannerConfig::new().with_cycle_speed(f64::NAN).cycle_speed_kmh,
            15.0
        );
    }

    #[test]
    fn prefilter_radius() {
        let config = PlannerConfig::default();
        // 45 min at 15 km/h is 11.25 km of road, half that as the crow flies
        assert_eq!(config.prefilter_radius_km(Duration::minutes(45)), 5.625);
        assert_eq!(config.prefilter_radius_km(Duration::zero()), 0.0);
    }

    #[test]
    fn walking_estimates() {
        let config = PlannerConfig::default();
        // 1.2 km * 1.3 / 4.8 km/h = 19.5 minutes
        assert_eq!(config.walk_time(1.2), Duration::seconds(1170));
        assert!((config.max_walk_km() - 1.6 / 1.3).abs() < 1e-12);
    }
}
