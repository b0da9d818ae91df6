//! Offline bike router for development and tests.
//!
//! Prices every ride from the great-circle distance, so results are
//! deterministic and no network access is needed.

use crate::network::Coord;

use super::error::ProviderError;
use super::leg::BikeLeg;
use super::router::BikeRouter;

/// Straight-line bike router.
#[derive(Debug, Clone)]
pub struct MockRouter {
    speed_kmh: f64,
    detour_factor: f64,
}

impl MockRouter {
    pub fn new(speed_kmh: f64, detour_factor: f64) -> Self {
        Self {
            speed_kmh,
            detour_factor,
        }
    }

    pub fn with_speed(mut self, speed_kmh: f64) -> Self {
        self.speed_kmh = speed_kmh;
        self
    }

    /// The leg this router answers with, computed synchronously.
    pub fn leg(&self, from: Coord, to: Coord) -> Result<BikeLeg, ProviderError> {
        if !(self.speed_kmh.is_finite() && self.speed_kmh > 0.0) {
            return Err(ProviderError::NotConfigured(format!(
                "mock speed {} km/h",
                self.speed_kmh
            )));
        }
        let km = from.distance_km(&to) * self.detour_factor;
        let seconds = km / self.speed_kmh * 3600.0;
        BikeLeg::from_raw(seconds, km * 1000.0, vec![from.lon_lat(), to.lon_lat()])
    }
}

impl Default for MockRouter {
    fn default() -> Self {
        Self::new(15.0, 1.3)
    }
}

impl BikeRouter for MockRouter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn route(&self, from: Coord, to: Coord) -> Result<BikeLeg, ProviderError> {
        self.leg(from, to)
    }
}
