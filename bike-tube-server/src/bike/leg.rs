//! A cycled leg as returned by a provider.

use chrono::Duration;

use super::error::ProviderError;

/// Result of one successful provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct BikeLeg {
    pub duration: Duration,
    pub distance_km: f64,
    /// Path as `[lon, lat]` pairs; may be empty.
    pub geometry: Vec<[f64; 2]>,
}

impl BikeLeg {
    /// Build a leg from provider-reported seconds and metres.
    ///
    /// Non-finite, negative or day-long figures are a malformed response.
    pub fn from_raw(
        seconds: f64,
        meters: f64,
        geometry: Vec<[f64; 2]>,
    ) -> Result<Self, ProviderError> {
        if !(0.0..=crate::minutes::MAX_MINUTES * 60.0).contains(&seconds) {
            return Err(ProviderError::Json(format!("invalid duration {seconds}")));
        }
        if !meters.is_finite() || meters < 0.0 {
            return Err(ProviderError::Json(format!("invalid distance {meters}")));
        }
        Ok(Self {
            duration: crate::minutes::from_seconds(seconds),
            distance_km: meters / 1000.0,
            geometry,
        })
    }
}
