//! Conversion between fractional minutes and [`chrono::Duration`].
//!
//! Durations are held at millisecond precision. Minutes only appear at the
//! edges: dataset travel times, request parameters and response bodies.

use chrono::Duration;

/// Longest duration accepted from a dataset, a provider or a request.
pub const MAX_MINUTES: f64 = 24.0 * 60.0;

/// Round fractional minutes to the nearest millisecond.
///
/// Callers validate that `minutes` is finite and non-negative.
pub fn from_minutes(minutes: f64) -> Duration {
    Duration::milliseconds((minutes * 60_000.0).round() as i64)
}

/// Whole and fractional minutes in a duration.
pub fn to_minutes(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 60_000.0
}

/// Fractional seconds to a duration, as reported by bike providers.
pub fn from_seconds(seconds: f64) -> Duration {
    Duration::milliseconds((seconds * 1000.0).round() as i64)
}
