//! OSRM HTTP client for the cycling profile.
//!
//! Public OSRM instances answer the cycling profile with car-like timings,
//! so by default the reported duration is replaced by distance over a
//! configured cycling speed.

use serde::Deserialize;

use crate::network::Coord;

use super::error::ProviderError;
use super::leg::BikeLeg;
use super::router::BikeRouter;

/// Default OSRM server.
pub const DEFAULT_OSRM_URL: &str = "http://router.project-osrm.org";

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of the OSRM server
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Speed used to recompute durations; `None` keeps OSRM's own figure
    pub speed_kmh: Option<f64>,
}

impl OsrmConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_OSRM_URL.to_string(),
            timeout_secs: 10,
            speed_kmh: Some(15.0),
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set or disable speed scaling.
    pub fn with_speed(mut self, speed_kmh: Option<f64>) -> Self {
        self.speed_kmh = speed_kmh;
        self
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Metres
    distance: f64,
    /// Seconds
    duration: f64,
    #[serde(default)]
    geometry: Option<OsrmGeometry>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// OSRM route service client.
#[derive(Debug, Clone)]
pub struct OsrmRouter {
    http: reqwest::Client,
    base_url: String,
    speed_kmh: Option<f64>,
}

impl OsrmRouter {
    pub fn new(config: OsrmConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        let speed_kmh = config.speed_kmh.filter(|s| s.is_finite() && *s > 0.0);

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            speed_kmh,
        })
    }

    fn route_url(&self, from: Coord, to: Coord) -> String {
        format!(
            "{}/route/v1/cycling/{},{};{},{}",
            self.base_url, from.lon, from.lat, to.lon, to.lat
        )
    }

    fn leg_from_body(&self, body: &str) -> Result<BikeLeg, ProviderError> {
        let response: OsrmResponse =
            serde_json::from_str(body).map_err(|e| ProviderError::Json(e.to_string()))?;

        match response.code.as_str() {
            "Ok" => {}
            "NoRoute" | "NoSegment" => return Err(ProviderError::NoRoute),
            other => {
                return Err(ProviderError::Api {
                    status: 200,
                    message: format!("{other}: {}", response.message.unwrap_or_default()),
                });
            }
        }

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or(ProviderError::NoRoute)?;

        let seconds = match self.speed_kmh {
            Some(speed) => route.distance / 1000.0 / speed * 3600.0,
            None => route.duration,
        };
        let geometry = route.geometry.map(|g| g.coordinates).unwrap_or_default();

        BikeLeg::from_raw(seconds, route.distance, geometry)
    }
}

impl BikeRouter for OsrmRouter {
    fn name(&self) -> &str {
        "osrm"
    }

    async fn route(&self, from: Coord, to: Coord) -> Result<BikeLeg, ProviderError> {
        let response = self
            .http
            .get(self.route_url(from, to))
            .query(&[
                ("overview", "full"),
                ("steps", "false"),
                ("geometries", "geojson"),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        let body = response.text().await?;

        // OSRM reports "no route" as a 400 with a JSON code.
        if !status.is_success() {
            return match self.leg_from_body(&body) {
                Err(ProviderError::NoRoute) => Err(ProviderError::NoRoute),
                _ => Err(ProviderError::Api {
                    status: status.as_u16(),
                    message: body.chars().take(500).collect(),
                }),
            };
        }

        self.leg_from_body(&body)
    }
}
