//! GraphHopper Routing API client with the bike profile.

use serde::Deserialize;

use crate::network::Coord;

use super::error::ProviderError;
use super::leg::BikeLeg;
use super::router::BikeRouter;

/// Default hosted Routing API endpoint.
const DEFAULT_BASE_URL: &str = "https://graphhopper.com/api/1/route";

/// Configuration for the GraphHopper client.
#[derive(Debug, Clone)]
pub struct GraphHopperConfig {
    /// API key; calls fail with `NotConfigured` while unset
    pub api_key: Option<String>,
    /// Endpoint URL (overridable for testing or a self-hosted server)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GraphHopperConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
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
}

impl Default for GraphHopperConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    paths: Vec<RoutePath>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RoutePath {
    /// Milliseconds
    time: f64,
    /// Metres
    distance: f64,
    #[serde(default)]
    points: Option<LineString>,
}

#[derive(Debug, Deserialize)]
struct LineString {
    coordinates: Vec<[f64; 2]>,
}

/// GraphHopper Routing API client.
#[derive(Debug, Clone)]
pub struct GraphHopperRouter {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GraphHopperRouter {
    pub fn new(config: GraphHopperConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }
}

/// Interpret a successful Routing API body.
fn leg_from_body(body: &str) -> Result<BikeLeg, ProviderError> {
    let response: RouteResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Json(e.to_string()))?;

    let path = response
        .paths
        .into_iter()
        .next()
        .ok_or(ProviderError::NoRoute)?;
    let geometry = path.points.map(|p| p.coordinates).unwrap_or_default();

    BikeLeg::from_raw(path.time / 1000.0, path.distance, geometry)
}

/// Classify a 400 answer: unroutable points are a missing route, not a fault.
fn error_from_body(status: u16, body: &str) -> ProviderError {
    let message = serde_json::from_str::<RouteResponse>(body)
        .ok()
        .and_then(|r| r.message)
        .unwrap_or_else(|| body.chars().take(500).collect());

    if status == 400
        && (message.starts_with("Cannot find point") || message.contains("not found"))
    {
        return ProviderError::NoRoute;
    }
    ProviderError::Api { status, message }
}

impl BikeRouter for GraphHopperRouter {
    fn name(&self) -> &str {
        "graphhopper"
    }

    async fn route(&self, from: Coord, to: Coord) -> Result<BikeLeg, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::NotConfigured("GRAPHHOPPER_API_KEY is not set".to_string())
        })?;

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("point", format!("{},{}", from.lat, from.lon)),
                ("point", format!("{},{}", to.lat, to.lon)),
                ("profile", "bike".to_string()),
                ("points_encoded", "false".to_string()),
                ("key", api_key.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ProviderError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), &body));
        }

        let body = response.text().await?;
        leg_from_body(&body)
    }
}
