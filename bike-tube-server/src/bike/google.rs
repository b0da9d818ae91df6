//! Google Directions client in bicycling mode.

use serde::Deserialize;

use crate::network::Coord;

use super::error::ProviderError;
use super::leg::BikeLeg;
use super::polyline;
use super::router::BikeRouter;

/// Default Directions API endpoint.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Configuration for the Google Directions client.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// API key; calls fail with `NotConfigured` while unset
    pub api_key: Option<String>,
    /// Endpoint URL (overridable for testing)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GoogleConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
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

impl Default for GoogleConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
    #[serde(default)]
    overview_polyline: Option<EncodedPolyline>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: TextValue,
    duration: TextValue,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct EncodedPolyline {
    points: String,
}

/// Google Directions API client.
#[derive(Debug, Clone)]
pub struct GoogleRouter {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleRouter {
    pub fn new(config: GoogleConfig) -> Result<Self, ProviderError> {
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

/// Interpret a Directions response body.
fn leg_from_body(body: &str) -> Result<BikeLeg, ProviderError> {
    let response: DirectionsResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Json(e.to_string()))?;

    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => return Err(ProviderError::NoRoute),
        "REQUEST_DENIED" => return Err(ProviderError::Unauthorized),
        "OVER_QUERY_LIMIT" => return Err(ProviderError::RateLimited),
        other => {
            return Err(ProviderError::Api {
                status: 200,
                message: format!("{other}: {}", response.error_message.unwrap_or_default()),
            });
        }
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(ProviderError::NoRoute)?;

    if route.legs.is_empty() {
        return Err(ProviderError::NoRoute);
    }

    let seconds: f64 = route.legs.iter().map(|l| l.duration.value).sum();
    let meters: f64 = route.legs.iter().map(|l| l.distance.value).sum();
    let geometry = match route.overview_polyline {
        Some(p) => polyline::decode(&p.points)?,
        None => Vec::new(),
    };

    BikeLeg::from_raw(seconds, meters, geometry)
}

impl BikeRouter for GoogleRouter {
    fn name(&self) -> &str {
        "google"
    }

    async fn route(&self, from: Coord, to: Coord) -> Result<BikeLeg, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderError::NotConfigured("GOOGLE_MAPS_API_KEY is not set".to_string())
        })?;

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("origin", format!("{},{}", from.lat, from.lon)),
                ("destination", format!("{},{}", to.lat, to.lon)),
                ("mode", "bicycling".to_string()),
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
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;
        leg_from_body(&body)
    }
}
