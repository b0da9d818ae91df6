use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bike_tube_server::bike::{
    ConfiguredRouter, GoogleConfig, GraphHopperConfig, MockRouter, OsrmConfig, ProviderConfig,
    ProviderKind,
};
use bike_tube_server::cache::{BikeCacheConfig, CachedBikeRouter};
use bike_tube_server::network::TransitGraph;
use bike_tube_server::planner::{Planner, PlannerConfig};
use bike_tube_server::web::{AppState, create_router};

const DEFAULT_NETWORK_FILE: &str = "data/sample_network.json";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 25;
const DEFAULT_CYCLE_SPEED_KMH: f64 = 15.0;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset or
/// unparseable.
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(name, value = %raw, "Ignoring unparseable environment variable");
            default
        }),
        Err(_) => default,
    }
}

fn provider_config(timeout_secs: u64, cycle_speed: f64) -> Result<ProviderConfig, String> {
    let kind = match std::env::var("BIKE_PROVIDER") {
        Ok(raw) => raw.parse::<ProviderKind>()?,
        Err(_) => ProviderKind::default(),
    };

    // An empty OSRM_SPEED_KMH keeps the server's own durations
    let osrm_speed = match std::env::var("OSRM_SPEED_KMH") {
        Ok(raw) if raw.trim().is_empty() => None,
        Ok(raw) => Some(raw.trim().parse().unwrap_or_else(|_| {
            warn!(value = %raw, "Ignoring unparseable OSRM_SPEED_KMH");
            DEFAULT_CYCLE_SPEED_KMH
        })),
        Err(_) => Some(DEFAULT_CYCLE_SPEED_KMH),
    };

    let mut osrm = OsrmConfig::new()
        .with_timeout(timeout_secs)
        .with_speed(osrm_speed);
    if let Ok(url) = std::env::var("OSRM_BASE_URL") {
        osrm = osrm.with_base_url(url);
    }

    let api_key = std::env::var("GOOGLE_MAPS_API_KEY").ok();
    if kind == ProviderKind::Google && api_key.is_none() {
        warn!("GOOGLE_MAPS_API_KEY not set. Bike legs will fail.");
    }
    let google = GoogleConfig::new(api_key).with_timeout(timeout_secs);

    let api_key = std::env::var("GRAPHHOPPER_API_KEY").ok();
    if kind == ProviderKind::GraphHopper && api_key.is_none() {
        warn!("GRAPHHOPPER_API_KEY not set. Bike legs will fail.");
    }
    let mut graphhopper = GraphHopperConfig::new(api_key).with_timeout(timeout_secs);
    if let Ok(url) = std::env::var("GRAPHHOPPER_BASE_URL") {
        graphhopper = graphhopper.with_base_url(url);
    }

    Ok(ProviderConfig::new(kind)
        .with_osrm(osrm)
        .with_google(google)
        .with_graphhopper(graphhopper)
        .with_mock(MockRouter::default().with_speed(cycle_speed)))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load the static network (integrity faults are fatal)
    let network_file = env_or("NETWORK_FILE", DEFAULT_NETWORK_FILE);
    let graph = match TransitGraph::load(&network_file) {
        Ok(graph) => Arc::new(graph),
        Err(e) => {
            error!(file = %network_file, "Failed to load network: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Create the bike provider behind the leg cache
    let timeout_secs = env_parse("PROVIDER_TIMEOUT_SECS", DEFAULT_PROVIDER_TIMEOUT_SECS);
    let cycle_speed = env_parse("CYCLE_SPEED_KMH", DEFAULT_CYCLE_SPEED_KMH);
    let provider_config = match provider_config(timeout_secs, cycle_speed) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid BIKE_PROVIDER: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(provider = %provider_config.kind, "Using bike provider");
    let provider = match ConfiguredRouter::from_config(provider_config) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to create bike provider: {e}");
            return ExitCode::FAILURE;
        }
    };
    let router = CachedBikeRouter::new(provider, &BikeCacheConfig::default());

    // Create the planner
    let planner_config = PlannerConfig::default()
        .with_cycle_speed(cycle_speed)
        .with_call_timeout(Duration::from_secs(timeout_secs))
        .with_request_timeout(Duration::from_secs(env_parse(
            "REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )));
    let planner = Planner::new(graph, router, planner_config);

    let app = create_router(AppState::new(planner));

    // Bind and serve
    let bind_addr = env_or("BIND_ADDR", DEFAULT_BIND_ADDR);
    let addr: SocketAddr = match bind_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(addr = %bind_addr, "Invalid BIND_ADDR: {e}");
            return ExitCode::FAILURE;
        }
    };
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, "Failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Bike + tube planner listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET  /api/health             - Health check");
    info!("  GET  /api/stations           - List stations");
    info!("  GET  /api/graph/status       - Network size and provider");
    info!("  POST /api/route/coordinates  - Plan a journey");

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
