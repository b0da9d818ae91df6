//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{debug, error, warn};

use crate::bike::BikeRouter;
use crate::planner::PlanError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<P: BikeRouter + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/stations", get(list_stations::<P>))
        .route("/api/graph/status", get(graph_status::<P>))
        .route("/api/route/coordinates", post(plan_route::<P>))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// All stations with their lines.
async fn list_stations<P: BikeRouter + 'static>(
    State(state): State<AppState<P>>,
) -> Json<StationsResponse> {
    Json(StationsResponse::from_graph(state.planner.graph()))
}

/// Size of the loaded network.
async fn graph_status<P: BikeRouter + 'static>(
    State(state): State<AppState<P>>,
) -> Json<GraphStatus> {
    let graph = state.planner.graph();
    Json(GraphStatus {
        stations: graph.station_count(),
        connected_stations: graph.connected_station_count(),
        lines: graph.line_count(),
        layers: graph.layer_count(),
        travel_edges: graph.travel_edge_count(),
        interchange_edges: graph.interchange_edge_count(),
        provider: state.planner.router().name().to_string(),
        cached_bike_legs: state.planner.router().cached_legs(),
    })
}

/// Plan a journey between two coordinates.
async fn plan_route<P: BikeRouter + 'static>(
    State(state): State<AppState<P>>,
    body: Bytes,
) -> Result<Json<RouteResponse>, AppError> {
    // Parse JSON manually so malformed bodies get the error envelope
    let req: RouteCoordinatesRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(&body), "Invalid route request body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let request = req.to_route_request().ok_or_else(|| AppError::BadRequest {
        message: "Missing coordinates".to_string(),
    })?;

    let route = state.planner.plan(&request).await?;
    Ok(Json(RouteResponse::from_route(&route)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Timeout { message: String },
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        let message = e.to_string();
        match e {
            PlanError::InvalidInput(_) => AppError::BadRequest { message },
            PlanError::RouteNotFound { .. } => AppError::NotFound { message },
            PlanError::Cancelled => AppError::Timeout { message },
            PlanError::Inconsistent(_) => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Timeout { message } => (StatusCode::GATEWAY_TIMEOUT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            warn!(%status, "{message}");
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bike::MockRouter;
    use crate::cache::{BikeCacheConfig, CachedBikeRouter};
    use crate::network::TransitGraph;
    use crate::planner::{Planner, PlannerConfig};
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn sample_graph() -> Arc<TransitGraph> {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_network.json");
        Arc::new(TransitGraph::load(path).unwrap())
    }

    /// Serve the router on an ephemeral port and return its base URL.
    async fn spawn_app() -> String {
        spawn_app_with(MockRouter::default()).await
    }

    async fn spawn_app_with<P: BikeRouter + 'static>(router: P) -> String {
        let planner = Planner::new(sample_graph(), router, PlannerConfig::default());
        let app = create_router(AppState::new(planner));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn post_route(base: &str, body: impl Into<reqwest::Body>) -> (StatusCode, Value) {
        let response = reqwest::Client::new()
            .post(format!("{base}/api/route/coordinates"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn health_is_ok() {
        let base = spawn_app().await;
        let body = reqwest::get(format!("{base}/api/health"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn lists_stations_with_line_colours() {
        let base = spawn_app().await;
        let value: Value = reqwest::get(format!("{base}/api/stations"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let stations = value["stations"].as_array().unwrap();
        assert_eq!(stations.len(), 19);
        let lines = stations[0]["lines"].as_array().unwrap();
        assert!(!lines.is_empty());
        assert!(lines[0]["color"].as_str().unwrap().starts_with('#'));
    }

    #[tokio::test]
    async fn graph_status_reports_counts() {
        let base = spawn_app().await;
        let value: Value = reqwest::get(format!("{base}/api/graph/status"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(value["stations"], 19);
        assert_eq!(value["lines"], 9);
        assert_eq!(value["travel_edges"], 72);
        assert_eq!(value["provider"], "mock");
        assert!(value.get("cached_bike_legs").is_none());
    }

    #[tokio::test]
    async fn graph_status_reports_cache_size() {
        let router = CachedBikeRouter::new(MockRouter::default(), &BikeCacheConfig::default());
        let base = spawn_app_with(router).await;
        let value: Value = reqwest::get(format!("{base}/api/graph/status"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(value["provider"], "mock");
        assert_eq!(value["cached_bike_legs"], 0);
    }

    #[tokio::test]
    async fn plans_a_route() {
        let base = spawn_app().await;
        let body = json!({
            "start_lat": 51.5074, "start_lon": -0.1278,
            "end_lat": 51.4994, "end_lon": -0.1270,
            "max_bike_minutes": 45
        });
        let (status, value) = post_route(&base, body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["status"], "success");
        assert!(value["route"]["total_duration"].as_f64().unwrap() > 0.0);
        assert!(!value["route"]["segments"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_coordinates_are_bad_request() {
        let base = spawn_app().await;
        let body = json!({"start_lat": 51.5074, "start_lon": -0.1278});
        let (status, value) = post_route(&base, body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value, json!({"status": "error", "error": "Missing coordinates"}));
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let base = spawn_app().await;
        let (status, value) = post_route(&base, "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["status"], "error");
    }

    #[tokio::test]
    async fn negative_budget_is_bad_request() {
        let base = spawn_app().await;
        let body = json!({
            "start_lat": 51.5074, "start_lon": -0.1278,
            "end_lat": 51.4994, "end_lon": -0.1270,
            "max_bike_minutes": -1
        });
        let (status, _) = post_route(&base, body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn mid_ocean_is_not_found() {
        let base = spawn_app().await;
        let body = json!({"start_lat": 0.0, "start_lon": -30.0, "end_lat": 1.0, "end_lon": -31.0});
        let (status, value) = post_route(&base, body.to_string()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value["status"], "error");
    }

    #[test]
    fn plan_errors_map_to_statuses() {
        let status = |e: PlanError| AppError::from(e).into_response().status();

        assert_eq!(
            status(PlanError::InvalidInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(PlanError::Cancelled), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            status(PlanError::Inconsistent("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
