//! Data transfer objects for web requests and responses.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::minutes;
use crate::network::{Coord, Station, TransitGraph};
use crate::planner::{
    BikeSegment, Endpoint, LineChangeSegment, Route, RouteRequest, Segment, TransitComparison,
    TubeSegment,
};

/// Request to plan a journey between two coordinates.
///
/// Coordinates are optional here so that a missing one is reported as a
/// bad request rather than a deserialisation failure.
#[derive(Debug, Deserialize)]
pub struct RouteCoordinatesRequest {
    pub start_lat: Option<f64>,
    pub start_lon: Option<f64>,
    pub end_lat: Option<f64>,
    pub end_lon: Option<f64>,

    /// Cycling budget per bike segment, in minutes (default 45)
    pub max_bike_minutes: Option<f64>,

    /// Minutes to get in or out of a station (default 2)
    pub station_access_time: Option<f64>,

    /// Minutes waiting for the first train (default 5)
    pub train_waiting_time: Option<f64>,

    /// Minutes charged per line change (default 5)
    pub line_change_time: Option<f64>,
}

impl RouteCoordinatesRequest {
    /// Turn the body into a planner request, or `None` if a coordinate is
    /// missing.
    pub fn to_route_request(&self) -> Option<RouteRequest> {
        let start = Coord::new(self.start_lat?, self.start_lon?);
        let end = Coord::new(self.end_lat?, self.end_lon?);

        let mut request = RouteRequest::new(start, end);
        if let Some(m) = self.max_bike_minutes {
            request = request.with_max_bike_minutes(m);
        }
        if let Some(m) = self.station_access_time {
            request = request.with_station_access_time(m);
        }
        if let Some(m) = self.train_waiting_time {
            request = request.with_train_waiting_time(m);
        }
        if let Some(m) = self.line_change_time {
            request = request.with_line_change_time(m);
        }
        Some(request)
    }
}

/// Successful planning response.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    /// Always "success"
    pub status: &'static str,
    pub route: RouteResult,
}

impl RouteResponse {
    pub fn from_route(route: &Route) -> Self {
        Self {
            status: "success",
            route: RouteResult::from_route(route),
        }
    }
}

/// A planned route.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub segments: Vec<SegmentResult>,

    /// Total journey time in minutes
    pub total_duration: f64,

    /// True when the journey is a single ride with no transit
    pub is_direct_bike: bool,

    pub line_changes: usize,

    /// Total cycling distance
    pub bike_distance_km: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transit_comparison: Option<ComparisonResult>,
}

impl RouteResult {
    pub fn from_route(route: &Route) -> Self {
        Self {
            segments: route.segments.iter().map(SegmentResult::from_segment).collect(),
            total_duration: minutes::to_minutes(route.total_duration),
            is_direct_bike: route.is_direct_bike,
            line_changes: route.line_changes(),
            bike_distance_km: route.bike_distance_km(),
            transit_comparison: route
                .transit_comparison
                .as_ref()
                .map(|c| ComparisonResult::from_comparison(c, route.total_duration)),
        }
    }
}

/// One segment of a route, tagged by `type`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentResult {
    Bike(BikeResult),
    Tube(TubeResult),
    LineChange(LineChangeResult),
}

impl SegmentResult {
    pub fn from_segment(segment: &Segment) -> Self {
        match segment {
            Segment::Bike(b) => SegmentResult::Bike(BikeResult::from_bike(b)),
            Segment::Tube(t) => SegmentResult::Tube(TubeResult::from_tube(t)),
            Segment::LineChange(c) => SegmentResult::LineChange(LineChangeResult::from_change(c)),
        }
    }
}

/// A start, end or station location.
#[derive(Debug, Serialize)]
pub struct PlaceResult {
    pub name: String,
    pub lat: f64,
    pub lon: f64,

    /// Station id when the place is a station
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
}

impl PlaceResult {
    fn from_endpoint(endpoint: &Endpoint) -> Self {
        Self {
            name: endpoint.name.clone(),
            lat: endpoint.coord.lat,
            lon: endpoint.coord.lon,
            station_id: endpoint.station.as_ref().map(|s| s.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BikeResult {
    pub from: PlaceResult,
    pub to: PlaceResult,

    /// Minutes, including any station buffer
    pub duration: f64,

    /// Minutes spent riding
    pub ride_duration: f64,

    /// Station access and waiting minutes
    pub buffer: f64,

    pub distance_km: f64,

    /// `[lon, lat]` pairs
    pub geometry: Vec<[f64; 2]>,
}

impl BikeResult {
    fn from_bike(bike: &BikeSegment) -> Self {
        Self {
            from: PlaceResult::from_endpoint(&bike.from),
            to: PlaceResult::from_endpoint(&bike.to),
            duration: minutes::to_minutes(bike.duration),
            ride_duration: minutes::to_minutes(bike.ride_duration),
            buffer: minutes::to_minutes(bike.buffer),
            distance_km: bike.distance_km,
            geometry: bike.geometry.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TubeResult {
    pub line: String,
    pub line_name: String,
    pub color: String,
    pub from_station: String,
    pub from_name: String,
    pub to_station: String,
    pub to_name: String,
    pub stops: usize,
    pub via: Vec<String>,
    pub access_buffer: f64,
    pub duration: f64,
}

impl TubeResult {
    fn from_tube(tube: &TubeSegment) -> Self {
        Self {
            line: tube.line.to_string(),
            line_name: tube.line_name.clone(),
            color: tube.color.clone(),
            from_station: tube.from_station.to_string(),
            from_name: tube.from_name.clone(),
            to_station: tube.to_station.to_string(),
            to_name: tube.to_name.clone(),
            stops: tube.stops,
            via: tube.via.clone(),
            access_buffer: minutes::to_minutes(tube.access_buffer),
            duration: minutes::to_minutes(tube.duration),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LineChangeResult {
    pub station: String,
    pub station_name: String,
    pub from_line: String,
    pub to_line: String,
    pub duration: f64,
}

impl LineChangeResult {
    fn from_change(change: &LineChangeSegment) -> Self {
        Self {
            station: change.station.to_string(),
            station_name: change.station_name.clone(),
            from_line: change.from_line.to_string(),
            to_line: change.to_line.to_string(),
            duration: minutes::to_minutes(change.penalty),
        }
    }
}

/// The same trip walking to and from the network.
#[derive(Debug, Serialize)]
pub struct ComparisonResult {
    pub duration: f64,
    pub walk_duration: f64,
    pub line_changes: usize,

    /// Minutes saved by cycling (negative when walking is faster)
    pub time_saved: f64,
}

impl ComparisonResult {
    fn from_comparison(comparison: &TransitComparison, cycling_total: Duration) -> Self {
        Self {
            duration: minutes::to_minutes(comparison.duration),
            walk_duration: minutes::to_minutes(comparison.walk_duration),
            line_changes: comparison.line_changes,
            time_saved: minutes::to_minutes(comparison.duration - cycling_total),
        }
    }
}

/// Station listing.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<StationResult>,
}

impl StationsResponse {
    pub fn from_graph(graph: &TransitGraph) -> Self {
        Self {
            stations: graph
                .stations()
                .iter()
                .map(|s| StationResult::from_station(graph, s))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StationResult {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub zone: Option<String>,
    pub lines: Vec<StationLineResult>,
}

/// A line serving a station, with its display colour.
#[derive(Debug, Serialize)]
pub struct StationLineResult {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl StationResult {
    fn from_station(graph: &TransitGraph, station: &Station) -> Self {
        let lines = station
            .lines
            .iter()
            .filter_map(|id| graph.line_by_id(id))
            .map(|line| StationLineResult {
                id: line.id.to_string(),
                name: line.name.clone(),
                color: line.color.clone(),
            })
            .collect();

        Self {
            id: station.id.to_string(),
            name: station.name.clone(),
            lat: station.coord.lat,
            lon: station.coord.lon,
            zone: station.zone.clone(),
            lines,
        }
    }
}

/// Size of the loaded network and the active bike provider.
#[derive(Debug, Serialize)]
pub struct GraphStatus {
    pub stations: usize,
    pub connected_stations: usize,
    pub lines: usize,
    pub layers: usize,
    pub travel_edges: usize,
    pub interchange_edges: usize,
    pub provider: String,

    /// Bike legs held by the provider cache, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_bike_legs: Option<u64>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always "error"
    pub status: &'static str,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: "error",
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{LineId, StationId};
    use serde_json::json;

    fn place(name: &str, station: Option<&str>) -> Endpoint {
        Endpoint {
            name: name.to_string(),
            coord: Coord::new(51.5, -0.1),
            station: station.map(|s| StationId::parse(s).unwrap()),
        }
    }

    fn sample_route() -> Route {
        Route {
            segments: vec![
                Segment::Bike(BikeSegment {
                    from: place("Start", None),
                    to: place("Bank", Some("BNK")),
                    ride_duration: Duration::seconds(330),
                    buffer: Duration::minutes(7),
                    duration: Duration::seconds(750),
                    distance_km: 1.2,
                    geometry: vec![[-0.1, 51.5], [-0.09, 51.51]],
                }),
                Segment::Tube(TubeSegment {
                    line: LineId::parse("central").unwrap(),
                    line_name: "Central".to_string(),
                    color: "#DC241F".to_string(),
                    from_station: StationId::parse("BNK").unwrap(),
                    from_name: "Bank".to_string(),
                    to_station: StationId::parse("OXC").unwrap(),
                    to_name: "Oxford Circus".to_string(),
                    stops: 4,
                    via: vec!["St. Paul's".to_string()],
                    access_buffer: Duration::zero(),
                    duration: Duration::minutes(9),
                }),
                Segment::LineChange(LineChangeSegment {
                    station: StationId::parse("OXC").unwrap(),
                    station_name: "Oxford Circus".to_string(),
                    from_line: LineId::parse("central").unwrap(),
                    to_line: LineId::parse("victoria").unwrap(),
                    penalty: Duration::minutes(5),
                }),
            ],
            total_duration: Duration::seconds(750 + 540 + 300),
            is_direct_bike: false,
            transit_comparison: None,
        }
    }

    #[test]
    fn missing_coordinate_gives_none() {
        let body: RouteCoordinatesRequest =
            serde_json::from_value(json!({"start_lat": 51.5, "start_lon": -0.1, "end_lat": 51.4}))
                .unwrap();
        assert!(body.to_route_request().is_none());
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let body: RouteCoordinatesRequest = serde_json::from_value(json!({
            "start_lat": 51.5, "start_lon": -0.1, "end_lat": 51.4, "end_lon": -0.2
        }))
        .unwrap();
        let params = body.to_route_request().unwrap().validate().unwrap();

        assert_eq!(params.max_bike, Duration::minutes(45));
        assert_eq!(params.station_access, Duration::minutes(2));
        assert_eq!(params.train_waiting, Duration::minutes(5));
        assert_eq!(params.line_change, Duration::minutes(5));
    }

    #[test]
    fn overrides_are_applied() {
        let body: RouteCoordinatesRequest = serde_json::from_value(json!({
            "start_lat": 51.5, "start_lon": -0.1, "end_lat": 51.4, "end_lon": -0.2,
            "max_bike_minutes": 10, "line_change_time": 0
        }))
        .unwrap();
        let params = body.to_route_request().unwrap().validate().unwrap();

        assert_eq!(params.max_bike, Duration::minutes(10));
        assert_eq!(params.line_change, Duration::zero());
    }

    #[test]
    fn segments_are_tagged_by_type() {
        let value = serde_json::to_value(RouteResponse::from_route(&sample_route())).unwrap();

        assert_eq!(value["status"], "success");
        let segments = value["route"]["segments"].as_array().unwrap();
        assert_eq!(segments[0]["type"], "bike");
        assert_eq!(segments[1]["type"], "tube");
        assert_eq!(segments[2]["type"], "line_change");
        assert_eq!(segments[0]["to"]["station_id"], "BNK");
        assert!(segments[0]["from"].get("station_id").is_none());
        assert_eq!(segments[1]["via"], json!(["St. Paul's"]));
    }

    #[test]
    fn durations_are_minutes() {
        let value = serde_json::to_value(RouteResponse::from_route(&sample_route())).unwrap();

        assert_eq!(value["route"]["segments"][0]["duration"], 12.5);
        assert_eq!(value["route"]["segments"][0]["ride_duration"], 5.5);
        assert_eq!(value["route"]["segments"][2]["duration"], 5.0);
        assert_eq!(value["route"]["total_duration"], 26.5);
        assert_eq!(value["route"]["line_changes"], 1);
        assert!(value["route"].get("transit_comparison").is_none());
    }

    #[test]
    fn comparison_reports_time_saved() {
        let mut route = sample_route();
        route.transit_comparison = Some(TransitComparison {
            duration: Duration::minutes(40),
            walk_duration: Duration::minutes(12),
            line_changes: 2,
        });
        let result = RouteResult::from_route(&route);
        let comparison = result.transit_comparison.unwrap();

        assert_eq!(comparison.duration, 40.0);
        assert_eq!(comparison.time_saved, 13.5);
    }

    #[test]
    fn error_body_shape() {
        let value = serde_json::to_value(ErrorResponse::new("Missing coordinates")).unwrap();
        assert_eq!(value, json!({"status": "error", "error": "Missing coordinates"}));
    }
}
