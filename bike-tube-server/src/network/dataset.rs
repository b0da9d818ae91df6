//! Serialized form of the static network, as produced by the graph builder.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::NetworkError;
use super::ids::{LineId, StationId};

/// The whole dataset document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkData {
    pub stations: Vec<StationRecord>,
    pub lines: Vec<LineRecord>,
    pub travel_edges: Vec<TravelEdgeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRecord {
    pub id: StationId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub lines: Vec<LineId>,
    #[serde(default)]
    pub zone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRecord {
    pub id: LineId,
    /// Display name; derived from the id when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Hex colour; the well-known colour for the id when absent.
    #[serde(default)]
    pub color: Option<String>,
    /// Stations in running order.
    pub stations: Vec<StationId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelEdgeRecord {
    pub from: StationId,
    pub to: StationId,
    pub line: LineId,
    /// Scheduled running time in minutes.
    pub minutes: f64,
    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
}

fn default_bidirectional() -> bool {
    true
}

impl NetworkData {
    pub fn from_json_str(json: &str) -> Result<Self, NetworkError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| NetworkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_document() {
        let json = r#"{
            "stations": [
                {"id": "A", "name": "Alpha", "lat": 51.5, "lon": -0.1, "lines": ["Central"]}
            ],
            "lines": [{"id": "central", "stations": ["A"]}],
            "travel_edges": []
        }"#;
        let data = NetworkData::from_json_str(json).unwrap();
        assert_eq!(data.stations.len(), 1);
        assert_eq!(data.stations[0].lines[0].as_str(), "central");
        assert!(data.stations[0].zone.is_none());
        assert!(data.lines[0].color.is_none());
    }

    #[test]
    fn travel_edges_default_to_bidirectional() {
        let json = r#"{"from": "A", "to": "B", "line": "central", "minutes": 2.5}"#;
        let edge: TravelEdgeRecord = serde_json::from_str(json).unwrap();
        assert!(edge.bidirectional);
        assert_eq!(edge.minutes, 2.5);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = NetworkData::from_file("/nonexistent/network.json").unwrap_err();
        assert!(matches!(err, NetworkError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_json_error() {
        let err = NetworkData::from_json_str("{\"stations\": 3}").unwrap_err();
        assert!(matches!(err, NetworkError::Json(_)));
    }
}
