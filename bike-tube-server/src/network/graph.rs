//! The immutable multi-layer transit graph.
//!
//! Every station is split into one [`LayerNode`] per line it serves. Travel
//! edges only ever join layers of the same line; moving between layers of
//! one station is an interchange, priced per request by the search. The
//! graph is validated once when built and never changes afterwards, so it
//! can be shared across requests behind an `Arc` without locking.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::Duration;
use tracing::info;

use crate::minutes;

use super::colors::{DEFAULT_LINE_COLOR, display_name, known_line_color};
use super::coord::Coord;
use super::dataset::NetworkData;
use super::error::NetworkError;
use super::ids::{LayerIndex, LayerKey, LineId, LineIndex, StationId, StationIndex};
use super::spatial::{NearbyStation, StationLocator};

/// A station of the network.
#[derive(Debug, Clone)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub coord: Coord,
    /// Lines served, in dataset order.
    pub lines: Vec<LineId>,
    pub zone: Option<String>,
    layers: Vec<LayerIndex>,
}

impl Station {
    /// Layer nodes of this station, one per line served.
    pub fn layers(&self) -> &[LayerIndex] {
        &self.layers
    }
}

/// A transit line.
#[derive(Debug, Clone)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub color: String,
    /// Stations in running order.
    pub stations: Vec<StationIndex>,
}

/// "At this station, riding this line."
#[derive(Debug, Clone)]
pub struct LayerNode {
    pub key: LayerKey,
    pub station: StationIndex,
    pub line: LineIndex,
}

/// Scheduled running between adjacent stations on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelEdge {
    pub to: LayerIndex,
    pub duration: Duration,
}

/// The static network.
#[derive(Debug)]
pub struct TransitGraph {
    stations: Vec<Station>,
    station_lookup: HashMap<StationId, StationIndex>,
    lines: Vec<Line>,
    line_lookup: HashMap<LineId, LineIndex>,
    layers: Vec<LayerNode>,
    layer_lookup: HashMap<LayerKey, LayerIndex>,
    travel: Vec<Vec<TravelEdge>>,
    locator: StationLocator,
}

impl TransitGraph {
    /// Load and validate a dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let graph = Self::from_data(NetworkData::from_file(path)?)?;
        info!(
            stations = graph.station_count(),
            lines = graph.line_count(),
            layers = graph.layer_count(),
            travel_edges = graph.travel_edge_count(),
            interchange_edges = graph.interchange_edge_count(),
            "Loaded transit network"
        );
        Ok(graph)
    }

    /// Build the graph from parsed data, checking every integrity rule.
    pub fn from_data(data: NetworkData) -> Result<Self, NetworkError> {
        let mut line_lookup = HashMap::new();
        let mut line_records = Vec::with_capacity(data.lines.len());
        for record in data.lines {
            let idx = LineIndex(line_records.len());
            if line_lookup.insert(record.id.clone(), idx).is_some() {
                return Err(NetworkError::DuplicateLine(record.id));
            }
            line_records.push(record);
        }

        let mut stations = Vec::with_capacity(data.stations.len());
        let mut station_lookup = HashMap::new();
        let mut layers = Vec::new();
        let mut layer_lookup = HashMap::new();

        for record in data.stations {
            let idx = StationIndex(stations.len());
            let coord = Coord::new(record.lat, record.lon);
            coord
                .validate()
                .map_err(|e| NetworkError::InvalidCoordinates {
                    station: record.id.clone(),
                    reason: e.to_string(),
                })?;
            if station_lookup.insert(record.id.clone(), idx).is_some() {
                return Err(NetworkError::DuplicateStation(record.id));
            }

            let mut station_layers = Vec::with_capacity(record.lines.len());
            for line in &record.lines {
                let line_idx = *line_lookup.get(line).ok_or_else(|| NetworkError::UnknownLine {
                    line: line.clone(),
                    context: format!("station {}", record.id),
                })?;
                let key = LayerKey::new(record.id.clone(), line.clone());
                let layer_idx = LayerIndex(layers.len());
                if layer_lookup.insert(key.clone(), layer_idx).is_some() {
                    return Err(NetworkError::DuplicateLayer(key));
                }
                layers.push(LayerNode {
                    key,
                    station: idx,
                    line: line_idx,
                });
                station_layers.push(layer_idx);
            }

            stations.push(Station {
                id: record.id,
                name: record.name,
                coord,
                lines: record.lines,
                zone: record.zone,
                layers: station_layers,
            });
        }

        let mut lines = Vec::with_capacity(line_records.len());
        for record in line_records {
            let context = format!("line {}", record.id);
            let mut sequence = Vec::with_capacity(record.stations.len());
            for station_id in &record.stations {
                let station_idx = *station_lookup.get(station_id).ok_or_else(|| {
                    NetworkError::UnknownStation {
                        station: station_id.clone(),
                        context: context.clone(),
                    }
                })?;
                if !stations[station_idx.0].lines.contains(&record.id) {
                    return Err(NetworkError::LineNotServed {
                        station: station_id.clone(),
                        line: record.id.clone(),
                        context: context.clone(),
                    });
                }
                sequence.push(station_idx);
            }

            let color = record
                .color
                .or_else(|| known_line_color(record.id.as_str()).map(str::to_string))
                .unwrap_or_else(|| DEFAULT_LINE_COLOR.to_string());
            let name = record
                .name
                .unwrap_or_else(|| display_name(record.id.as_str()));

            lines.push(Line {
                id: record.id,
                name,
                color,
                stations: sequence,
            });
        }

        let mut travel = vec![Vec::new(); layers.len()];
        for edge in data.travel_edges {
            if !(0.0..=minutes::MAX_MINUTES).contains(&edge.minutes) {
                return Err(NetworkError::InvalidTravelTime {
                    from: edge.from,
                    to: edge.to,
                    line: edge.line,
                    minutes: edge.minutes,
                });
            }
            if !line_lookup.contains_key(&edge.line) {
                return Err(NetworkError::UnknownLine {
                    line: edge.line,
                    context: format!("travel edge {} -> {}", edge.from, edge.to),
                });
            }

            let context = format!("travel edge {} -> {}", edge.from, edge.to);
            let resolve = |station: &StationId| {
                resolve_layer(&station_lookup, &layer_lookup, station, &edge.line, &context)
            };
            let from = resolve(&edge.from)?;
            let to = resolve(&edge.to)?;
            let duration = minutes::from_minutes(edge.minutes);

            travel[from.0].push(TravelEdge { to, duration });
            if edge.bidirectional {
                travel[to.0].push(TravelEdge { to: from, duration });
            }
        }

        let locator = StationLocator::new(
            stations
                .iter()
                .enumerate()
                .map(|(i, s)| (StationIndex(i), s.coord)),
        );

        Ok(Self {
            stations,
            station_lookup,
            lines,
            line_lookup,
            layers,
            layer_lookup,
            travel,
            locator,
        })
    }

    pub fn station(&self, idx: StationIndex) -> &Station {
        &self.stations[idx.0]
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn station_by_id(&self, id: &StationId) -> Option<StationIndex> {
        self.station_lookup.get(id).copied()
    }

    pub fn line(&self, idx: LineIndex) -> &Line {
        &self.lines[idx.0]
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_by_id(&self, id: &LineId) -> Option<&Line> {
        self.line_lookup.get(id).map(|idx| &self.lines[idx.0])
    }

    pub fn layer(&self, idx: LayerIndex) -> &LayerNode {
        &self.layers[idx.0]
    }

    pub fn layer_by_key(&self, key: &LayerKey) -> Option<LayerIndex> {
        self.layer_lookup.get(key).copied()
    }

    /// Travel edges leaving a layer node.
    pub fn travel_edges(&self, idx: LayerIndex) -> &[TravelEdge] {
        &self.travel[idx.0]
    }

    /// Layer nodes reachable from `idx` by an interchange at the same station.
    pub fn interchanges(&self, idx: LayerIndex) -> impl Iterator<Item = LayerIndex> + '_ {
        let station = self.layers[idx.0].station;
        self.stations[station.0]
            .layers
            .iter()
            .copied()
            .filter(move |&other| other != idx)
    }

    /// Stations within a straight-line radius, nearest first.
    pub fn stations_within(&self, origin: Coord, radius_km: f64) -> Vec<NearbyStation> {
        self.locator.within(origin, radius_km)
    }

    /// Up to `limit` nearest stations within `max_km`.
    pub fn nearest_stations(&self, origin: Coord, limit: usize, max_km: f64) -> Vec<NearbyStation> {
        self.locator.nearest(origin, limit, max_km)
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Directed travel edges.
    pub fn travel_edge_count(&self) -> usize {
        self.travel.iter().map(Vec::len).sum()
    }

    /// Directed interchange edges.
    pub fn interchange_edge_count(&self) -> usize {
        self.stations
            .iter()
            .map(|s| s.layers.len() * s.layers.len().saturating_sub(1))
            .sum()
    }

    /// Distinct stations with at least one travel edge in or out.
    pub fn connected_station_count(&self) -> usize {
        let mut connected = HashSet::new();
        for (from, edges) in self.travel.iter().enumerate() {
            if !edges.is_empty() {
                connected.insert(self.layers[from].station);
            }
            connected.extend(edges.iter().map(|e| self.layers[e.to.0].station));
        }
        connected.len()
    }
}

fn resolve_layer(
    station_lookup: &HashMap<StationId, StationIndex>,
    layer_lookup: &HashMap<LayerKey, LayerIndex>,
    station: &StationId,
    line: &LineId,
    context: &str,
) -> Result<LayerIndex, NetworkError> {
    if !station_lookup.contains_key(station) {
        return Err(NetworkError::UnknownStation {
            station: station.clone(),
            context: context.to_string(),
        });
    }
    layer_lookup
        .get(&LayerKey::new(station.clone(), line.clone()))
        .copied()
        .ok_or_else(|| NetworkError::LineNotServed {
            station: station.clone(),
            line: line.clone(),
            context: context.to_string(),
        })
}
