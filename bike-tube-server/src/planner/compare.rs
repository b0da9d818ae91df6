//! Transit-only baseline: walk to the nearest stations instead of cycling.

use chrono::Duration;
use tracing::debug;

use crate::network::{Coord, NearbyStation, TransitGraph};

use super::config::PlannerConfig;
use super::engine::{CostModel, EdgeKind, shortest_path};
use super::overlay::{AccessLeg, Overlay, StationAccess};
use super::route::TransitComparison;

fn walk_edges(
    config: &PlannerConfig,
    nearby: impl IntoIterator<Item = NearbyStation>,
) -> Vec<StationAccess> {
    nearby
        .into_iter()
        .map(|n| StationAccess {
            station: n.station,
            leg: AccessLeg::walk(
                config.walk_time(n.distance_km),
                n.distance_km * config.walk_detour_factor,
            ),
        })
        .collect()
}

/// Fastest trip walking to and from the network, or `None` if either end
/// has no station within walking range.
///
/// Runs its own search on its own overlay; nothing is shared with the
/// cycling plan except the static graph.
pub fn transit_only(
    graph: &TransitGraph,
    config: &PlannerConfig,
    costs: CostModel,
    start: Coord,
    end: Coord,
) -> Option<TransitComparison> {
    let max_km = config.max_walk_km();
    let origin = graph.nearest_stations(start, config.walk_candidates, max_km);
    let destination: Vec<_> = graph
        .nearest_stations(end, config.walk_candidates, max_km)
        .into_iter()
        .filter(|d| !origin.iter().any(|o| o.station == d.station))
        .collect();

    if origin.is_empty() || destination.is_empty() {
        debug!(
            origin = origin.len(),
            destination = destination.len(),
            "No transit comparison: stations out of walking range"
        );
        return None;
    }

    let overlay = Overlay::new(
        walk_edges(config, origin),
        walk_edges(config, destination),
        None,
    );

    let Some(outcome) = shortest_path(graph, &overlay, costs) else {
        debug!("No transit comparison: walking stations not connected");
        return None;
    };

    let mut walk_duration = Duration::zero();
    let mut line_changes = 0;
    for edge in &outcome.path {
        match edge.kind {
            EdgeKind::Board(i) => walk_duration += overlay.origin()[i].leg.duration,
            EdgeKind::Alight(i) => walk_duration += overlay.destination()[i].leg.duration,
            EdgeKind::Interchange => line_changes += 1,
            EdgeKind::Travel | EdgeKind::Direct => {}
        }
    }

    Some(TransitComparison {
        duration: outcome.total,
        walk_duration,
        line_changes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkData;

    const NET: &str = r#"{
        "stations": [
            {"id": "A", "name": "Alpha", "lat": 51.500, "lon": -0.10, "lines": ["red"]},
            {"id": "B", "name": "Bravo", "lat": 51.520, "lon": -0.10, "lines": ["red", "blue"]},
            {"id": "C", "name": "Charlie", "lat": 51.540, "lon": -0.10, "lines": ["blue"]}
        ],
        "lines": [
            {"id": "red", "stations": ["A", "B"]},
            {"id": "blue", "stations": ["B", "C"]}
        ],
        "travel_edges": [
            {"from": "A", "to": "B", "line": "red", "minutes": 4},
            {"from": "B", "to": "C", "line": "blue", "minutes": 4}
        ]
    }"#;

    fn graph() -> TransitGraph {
        TransitGraph::from_data(NetworkData::from_json_str(NET).unwrap()).unwrap()
    }

    fn costs() -> CostModel {
        CostModel {
            entry_buffer: Duration::minutes(7),
            exit_buffer: Duration::minutes(2),
            line_change: Duration::minutes(5),
        }
    }

    #[test]
    fn walks_rides_and_changes() {
        let g = graph();
        let config = PlannerConfig::default();
        let start = Coord::new(51.501, -0.10);
        let end = Coord::new(51.541, -0.10);

        let comparison = transit_only(&g, &config, costs(), start, end).unwrap();
        assert_eq!(comparison.line_changes, 1);

        let walk_in = config.walk_time(start.distance_km(&g.stations()[0].coord));
        let walk_out = config.walk_time(end.distance_km(&g.stations()[2].coord));
        assert_eq!(comparison.walk_duration, walk_in + walk_out);
        assert_eq!(
            comparison.duration,
            walk_in + walk_out + Duration::minutes(7 + 4 + 5 + 4 + 2)
        );
    }

    #[test]
    fn none_when_out_of_walking_range() {
        let g = graph();
        let config = PlannerConfig::default();
        let far = Coord::new(52.5, -0.10);
        assert!(transit_only(&g, &config, costs(), far, Coord::new(51.541, -0.10)).is_none());
        assert!(transit_only(&g, &config, costs(), Coord::new(51.501, -0.10), far).is_none());
    }

    #[test]
    fn none_when_both_ends_share_their_only_station() {
        let g = graph();
        let config = PlannerConfig::default();
        let a = Coord::new(51.5001, -0.10);
        let b = Coord::new(51.5002, -0.10);
        assert!(transit_only(&g, &config, costs(), a, b).is_none());
    }
}
