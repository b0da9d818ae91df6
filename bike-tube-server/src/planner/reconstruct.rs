//! Decoding an engine path into a segmented route.

use chrono::Duration;

use crate::network::{Coord, LayerIndex, TransitGraph};

use super::engine::{EdgeKind, Node, PathEdge, SearchOutcome};
use super::error::PlanError;
use super::overlay::{AccessLeg, AccessMode, Overlay};
use super::route::{BikeSegment, Endpoint, LineChangeSegment, Route, Segment, TubeSegment};

struct Decoder<'a> {
    graph: &'a TransitGraph,
    overlay: &'a Overlay,
    start: Coord,
    end: Coord,
    segments: Vec<Segment>,
    /// Buffer from an at-station boarding, waiting for the next ride.
    carry: Duration,
    /// The previous path edge was a travel edge.
    riding: bool,
}

impl<'a> Decoder<'a> {
    fn start_endpoint(&self) -> Endpoint {
        Endpoint {
            name: "Start".to_string(),
            coord: self.start,
            station: None,
        }
    }

    fn end_endpoint(&self) -> Endpoint {
        Endpoint {
            name: "End".to_string(),
            coord: self.end,
            station: None,
        }
    }

    fn station_endpoint(&self, layer: LayerIndex) -> Endpoint {
        let station = self.graph.station(self.graph.layer(layer).station);
        Endpoint {
            name: station.name.clone(),
            coord: station.coord,
            station: Some(station.id.clone()),
        }
    }

    fn bike(&mut self, from: Endpoint, to: Endpoint, leg: &AccessLeg, weight: Duration) {
        let buffer = weight - leg.duration + self.carry;
        self.carry = Duration::zero();
        let geometry = leg.geometry_or_straight(from.coord, to.coord);
        self.segments.push(Segment::Bike(BikeSegment {
            from,
            to,
            ride_duration: leg.duration,
            buffer,
            duration: leg.duration + buffer,
            distance_km: leg.distance_km,
            geometry,
        }));
    }

    fn board(&mut self, edge: &PathEdge, index: usize) -> Result<(), PlanError> {
        let Node::Layer(layer) = edge.to else {
            return Err(PlanError::Inconsistent("boarding edge without a station".into()));
        };
        let overlay = self.overlay;
        let access = overlay
            .origin()
            .get(index)
            .ok_or_else(|| PlanError::Inconsistent(format!("unknown boarding edge {index}")))?;

        match access.leg.mode {
            AccessMode::Bike => {
                let from = self.start_endpoint();
                let to = self.station_endpoint(layer);
                self.bike(from, to, &access.leg, edge.weight);
            }
            AccessMode::AtStation => self.carry += edge.weight,
            AccessMode::Walk => {
                return Err(PlanError::Inconsistent("walking edge in a cycling route".into()));
            }
        }
        Ok(())
    }

    fn alight(&mut self, edge: &PathEdge, index: usize) -> Result<(), PlanError> {
        let Node::Layer(layer) = edge.from else {
            return Err(PlanError::Inconsistent("alighting edge without a station".into()));
        };
        let overlay = self.overlay;
        let access = overlay
            .destination()
            .get(index)
            .ok_or_else(|| PlanError::Inconsistent(format!("unknown alighting edge {index}")))?;

        match access.leg.mode {
            AccessMode::Bike => {
                let from = self.station_endpoint(layer);
                let to = self.end_endpoint();
                self.bike(from, to, &access.leg, edge.weight);
            }
            AccessMode::AtStation => {
                let weight = edge.weight;
                match self.segments.last_mut() {
                    Some(Segment::Tube(tube)) => {
                        tube.access_buffer += weight;
                        tube.duration += weight;
                    }
                    Some(Segment::Bike(bike)) => {
                        bike.buffer += weight;
                        bike.duration += weight;
                    }
                    _ => {
                        return Err(PlanError::Inconsistent(
                            "station exit with no ride before it".into(),
                        ));
                    }
                }
            }
            AccessMode::Walk => {
                return Err(PlanError::Inconsistent("walking edge in a cycling route".into()));
            }
        }
        Ok(())
    }

    fn travel(&mut self, edge: &PathEdge) -> Result<(), PlanError> {
        let (Node::Layer(from), Node::Layer(to)) = (edge.from, edge.to) else {
            return Err(PlanError::Inconsistent("travel edge outside the network".into()));
        };
        let graph = self.graph;
        let from_layer = graph.layer(from);
        let to_layer = graph.layer(to);
        let to_station = graph.station(to_layer.station);

        if self.riding {
            if let Some(Segment::Tube(tube)) = self.segments.last_mut() {
                if graph.line(from_layer.line).id == tube.line {
                    tube.via.push(std::mem::replace(&mut tube.to_name, to_station.name.clone()));
                    tube.to_station = to_station.id.clone();
                    tube.stops += 1;
                    tube.duration += edge.weight;
                    return Ok(());
                }
            }
        }

        let line = graph.line(from_layer.line);
        let from_station = graph.station(from_layer.station);
        let access_buffer = std::mem::replace(&mut self.carry, Duration::zero());
        self.segments.push(Segment::Tube(TubeSegment {
            line: line.id.clone(),
            line_name: line.name.clone(),
            color: line.color.clone(),
            from_station: from_station.id.clone(),
            from_name: from_station.name.clone(),
            to_station: to_station.id.clone(),
            to_name: to_station.name.clone(),
            stops: 1,
            via: Vec::new(),
            access_buffer,
            duration: edge.weight + access_buffer,
        }));
        Ok(())
    }

    fn interchange(&mut self, edge: &PathEdge) -> Result<(), PlanError> {
        let (Node::Layer(from), Node::Layer(to)) = (edge.from, edge.to) else {
            return Err(PlanError::Inconsistent("line change outside the network".into()));
        };
        let graph = self.graph;
        let from_layer = graph.layer(from);
        let station = graph.station(from_layer.station);
        self.segments.push(Segment::LineChange(LineChangeSegment {
            station: station.id.clone(),
            station_name: station.name.clone(),
            from_line: graph.line(from_layer.line).id.clone(),
            to_line: graph.line(graph.layer(to).line).id.clone(),
            penalty: edge.weight,
        }));
        Ok(())
    }
}

/// Turn the engine's path into a route.
///
/// Consecutive travel edges on one line become a single tube segment.
/// Buffers of at-station attachments are reported on the adjacent ride.
/// Fails with [`PlanError::Inconsistent`] if the segments do not add up
/// to the engine's total.
pub fn reconstruct(
    graph: &TransitGraph,
    overlay: &Overlay,
    outcome: &SearchOutcome,
    start: Coord,
    end: Coord,
) -> Result<Route, PlanError> {
    let mut decoder = Decoder {
        graph,
        overlay,
        start,
        end,
        segments: Vec::new(),
        carry: Duration::zero(),
        riding: false,
    };

    for edge in &outcome.path {
        match edge.kind {
            EdgeKind::Board(i) => decoder.board(edge, i)?,
            EdgeKind::Alight(i) => decoder.alight(edge, i)?,
            EdgeKind::Direct => {
                let leg = overlay.direct().ok_or_else(|| {
                    PlanError::Inconsistent("direct edge missing from overlay".into())
                })?;
                let from = decoder.start_endpoint();
                let to = decoder.end_endpoint();
                decoder.bike(from, to, leg, edge.weight);
            }
            EdgeKind::Travel => decoder.travel(edge)?,
            EdgeKind::Interchange => decoder.interchange(edge)?,
        }
        decoder.riding = edge.kind == EdgeKind::Travel;
    }

    let is_direct_bike = !outcome
        .path
        .iter()
        .any(|e| matches!(e.to, Node::Layer(_)));

    let route = Route {
        segments: decoder.segments,
        total_duration: outcome.total,
        is_direct_bike,
        transit_comparison: None,
    };

    let sum = route.segment_duration_sum();
    if sum != outcome.total {
        return Err(PlanError::Inconsistent(format!(
            "segments sum to {} ms but the search total is {} ms",
            sum.num_milliseconds(),
            outcome.total.num_milliseconds()
        )));
    }

    Ok(route)
}
