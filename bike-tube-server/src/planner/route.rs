//! Planned routes as returned to callers.

use chrono::Duration;

use crate::network::{Coord, LineId, StationId};

/// A named place a segment starts or ends at.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub name: String,
    pub coord: Coord,
    /// Set when the place is a station.
    pub station: Option<StationId>,
}

/// Cycling between an endpoint and a station, or end to end.
#[derive(Debug, Clone, PartialEq)]
pub struct BikeSegment {
    pub from: Endpoint,
    pub to: Endpoint,
    pub ride_duration: Duration,
    /// Station access and waiting time charged on top of the ride.
    pub buffer: Duration,
    pub duration: Duration,
    pub distance_km: f64,
    /// `[lon, lat]` pairs.
    pub geometry: Vec<[f64; 2]>,
}

/// A continuous ride on one line.
#[derive(Debug, Clone, PartialEq)]
pub struct TubeSegment {
    pub line: LineId,
    pub line_name: String,
    pub color: String,
    pub from_station: StationId,
    pub from_name: String,
    pub to_station: StationId,
    pub to_name: String,
    /// Number of inter-station hops.
    pub stops: usize,
    /// Names of the stations passed through without alighting.
    pub via: Vec<String>,
    /// Access buffer for an endpoint that is itself this station.
    pub access_buffer: Duration,
    pub duration: Duration,
}

/// Changing between lines at one station.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChangeSegment {
    pub station: StationId,
    pub station_name: String,
    pub from_line: LineId,
    pub to_line: LineId,
    pub penalty: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Bike(BikeSegment),
    Tube(TubeSegment),
    LineChange(LineChangeSegment),
}

impl Segment {
    pub fn duration(&self) -> Duration {
        match self {
            Segment::Bike(b) => b.duration,
            Segment::Tube(t) => t.duration,
            Segment::LineChange(c) => c.penalty,
        }
    }
}

/// The transit-only baseline for the same trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitComparison {
    pub duration: Duration,
    /// Walking part of `duration`, excluding buffers.
    pub walk_duration: Duration,
    pub line_changes: usize,
}

/// A complete itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub segments: Vec<Segment>,
    pub total_duration: Duration,
    /// No transit is used at all.
    pub is_direct_bike: bool,
    pub transit_comparison: Option<TransitComparison>,
}

impl Route {
    /// The route for a trip that starts where it ends.
    pub fn empty() -> Self {
        Self {
            segments: Vec::new(),
            total_duration: Duration::zero(),
            is_direct_bike: true,
            transit_comparison: None,
        }
    }

    pub fn line_changes(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::LineChange(_)))
            .count()
    }

    pub fn bike_distance_km(&self) -> f64 {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Bike(b) => Some(b.distance_km),
                _ => None,
            })
            .sum()
    }

    pub fn bike_segments(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Bike(_)))
            .count()
    }

    /// Sum of segment durations; equals `total_duration`.
    pub fn segment_duration_sum(&self) -> Duration {
        self.segments
            .iter()
            .fold(Duration::zero(), |acc, s| acc + s.duration())
    }
}
