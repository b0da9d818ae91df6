//! Request-scoped attachment edges.
//!
//! An [`Overlay`] holds the virtual start and end nodes' edges for one
//! request. The static graph is never touched; the overlay is built once,
//! read by the engine and the reconstructor, then dropped.

use std::collections::HashMap;

use chrono::Duration;

use crate::bike::BikeLeg;
use crate::network::{Coord, StationIndex};

/// How an endpoint reaches a station (or the other endpoint).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Bike,
    Walk,
    /// The endpoint coincides with the station.
    AtStation,
}

/// The movement part of an attachment edge, before buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessLeg {
    pub mode: AccessMode,
    pub duration: Duration,
    pub distance_km: f64,
    pub geometry: Vec<[f64; 2]>,
}

impl AccessLeg {
    pub fn bike(leg: BikeLeg) -> Self {
        Self {
            mode: AccessMode::Bike,
            duration: leg.duration,
            distance_km: leg.distance_km,
            geometry: leg.geometry,
        }
    }

    /// Geometry to draw, falling back to the straight line between endpoints.
    pub fn geometry_or_straight(&self, from: Coord, to: Coord) -> Vec<[f64; 2]> {
        if self.geometry.is_empty() {
            vec![from.lon_lat(), to.lon_lat()]
        } else {
            self.geometry.clone()
        }
    }

    pub fn walk(duration: Duration, distance_km: f64) -> Self {
        Self {
            mode: AccessMode::Walk,
            duration,
            distance_km,
            geometry: Vec::new(),
        }
    }

    pub fn at_station() -> Self {
        Self {
            mode: AccessMode::AtStation,
            duration: Duration::zero(),
            distance_km: 0.0,
            geometry: Vec::new(),
        }
    }
}

/// An endpoint attached to every layer of one station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationAccess {
    pub station: StationIndex,
    pub leg: AccessLeg,
}

/// Attachment edges for one request.
#[derive(Debug, Default)]
pub struct Overlay {
    origin: Vec<StationAccess>,
    destination: Vec<StationAccess>,
    destination_lookup: HashMap<StationIndex, usize>,
    direct: Option<AccessLeg>,
}

impl Overlay {
    /// Assemble an overlay from collected edges.
    ///
    /// Edges are ordered by station index so the result does not depend
    /// on the order provider calls completed in. If a station appears
    /// twice on one side the faster leg is kept.
    pub fn new(
        origin: Vec<StationAccess>,
        destination: Vec<StationAccess>,
        direct: Option<AccessLeg>,
    ) -> Self {
        let origin = normalise(origin);
        let destination = normalise(destination);
        let destination_lookup = destination
            .iter()
            .enumerate()
            .map(|(i, access)| (access.station, i))
            .collect();

        Self {
            origin,
            destination,
            destination_lookup,
            direct,
        }
    }

    /// Edges from the virtual start.
    pub fn origin(&self) -> &[StationAccess] {
        &self.origin
    }

    /// Edges into the virtual end.
    pub fn destination(&self) -> &[StationAccess] {
        &self.destination
    }

    /// Index into [`Self::destination`] of the edge leaving `station`.
    pub fn destination_from(&self, station: StationIndex) -> Option<usize> {
        self.destination_lookup.get(&station).copied()
    }

    /// The start-to-end edge, if any.
    pub fn direct(&self) -> Option<&AccessLeg> {
        self.direct.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.origin.is_empty() && self.destination.is_empty() && self.direct.is_none()
    }
}

fn normalise(mut edges: Vec<StationAccess>) -> Vec<StationAccess> {
    edges.sort_by(|a, b| {
        a.station
            .cmp(&b.station)
            .then(a.leg.duration.cmp(&b.leg.duration))
    });
    edges.dedup_by_key(|access| access.station);
    edges
}
