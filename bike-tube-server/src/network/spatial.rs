//! Spatial lookup of stations around a coordinate.
//!
//! Two-stage filter: an R-tree envelope query in degree space narrows the
//! set cheaply, then the exact haversine distance decides membership.

use std::fmt;

use rstar::{AABB, RTree, RTreeObject};

use super::coord::Coord;
use super::ids::StationIndex;

/// Kilometres per degree on the haversine sphere, rounded down so the
/// envelope always contains the search circle.
const KM_PER_DEGREE: f64 = 110.0;

#[derive(Debug, Clone)]
struct StationPoint {
    station: StationIndex,
    coord: Coord,
}

impl RTreeObject for StationPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.coord.lon_lat())
    }
}

/// A station found near a coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyStation {
    pub station: StationIndex,
    pub distance_km: f64,
}

/// R-tree over station positions.
pub struct StationLocator {
    tree: RTree<StationPoint>,
}

impl fmt::Debug for StationLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StationLocator")
            .field("stations", &self.tree.size())
            .finish()
    }
}

impl StationLocator {
    pub fn new(coords: impl IntoIterator<Item = (StationIndex, Coord)>) -> Self {
        let points = coords
            .into_iter()
            .map(|(station, coord)| StationPoint { station, coord })
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    /// All stations within `radius_km` of `origin`, nearest first.
    ///
    /// Equal distances are ordered by station index so the result is a
    /// stable prefix of one global ordering: a larger radius only ever
    /// appends stations.
    pub fn within(&self, origin: Coord, radius_km: f64) -> Vec<NearbyStation> {
        if !radius_km.is_finite() || radius_km < 0.0 {
            return Vec::new();
        }

        let dlat = radius_km / KM_PER_DEGREE;
        // Widest longitude span is at the poleward edge of the circle.
        let cos_lat = (origin.lat.abs() + dlat).min(90.0).to_radians().cos();
        let dlon = if cos_lat < 1e-3 {
            360.0
        } else {
            radius_km / (KM_PER_DEGREE * cos_lat)
        };

        let envelope = AABB::from_corners(
            [(origin.lon - dlon).max(-180.0), (origin.lat - dlat).max(-90.0)],
            [(origin.lon + dlon).min(180.0), (origin.lat + dlat).min(90.0)],
        );

        let mut found: Vec<NearbyStation> = self
            .tree
            .locate_in_envelope(&envelope)
            .filter_map(|p| {
                let distance_km = origin.distance_km(&p.coord);
                (distance_km <= radius_km).then_some(NearbyStation {
                    station: p.station,
                    distance_km,
                })
            })
            .collect();

        found.sort_by(|a, b| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then(a.station.cmp(&b.station))
        });
        found
    }

    /// Up to `limit` nearest stations no further than `max_km`.
    pub fn nearest(&self, origin: Coord, limit: usize, max_km: f64) -> Vec<NearbyStation> {
        let mut found = self.within(origin, max_km);
        found.truncate(limit);
        found
    }
}
