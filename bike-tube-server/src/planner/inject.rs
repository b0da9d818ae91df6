//! Attaching the request's start and end coordinates to the network.
//!
//! For each endpoint, stations are pre-filtered by straight-line distance,
//! then priced by the bike provider with bounded concurrency. Stations
//! that coincide with an endpoint are attached without a provider call.
//! Provider failures only shrink the candidate set.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Duration;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::bike::{BikeLeg, BikeRouter, ProviderError};
use crate::network::{Coord, NearbyStation, StationIndex, TransitGraph};

use super::config::PlannerConfig;
use super::overlay::{AccessLeg, Overlay, StationAccess};
use super::request::RoutingParams;

/// Which end of the trip a call attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Origin,
    Destination,
}

/// Result of one provider call.
enum Priced {
    Accepted(BikeLeg),
    OverBudget,
    Failed,
    Skipped,
}

/// Counters for one attachment run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachStats {
    pub at_station: usize,
    pub provider_calls: usize,
    pub accepted: usize,
    pub over_budget: usize,
    pub failures: usize,
    pub skipped: usize,
}

impl AttachStats {
    fn record(&mut self, outcome: &Priced) {
        match outcome {
            Priced::Accepted(_) => {
                self.provider_calls += 1;
                self.accepted += 1;
            }
            Priced::OverBudget => {
                self.provider_calls += 1;
                self.over_budget += 1;
            }
            Priced::Failed => {
                self.provider_calls += 1;
                self.failures += 1;
            }
            Priced::Skipped => self.skipped += 1,
        }
    }

    fn merge(&mut self, other: AttachStats) {
        self.at_station += other.at_station;
        self.provider_calls += other.provider_calls;
        self.accepted += other.accepted;
        self.over_budget += other.over_budget;
        self.failures += other.failures;
        self.skipped += other.skipped;
    }
}

/// Overlay for one request plus what it took to build it.
#[derive(Debug)]
pub struct Attachment {
    pub overlay: Overlay,
    pub stats: AttachStats,
}

struct Injector<'a, P> {
    graph: &'a TransitGraph,
    router: &'a P,
    config: &'a PlannerConfig,
    params: &'a RoutingParams,
    /// Set once a failure shows further calls are pointless.
    stop: AtomicBool,
}

impl<P: BikeRouter> Injector<'_, P> {
    async fn price(&self, from: Coord, to: Coord) -> Priced {
        if self.stop.load(Ordering::Relaxed) {
            return Priced::Skipped;
        }

        let call = self.router.route(from, to);
        let result = match tokio::time::timeout(self.config.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout),
        };

        match result {
            Ok(leg) if leg.duration <= self.params.max_bike => Priced::Accepted(leg),
            Ok(leg) => {
                debug!(
                    minutes = crate::minutes::to_minutes(leg.duration),
                    "Bike leg over budget"
                );
                Priced::OverBudget
            }
            Err(e) => {
                if e.is_systemic() && !self.stop.swap(true, Ordering::Relaxed) {
                    warn!(
                        provider = self.router.name(),
                        error = %e,
                        "Bike provider unusable, skipping remaining calls"
                    );
                }
                debug!(error = %e, kind = ?e.kind(), "Bike provider call failed");
                Priced::Failed
            }
        }
    }

    /// Split nearby stations into coincident ones and provider candidates.
    fn candidates(&self, point: Coord) -> (Vec<StationIndex>, Vec<NearbyStation>) {
        let coincident_km = self.config.coincident_radius_m / 1000.0;
        let radius_km = self.config.prefilter_radius_km(self.params.max_bike);

        let nearby = self.graph.stations_within(point, radius_km.max(coincident_km));
        let (coincident, rest): (Vec<_>, Vec<_>) =
            nearby.into_iter().partition(|n| n.distance_km <= coincident_km);

        let mut candidates: Vec<_> = rest
            .into_iter()
            .filter(|n| n.distance_km <= radius_km)
            .collect();
        candidates.truncate(self.config.max_candidates);

        (coincident.into_iter().map(|n| n.station).collect(), candidates)
    }

    /// Attach one endpoint, leaving out the stations in `exclude`.
    async fn attach_side(
        &self,
        side: Side,
        point: Coord,
        exclude: &[StationIndex],
    ) -> (Vec<StationAccess>, AttachStats) {
        let (coincident, mut candidates) = self.candidates(point);
        candidates.retain(|n| !exclude.contains(&n.station));
        let mut stats = AttachStats::default();

        let mut edges: Vec<StationAccess> = coincident
            .iter()
            .filter(|s| !exclude.contains(s))
            .map(|&station| StationAccess {
                station,
                leg: AccessLeg::at_station(),
            })
            .collect();
        stats.at_station = edges.len();

        let priced: Vec<(StationIndex, Priced)> = stream::iter(candidates)
            .map(|candidate| async move {
                let station = self.graph.station(candidate.station).coord;
                let (from, to) = match side {
                    Side::Origin => (point, station),
                    Side::Destination => (station, point),
                };
                (candidate.station, self.price(from, to).await)
            })
            .buffer_unordered(self.config.max_concurrent_calls.max(1))
            .collect()
            .await;

        for (station, outcome) in priced {
            stats.record(&outcome);
            if let Priced::Accepted(leg) = outcome {
                edges.push(StationAccess {
                    station,
                    leg: AccessLeg::bike(leg),
                });
            }
        }

        debug!(?side, ?stats, "Attached endpoint");
        (edges, stats)
    }

    async fn attach_direct(&self) -> (Option<AccessLeg>, AttachStats) {
        let mut stats = AttachStats::default();
        let (start, end) = (self.params.start, self.params.end);
        // The end may sit just past the radius on a station inside it
        let radius_km = self.config.prefilter_radius_km(self.params.max_bike)
            + self.config.coincident_radius_m / 1000.0;

        if self.params.max_bike <= Duration::zero() || start.distance_km(&end) > radius_km {
            return (None, stats);
        }

        let outcome = self.price(start, end).await;
        stats.record(&outcome);
        match outcome {
            Priced::Accepted(leg) => (Some(AccessLeg::bike(leg)), stats),
            _ => (None, stats),
        }
    }
}

/// Build the request overlay.
///
/// Origin calls, destination calls and the direct call run concurrently.
/// Dropping the returned future abandons every outstanding call.
pub async fn attach<P: BikeRouter>(
    graph: &TransitGraph,
    router: &P,
    config: &PlannerConfig,
    params: &RoutingParams,
) -> Attachment {
    let injector = Injector {
        graph,
        router,
        config,
        params,
        stop: AtomicBool::new(false),
    };

    // Boarding and alighting at one station is an empty tube trip. A
    // station coincident with an end is only reached from that end, and
    // one coincident with both belongs to the origin.
    let (origin_coincident, _) = injector.candidates(params.start);
    let (mut destination_coincident, _) = injector.candidates(params.end);
    destination_coincident.retain(|s| !origin_coincident.contains(s));

    let (origin, destination, direct) = tokio::join!(
        injector.attach_side(Side::Origin, params.start, &destination_coincident),
        injector.attach_side(Side::Destination, params.end, &origin_coincident),
        injector.attach_direct(),
    );
    let (origin, origin_stats) = origin;
    let (destination, destination_stats) = destination;
    let (direct, direct_stats) = direct;

    let mut stats = origin_stats;
    stats.merge(destination_stats);
    stats.merge(direct_stats);

    Attachment {
        overlay: Overlay::new(origin, destination, direct),
        stats,
    }
}
