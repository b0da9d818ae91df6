//! The journey planner: attach, search, decode, compare.

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::bike::BikeRouter;
use crate::minutes;
use crate::network::TransitGraph;

use super::compare::transit_only;
use super::config::PlannerConfig;
use super::engine::{CostModel, shortest_path};
use super::error::{NoRouteReason, PlanError};
use super::inject::attach;
use super::reconstruct::reconstruct;
use super::request::RouteRequest;
use super::route::Route;

/// Bike + transit journey planner.
///
/// Holds the shared static graph and the bike provider. Every call to
/// [`Planner::plan`] works on private state, so one planner serves any
/// number of concurrent requests.
pub struct Planner<P> {
    graph: Arc<TransitGraph>,
    router: P,
    config: PlannerConfig,
}

impl<P: BikeRouter> Planner<P> {
    /// Create a new planner.
    pub fn new(graph: Arc<TransitGraph>, router: P, config: PlannerConfig) -> Self {
        Self {
            graph,
            router,
            config,
        }
    }

    pub fn graph(&self) -> &TransitGraph {
        &self.graph
    }

    pub fn router(&self) -> &P {
        &self.router
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a journey within the configured request timeout.
    pub async fn plan(&self, request: &RouteRequest) -> Result<Route, PlanError> {
        self.plan_until(request, Instant::now() + self.config.request_timeout)
            .await
    }

    /// Plan a journey, giving up with [`PlanError::Cancelled`] if the
    /// provider phase has not finished by `deadline`.
    pub async fn plan_until(
        &self,
        request: &RouteRequest,
        deadline: Instant,
    ) -> Result<Route, PlanError> {
        let params = request.validate()?;

        if params.start == params.end {
            debug!("Start and end coincide, returning empty route");
            return Ok(Route::empty());
        }

        let attaching = attach(&self.graph, &self.router, &self.config, &params);
        let attachment = tokio::time::timeout_at(deadline, attaching)
            .await
            .map_err(|_| PlanError::Cancelled)?;
        let overlay = attachment.overlay;

        if overlay.direct().is_none() {
            if overlay.origin().is_empty() {
                return Err(PlanError::not_found(NoRouteReason::NoOriginStations));
            }
            if overlay.destination().is_empty() {
                return Err(PlanError::not_found(NoRouteReason::NoDestinationStations));
            }
        }

        let costs = CostModel::from_params(&params);
        let outcome = shortest_path(&self.graph, &overlay, costs)
            .ok_or(PlanError::not_found(NoRouteReason::Unreachable))?;

        debug!(
            settled = outcome.settled,
            edges = outcome.path.len(),
            stats = ?attachment.stats,
            "Search complete"
        );

        let mut route = reconstruct(&self.graph, &overlay, &outcome, params.start, params.end)?;
        drop(overlay);

        route.transit_comparison =
            transit_only(&self.graph, &self.config, costs, params.start, params.end);

        info!(
            minutes = minutes::to_minutes(route.total_duration),
            segments = route.segments.len(),
            line_changes = route.line_changes(),
            direct = route.is_direct_bike,
            "Planned route"
        );

        Ok(route)
    }
}
