//! Journey planner combining cycling with the transit network.
//!
//! A request is answered in four steps:
//! - the injector attaches the start and end coordinates to nearby
//!   stations through the bike provider,
//! - the engine runs a shortest-path search over the layered graph plus
//!   those attachment edges,
//! - the reconstructor decodes the path into bike, tube and line-change
//!   segments,
//! - the comparator prices the same trip walking to the network instead.

mod compare;
mod config;
mod engine;
mod error;
mod inject;
mod overlay;
mod plan;
mod reconstruct;
mod request;
mod route;

#[cfg(test)]
mod testing;

pub use compare::transit_only;
pub use config::PlannerConfig;
pub use engine::{CostModel, EdgeKind, Node, PathEdge, SearchOutcome, shortest_path};
pub use error::{NoRouteReason, PlanError};
pub use inject::{AttachStats, Attachment, attach};
pub use overlay::{AccessLeg, AccessMode, Overlay, StationAccess};
pub use plan::Planner;
pub use reconstruct::reconstruct;
pub use request::{RouteRequest, RoutingParams};
pub use route::{
    BikeSegment, Endpoint, LineChangeSegment, Route, Segment, TransitComparison, TubeSegment,
};
