//! The bike-routing capability.

use std::future::Future;

use crate::network::Coord;

use super::error::ProviderError;
use super::leg::BikeLeg;

/// Anything that can price a cycle ride between two points.
///
/// This abstraction lets the planner run against a real routing service,
/// the offline mock, or a scripted test double.
pub trait BikeRouter: Send + Sync {
    /// Short name for logs and the status endpoint.
    fn name(&self) -> &str;

    /// Number of remembered legs, for routers that cache.
    fn cached_legs(&self) -> Option<u64> {
        None
    }

    /// Cycle route from `from` to `to`.
    fn route(
        &self,
        from: Coord,
        to: Coord,
    ) -> impl Future<Output = Result<BikeLeg, ProviderError>> + Send;
}

impl<R: BikeRouter> BikeRouter for std::sync::Arc<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn cached_legs(&self) -> Option<u64> {
        (**self).cached_legs()
    }

    fn route(
        &self,
        from: Coord,
        to: Coord,
    ) -> impl Future<Output = Result<BikeLeg, ProviderError>> + Send {
        (**self).route(from, to)
    }
}
