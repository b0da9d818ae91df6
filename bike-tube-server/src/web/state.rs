//! Application state for the web layer.

use std::sync::Arc;

use crate::bike::ConfiguredRouter;
use crate::cache::CachedBikeRouter;
use crate::planner::Planner;

/// The bike provider the server runs with: the configured backend behind
/// the leg cache.
pub type ServerRouter = CachedBikeRouter<ConfiguredRouter>;

/// Shared application state.
///
/// The planner owns the static graph and the provider; handlers only
/// read through it.
pub struct AppState<P = ServerRouter> {
    pub planner: Arc<Planner<P>>,
}

impl<P> AppState<P> {
    /// Create a new app state.
    pub fn new(planner: Planner<P>) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            planner: Arc::clone(&self.planner),
        }
    }
}
