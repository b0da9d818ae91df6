//! Shared fixtures for planner tests.

use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration as StdDuration;

use crate::bike::{BikeLeg, BikeRouter, MockRouter, ProviderError};
use crate::network::{Coord, TransitGraph};

/// The bundled London sample network, loaded once per test binary.
pub fn sample_graph() -> Arc<TransitGraph> {
    static GRAPH: OnceLock<Arc<TransitGraph>> = OnceLock::new();
    GRAPH
        .get_or_init(|| {
            let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_network.json");
            Arc::new(TransitGraph::load(path).unwrap())
        })
        .clone()
}

type FailFn = Box<dyn Fn(Coord, Coord) -> Option<ProviderError> + Send + Sync>;

/// Router priced like [`MockRouter`], with scripted failures, an optional
/// delay, and a record of every call.
pub struct ScriptedRouter {
    pub inner: MockRouter,
    pub fail: FailFn,
    pub delay: Option<StdDuration>,
    pub calls: Mutex<Vec<(Coord, Coord)>>,
}

impl ScriptedRouter {
    pub fn new() -> Self {
        Self {
            inner: MockRouter::default(),
            fail: Box::new(|_, _| None),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(
        fail: impl Fn(Coord, Coord) -> Option<ProviderError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            fail: Box::new(fail),
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl BikeRouter for ScriptedRouter {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn route(&self, from: Coord, to: Coord) -> Result<BikeLeg, ProviderError> {
        self.calls.lock().unwrap().push((from, to));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = (self.fail)(from, to) {
            return Err(err);
        }
        self.inner.leg(from, to)
    }
}
