//! Provider selection from configuration.

use std::fmt;
use std::str::FromStr;

use crate::network::Coord;

use super::error::ProviderError;
use super::google::{GoogleConfig, GoogleRouter};
use super::graphhopper::{GraphHopperConfig, GraphHopperRouter};
use super::leg::BikeLeg;
use super::mock::MockRouter;
use super::osrm::{OsrmConfig, OsrmRouter};
use super::router::BikeRouter;

/// Which provider to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Osrm,
    Google,
    GraphHopper,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "osrm" => Ok(ProviderKind::Osrm),
            "google" => Ok(ProviderKind::Google),
            "graphhopper" => Ok(ProviderKind::GraphHopper),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(format!(
                "unknown bike provider {other:?} (expected osrm, google, graphhopper or mock)"
            )),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProviderKind::Osrm => "osrm",
            ProviderKind::Google => "google",
            ProviderKind::GraphHopper => "graphhopper",
            ProviderKind::Mock => "mock",
        })
    }
}

/// Everything needed to build any of the providers.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub osrm: OsrmConfig,
    pub google: GoogleConfig,
    pub graphhopper: GraphHopperConfig,
    pub mock: MockRouter,
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_osrm(mut self, osrm: OsrmConfig) -> Self {
        self.osrm = osrm;
        self
    }

    pub fn with_google(mut self, google: GoogleConfig) -> Self {
        self.google = google;
        self
    }

    pub fn with_graphhopper(mut self, graphhopper: GraphHopperConfig) -> Self {
        self.graphhopper = graphhopper;
        self
    }

    pub fn with_mock(mut self, mock: MockRouter) -> Self {
        self.mock = mock;
        self
    }
}

/// The provider chosen at startup.
#[derive(Debug, Clone)]
pub enum ConfiguredRouter {
    Osrm(OsrmRouter),
    Google(GoogleRouter),
    GraphHopper(GraphHopperRouter),
    Mock(MockRouter),
}

impl ConfiguredRouter {
    pub fn from_config(config: ProviderConfig) -> Result<Self, ProviderError> {
        Ok(match config.kind {
            ProviderKind::Osrm => ConfiguredRouter::Osrm(OsrmRouter::new(config.osrm)?),
            ProviderKind::Google => ConfiguredRouter::Google(GoogleRouter::new(config.google)?),
            ProviderKind::GraphHopper => {
                ConfiguredRouter::GraphHopper(GraphHopperRouter::new(config.graphhopper)?)
            }
            ProviderKind::Mock => ConfiguredRouter::Mock(config.mock),
        })
    }
}

impl BikeRouter for ConfiguredRouter {
    fn name(&self) -> &str {
        match self {
            ConfiguredRouter::Osrm(r) => r.name(),
            ConfiguredRouter::Google(r) => r.name(),
            ConfiguredRouter::GraphHopper(r) => r.name(),
            ConfiguredRouter::Mock(r) => r.name(),
        }
    }

    async fn route(&self, from: Coord, to: Coord) -> Result<BikeLeg, ProviderError> {
        match self {
            ConfiguredRouter::Osrm(r) => r.route(from, to).await,
            ConfiguredRouter::Google(r) => r.route(from, to).await,
            ConfiguredRouter::GraphHopper(r) => r.route(from, to).await,
            ConfiguredRouter::Mock(r) => r.route(from, to).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kind() {
        assert_eq!("osrm".parse::<ProviderKind>(), Ok(ProviderKind::Osrm));
        assert_eq!(" Google ".parse::<ProviderKind>(), Ok(ProviderKind::Google));
        assert_eq!("MOCK".parse::<ProviderKind>(), Ok(ProviderKind::Mock));
        assert_eq!(
            "graphhopper".parse::<ProviderKind>(),
            Ok(ProviderKind::GraphHopper)
        );
        assert_eq!(ProviderKind::GraphHopper.to_string(), "graphhopper");
        assert!("valhalla".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::default(), ProviderKind::Osrm);
    }

    #[test]
    fn builds_selected_variant() {
        let build = |kind| ConfiguredRouter::from_config(ProviderConfig::new(kind)).unwrap();

        assert_eq!(build(ProviderKind::Mock).name(), "mock");
        assert_eq!(build(ProviderKind::Osrm).name(), "osrm");
        assert_eq!(build(ProviderKind::Google).name(), "google");
        assert_eq!(build(ProviderKind::GraphHopper).name(), "graphhopper");
    }

    #[tokio::test]
    async fn delegates_to_variant() {
        let config = ProviderConfig::new(ProviderKind::Mock);
        let router = ConfiguredRouter::from_config(config).unwrap();
        let leg = router
            .route(Coord::new(51.5, -0.1), Coord::new(51.51, -0.1))
            .await
            .unwrap();
        assert!(leg.distance_km > 1.0);
    }
}
