//! Bike segment providers.
//!
//! A provider prices a cycle ride between two coordinates. Several
//! interchangeable implementations exist behind the [`BikeRouter`] trait;
//! which one the server uses is decided once, from configuration.

mod configured;
mod error;
mod google;
mod graphhopper;
mod leg;
mod mock;
mod osrm;
pub mod polyline;
mod router;

pub use configured::{ConfiguredRouter, ProviderConfig, ProviderKind};
pub use error::{FailureKind, ProviderError};
pub use google::{GoogleConfig, GoogleRouter};
pub use graphhopper::{GraphHopperConfig, GraphHopperRouter};
pub use leg::BikeLeg;
pub use mock::MockRouter;
pub use osrm::{DEFAULT_OSRM_URL, OsrmConfig, OsrmRouter};
pub use router::BikeRouter;
