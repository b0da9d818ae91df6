//! Per-request planning errors.

use std::fmt;

/// Why no route could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoRouteReason {
    /// No station could be reached from the start and no direct ride exists.
    NoOriginStations,
    /// No station could reach the end and no direct ride exists.
    NoDestinationStations,
    /// Both ends attached but the search frontier ran out.
    Unreachable,
}

impl fmt::Display for NoRouteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoRouteReason::NoOriginStations => "no station reachable by bike from the start",
            NoRouteReason::NoDestinationStations => "no station within cycling range of the end",
            NoRouteReason::Unreachable => "no connection between the candidate stations",
        })
    }
}

/// Error from journey planning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// Request rejected before any graph work
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No feasible journey
    #[error("no route found: {reason}")]
    RouteNotFound { reason: NoRouteReason },

    /// The request deadline passed before the search could run
    #[error("request cancelled: deadline exceeded")]
    Cancelled,

    /// Reconstructed route disagrees with the search result
    #[error("internal inconsistency: {0}")]
    Inconsistent(String),
}

impl PlanError {
    pub(crate) fn not_found(reason: NoRouteReason) -> Self {
        PlanError::RouteNotFound { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            PlanError::not_found(NoRouteReason::NoOriginStations).to_string(),
            "no route found: no station reachable by bike from the start"
        );
        assert_eq!(
            PlanError::InvalidInput("start: bad".into()).to_string(),
            "invalid input: start: bad"
        );
        assert_eq!(
            PlanError::Cancelled.to_string(),
            "request cancelled: deadline exceeded"
        );
    }
}
