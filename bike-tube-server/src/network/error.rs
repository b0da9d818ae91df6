//! Errors raised while loading the static network.
//!
//! These are configuration-integrity faults: the search assumes a
//! well-formed graph, so any of them stops the process at startup.

use std::path::PathBuf;

use super::ids::{LayerKey, LineId, StationId};

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("failed to read network file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse network data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate station id {0}")]
    DuplicateStation(StationId),

    #[error("duplicate line id {0}")]
    DuplicateLine(LineId),

    #[error("duplicate layer node {0}")]
    DuplicateLayer(LayerKey),

    #[error("unknown station {station} referenced by {context}")]
    UnknownStation { station: StationId, context: String },

    #[error("unknown line {line} referenced by {context}")]
    UnknownLine { line: LineId, context: String },

    #[error("station {station} does not serve line {line} ({context})")]
    LineNotServed {
        station: StationId,
        line: LineId,
        context: String,
    },

    #[error("invalid travel time {minutes} on {line} between {from} and {to}")]
    InvalidTravelTime {
        from: StationId,
        to: StationId,
        line: LineId,
        minutes: f64,
    },

    #[error("invalid coordinates for station {station}: {reason}")]
    InvalidCoordinates { station: StationId, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = NetworkError::DuplicateStation(StationId::parse("940GZZLUBNK").unwrap());
        assert_eq!(err.to_string(), "duplicate station id 940GZZLUBNK");

        let err = NetworkError::InvalidTravelTime {
            from: StationId::parse("A").unwrap(),
            to: StationId::parse("B").unwrap(),
            line: LineId::parse("central").unwrap(),
            minutes: -1.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid travel time -1 on central between A and B"
        );
    }
}
