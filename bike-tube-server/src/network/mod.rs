//! Static transit network: stations, lines and the multi-layer graph.
//!
//! The network is loaded once at startup from a JSON dataset and shared
//! read-only by every request.

mod colors;
mod coord;
mod dataset;
mod error;
mod graph;
mod ids;
mod spatial;

pub use colors::{DEFAULT_LINE_COLOR, display_name, known_line_color};
pub use coord::{Coord, InvalidCoord};
pub use dataset::{LineRecord, NetworkData, StationRecord, TravelEdgeRecord};
pub use error::NetworkError;
pub use graph::{LayerNode, Line, Station, TransitGraph, TravelEdge};
pub use ids::{InvalidId, LayerIndex, LayerKey, LineId, LineIndex, StationId, StationIndex};
pub use spatial::{NearbyStation, StationLocator};
