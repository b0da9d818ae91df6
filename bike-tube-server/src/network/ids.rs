//! Identifier types for stations, lines and layers.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an empty or malformed identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} id: {reason}")]
pub struct InvalidId {
    kind: &'static str,
    reason: &'static str,
}

fn check(kind: &'static str, s: &str) -> Result<(), InvalidId> {
    if s.is_empty() {
        return Err(InvalidId {
            kind,
            reason: "must not be empty",
        });
    }
    if s.chars().any(char::is_whitespace) {
        return Err(InvalidId {
            kind,
            reason: "must not contain whitespace",
        });
    }
    Ok(())
}

/// A station identifier as supplied by the dataset (e.g. a NaPTAN code).
///
/// Non-empty and free of whitespace by construction.
///
/// ```
/// use bike_tube_server::network::StationId;
///
/// let bank = StationId::parse("940GZZLUBNK").unwrap();
/// assert_eq!(bank.as_str(), "940GZZLUBNK");
/// assert!(StationId::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId(Arc<str>);

impl StationId {
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        check("station", s)?;
        Ok(Self(Arc::from(s)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StationId {
    type Error = InvalidId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.0.to_string()
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.as_str())
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line identifier, normalised to lowercase (e.g. `"jubilee"`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineId(Arc<str>);

impl LineId {
    /// Parse a line id, lowercasing it.
    pub fn parse(s: &str) -> Result<Self, InvalidId> {
        check("line", s)?;
        Ok(Self(Arc::from(s.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LineId {
    type Error = InvalidId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<LineId> for String {
    fn from(id: LineId) -> Self {
        id.0.to_string()
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.as_str())
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite identity of a layer node: "at this station, riding this line".
///
/// Two layer nodes of the same station differ only in their line, which is
/// what lets the search charge a line change when it moves between them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerKey {
    pub station: StationId,
    pub line: LineId,
}

impl LayerKey {
    pub fn new(station: StationId, line: LineId) -> Self {
        Self { station, line }
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.station, self.line)
    }
}

/// Index of a station in a [`TransitGraph`](super::TransitGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationIndex(pub usize);

/// Index of a line in a [`TransitGraph`](super::TransitGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineIndex(pub usize);

/// Index of a layer node in a [`TransitGraph`](super::TransitGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerIndex(pub usize);
