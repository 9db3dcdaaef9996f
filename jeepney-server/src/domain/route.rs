//! Route identity types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable numeric identifier of a jeepney route.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub u32);

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of travel along a route.
///
/// Every route has a forward geometry. Some routes also carry a distinct
/// reverse geometry for the opposite direction (jeepneys often use a
/// different street on the way back).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Returns the direction as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

/// Identifies one directed geometry: a route plus a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey {
    pub id: RouteId,
    pub direction: Direction,
}

impl RouteKey {
    /// The forward geometry of a route.
    pub fn forward(id: RouteId) -> Self {
        Self {
            id,
            direction: Direction::Forward,
        }
    }

    /// The reverse geometry of a route.
    pub fn reverse(id: RouteId) -> Self {
        Self {
            id,
            direction: Direction::Reverse,
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.id, self.direction.as_str())
    }
}

/// Descriptive information about a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    /// Stable identifier.
    pub id: RouteId,

    /// Signboard code, e.g. "04L".
    pub code: String,

    /// Terminal at the start of the forward geometry.
    pub start_terminal: String,

    /// Terminal at the end of the forward geometry.
    pub end_terminal: String,
}

impl RouteInfo {
    /// Create route info.
    pub fn new(
        id: RouteId,
        code: impl Into<String>,
        start_terminal: impl Into<String>,
        end_terminal: impl Into<String>,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            start_terminal: start_terminal.into(),
            end_terminal: end_terminal.into(),
        }
    }

    /// Human-readable name, e.g. "04L Lahug - Carbon".
    pub fn display_name(&self) -> String {
        format!("{} {} - {}", self.code, self.start_terminal, self.end_terminal)
    }
}
