//! Geometry store error types.

use crate::domain::RouteKey;

/// Errors from a geometry store query.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// No geometry stored under this key
    #[error("unknown route {0}")]
    UnknownRoute(RouteKey),

    /// A route's geometry cannot answer the query (unparseable, empty
    /// extraction)
    #[error("degenerate geometry on route {route}: {reason}")]
    DegenerateGeometry {
        route: RouteKey,
        reason: &'static str,
    },

    /// Query arguments are inconsistent (e.g. sub-line end before start)
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The store could not be reached or failed to execute the query
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The query exceeded the store's statement timeout
    #[error("store query timed out")]
    Timeout,
}

impl StoreError {
    /// True if the failure concerns one route's data only, so a search
    /// over many candidates can skip that candidate and continue.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, StoreError::DegenerateGeometry { .. })
    }

    /// True if retrying the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout)
    }
}
