//! Domain error types.
//!
//! These errors represent validation failures when assembling itineraries.
//! They are distinct from store and IO errors.

use super::{RouteId, RouteKey};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// Segment has no coordinates
    #[error("segment on route {0} has no coordinates")]
    EmptySegment(RouteKey),

    /// Invalid segment construction (e.g., end before start)
    #[error("invalid segment: {0}")]
    InvalidSegment(&'static str),

    /// Both legs of a transfer ride the same route
    #[error("transfer legs must ride different routes (both on route {0})")]
    SameRouteTransfer(RouteId),
}
