//! Resolver strategies.
//!
//! Each strategy turns the two proximity match lists into candidate
//! itineraries. The planner runs them in a fixed order and decides which
//! ones to skip based on what earlier strategies found.

use std::future::Future;

use tracing::warn;

use crate::domain::{Coordinate, Itinerary};
use crate::store::{GeometryStore, RouteProximityMatch};

use super::config::PlannerConfig;
use super::direct::{ForwardResolver, LoopAroundResolver};
use super::proximity::{SharedRoute, shared_routes};
use super::search::PlanError;
use super::transfer::TransferResolver;

/// Everything a strategy needs to know about one plan request.
#[derive(Debug, Clone)]
pub struct PlanContext {
    pub origin: Coordinate,
    pub destination: Coordinate,

    /// Routes within walking distance of the origin, nearest first.
    pub origin_matches: Vec<RouteProximityMatch>,

    /// Routes within walking distance of the destination, nearest first.
    pub destination_matches: Vec<RouteProximityMatch>,

    pub include_transfers: bool,
}

impl PlanContext {
    /// Geometries that serve both ends of the trip.
    pub fn shared_routes(&self) -> Vec<SharedRoute<'_>> {
        shared_routes(&self.origin_matches, &self.destination_matches)
    }
}

/// A way of resolving a plan request into itineraries.
pub trait Resolve {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Cheap check, without store queries, that `resolve` could find something.
    fn can_handle(&self, ctx: &PlanContext) -> bool;

    /// Candidate itineraries, unranked.
    fn resolve<S: GeometryStore>(
        &self,
        store: &S,
        ctx: &PlanContext,
        config: &PlannerConfig,
    ) -> impl Future<Output = Result<Vec<Itinerary>, PlanError>> + Send;
}

/// The resolver strategies, in the order the planner tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Forward(ForwardResolver),
    LoopAround(LoopAroundResolver),
    Transfer(TransferResolver),
}

impl Strategy {
    /// Forward, then loop-around, then transfer.
    pub fn default_order() -> Vec<Strategy> {
        vec![
            Strategy::Forward(ForwardResolver),
            Strategy::LoopAround(LoopAroundResolver),
            Strategy::Transfer(TransferResolver),
        ]
    }

    /// Returns true if this strategy produces transfer itineraries.
    pub fn is_transfer(&self) -> bool {
        matches!(self, Strategy::Transfer(_))
    }
}

impl Resolve for Strategy {
    fn name(&self) -> &'static str {
        match self {
            Strategy::Forward(r) => r.name(),
            Strategy::LoopAround(r) => r.name(),
            Strategy::Transfer(r) => r.name(),
        }
    }

    fn can_handle(&self, ctx: &PlanContext) -> bool {
        match self {
            Strategy::Forward(r) => r.can_handle(ctx),
            Strategy::LoopAround(r) => r.can_handle(ctx),
            Strategy::Transfer(r) => r.can_handle(ctx),
        }
    }

    async fn resolve<S: GeometryStore>(
        &self,
        store: &S,
        ctx: &PlanContext,
        config: &PlannerConfig,
    ) -> Result<Vec<Itinerary>, PlanError> {
        match self {
            Strategy::Forward(r) => r.resolve(store, ctx, config).await,
            Strategy::LoopAround(r) => r.resolve(store, ctx, config).await,
            Strategy::Transfer(r) => r.resolve(store, ctx, config).await,
        }
    }
}

/// Decide whether a failed candidate can be dropped or must fail the plan.
///
/// Degenerate geometry and itineraries that fail domain validation only
/// affect one candidate. Anything else (store unavailable, unknown route)
/// is propagated so partial results are never presented as complete.
pub(crate) fn skip_candidate(err: PlanError, candidate: &dyn std::fmt::Display) -> Result<(), PlanError> {
    match err {
        PlanError::Store(e) if e.is_degenerate() => {
            warn!(%candidate, error = %e, "skipping candidate on degenerate geometry");
            Ok(())
        }
        PlanError::Domain(e) => {
            warn!(%candidate, error = %e, "skipping invalid candidate");
            Ok(())
        }
        other => Err(other),
    }
}
