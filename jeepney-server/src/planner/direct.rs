//! Single-route resolvers.
//!
//! A direct trip boards and alights the same directed geometry. When the
//! destination lies further along the line than the origin the rider simply
//! stays on ("forward"). When it lies behind, the rider stays on past the
//! route's last vertex and around to its first ("loop-around"), which the
//! planner only considers once no forward ride exists.

use crate::domain::{DirectTrip, Fraction, Itinerary, RouteSegment};
use crate::store::GeometryStore;

use super::config::PlannerConfig;
use super::proximity::SharedRoute;
use super::resolver::{PlanContext, Resolve, skip_candidate};
use super::search::PlanError;

/// Rides where the destination lies ahead of the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForwardResolver;

/// Rides that continue past the route end back to its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopAroundResolver;

fn is_forward(shared: &SharedRoute<'_>) -> bool {
    shared.destination.position > shared.origin.position
}

fn is_loop_around(shared: &SharedRoute<'_>) -> bool {
    shared.destination.position < shared.origin.position
}

impl Resolve for ForwardResolver {
    fn name(&self) -> &'static str {
        "forward"
    }

    fn can_handle(&self, ctx: &PlanContext) -> bool {
        ctx.shared_routes().iter().any(is_forward)
    }

    async fn resolve<S: GeometryStore>(
        &self,
        store: &S,
        ctx: &PlanContext,
        config: &PlannerConfig,
    ) -> Result<Vec<Itinerary>, PlanError> {
        let mut candidates = Vec::new();
        for shared in ctx.shared_routes().into_iter().filter(is_forward) {
            match forward_trip(store, shared, config).await {
                Ok(trip) => candidates.push(trip),
                Err(e) => skip_candidate(e, &shared.origin.key)?,
            }
        }
        Ok(best_direct(candidates).map(Itinerary::Direct).into_iter().collect())
    }
}

impl Resolve for LoopAroundResolver {
    fn name(&self) -> &'static str {
        "loop_around"
    }

    fn can_handle(&self, ctx: &PlanContext) -> bool {
        ctx.shared_routes().iter().any(is_loop_around)
    }

    async fn resolve<S: GeometryStore>(
        &self,
        store: &S,
        ctx: &PlanContext,
        config: &PlannerConfig,
    ) -> Result<Vec<Itinerary>, PlanError> {
        let mut candidates = Vec::new();
        for shared in ctx.shared_routes().into_iter().filter(is_loop_around) {
            match loop_around_trip(store, shared, config).await {
                Ok(trip) => candidates.push(trip),
                Err(e) => skip_candidate(e, &shared.origin.key)?,
            }
        }
        Ok(best_direct(candidates).map(Itinerary::Direct).into_iter().collect())
    }
}

async fn forward_trip<S: GeometryStore>(
    store: &S,
    shared: SharedRoute<'_>,
    config: &PlannerConfig,
) -> Result<DirectTrip, PlanError> {
    let (origin, destination) = (shared.origin, shared.destination);
    let ride = store
        .extract_subline(origin.key, origin.position, destination.position)
        .await?;

    let segment = RouteSegment::new(
        origin.route.clone(),
        origin.key,
        origin.position,
        destination.position,
        ride.coordinates,
        ride.distance_m,
        config.fare_model.fare(ride.distance_m),
    )?;

    Ok(DirectTrip {
        segment,
        boarding_walk_m: origin.distance_m,
        alighting_walk_m: destination.distance_m,
    })
}

async fn loop_around_trip<S: GeometryStore>(
    store: &S,
    shared: SharedRoute<'_>,
    config: &PlannerConfig,
) -> Result<DirectTrip, PlanError> {
    let (origin, destination) = (shared.origin, shared.destination);
    let to_end = store
        .extract_subline(origin.key, origin.position, Fraction::END)
        .await?;
    let from_start = store
        .extract_subline(origin.key, Fraction::START, destination.position)
        .await?;

    // One ride: priced once on the combined distance.
    let distance_m = to_end.distance_m + from_start.distance_m;
    let mut coordinates = to_end.coordinates;
    for coordinate in from_start.coordinates {
        if coordinates.last() != Some(&coordinate) {
            coordinates.push(coordinate);
        }
    }

    let segment = RouteSegment::wrapping(
        origin.route.clone(),
        origin.key,
        origin.position,
        destination.position,
        coordinates,
        distance_m,
        config.fare_model.fare(distance_m),
    )?;

    Ok(DirectTrip {
        segment,
        boarding_walk_m: origin.distance_m,
        alighting_walk_m: destination.distance_m,
    })
}

/// Least walking, then shortest ride, then lowest route key.
fn best_direct(candidates: Vec<DirectTrip>) -> Option<DirectTrip> {
    candidates.into_iter().min_by(|a, b| {
        let walk = |t: &DirectTrip| t.boarding_walk_m + t.alighting_walk_m;
        walk(a)
            .total_cmp(&walk(b))
            .then_with(|| a.segment.distance_m().total_cmp(&b.segment.distance_m()))
            .then_with(|| a.segment.key().cmp(&b.segment.key()))
    })
}
