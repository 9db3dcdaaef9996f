//! Two-route trips joined at a transfer point.
//!
//! For every pair of a route near the origin (A) and a different route near
//! the destination (B), we walk along A from the boarding position in fixed
//! steps and ask the store for the closest point on B. Samples where B is
//! within the transfer tolerance, and where boarding B still leaves the
//! destination ahead, are candidate transfer points; the cheapest by ridden
//! distance plus the gap between the routes wins.

use futures::StreamExt;
use futures::stream::FuturesOrdered;

use crate::domain::{Fraction, Itinerary, RouteSegment, TransferPoint, TransferTrip};
use crate::store::{GeometryStore, RouteContact, RouteProximityMatch};

use super::config::PlannerConfig;
use super::resolver::{PlanContext, Resolve, skip_candidate};
use super::search::PlanError;

/// Trips changing once between two different routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferResolver;

impl Resolve for TransferResolver {
    fn name(&self) -> &'static str {
        "transfer"
    }

    fn can_handle(&self, ctx: &PlanContext) -> bool {
        !transfer_pairs(ctx).is_empty()
    }

    async fn resolve<S: GeometryStore>(
        &self,
        store: &S,
        ctx: &PlanContext,
        config: &PlannerConfig,
    ) -> Result<Vec<Itinerary>, PlanError> {
        let mut pending = transfer_pairs(ctx).into_iter();
        let mut in_flight = FuturesOrdered::new();
        for (first, second) in pending.by_ref().take(config.pair_concurrency.max(1)) {
            in_flight.push_back(resolve_pair(store, config, first, second));
        }

        // Results come back in pair order whatever order they complete in.
        let mut itineraries = Vec::new();
        while let Some(result) = in_flight.next().await {
            if let Some(trip) = result? {
                itineraries.push(Itinerary::Transfer(trip));
            }
            if let Some((first, second)) = pending.next() {
                in_flight.push_back(resolve_pair(store, config, first, second));
            }
        }

        Ok(itineraries)
    }
}

/// Every (origin route, destination route) pair on different routes,
/// origin-major in match order.
fn transfer_pairs(ctx: &PlanContext) -> Vec<(&RouteProximityMatch, &RouteProximityMatch)> {
    ctx.origin_matches
        .iter()
        .flat_map(|first| {
            ctx.destination_matches
                .iter()
                .filter(move |second| second.key.id != first.key.id)
                .map(move |second| (first, second))
        })
        .collect()
}

async fn resolve_pair<S: GeometryStore>(
    store: &S,
    config: &PlannerConfig,
    first: &RouteProximityMatch,
    second: &RouteProximityMatch,
) -> Result<Option<TransferTrip>, PlanError> {
    match transfer_trip(store, config, first, second).await {
        Ok(trip) => Ok(trip),
        Err(e) => {
            skip_candidate(e, &format!("{} -> {}", first.key, second.key))?;
            Ok(None)
        }
    }
}

async fn transfer_trip<S: GeometryStore>(
    store: &S,
    config: &PlannerConfig,
    first: &RouteProximityMatch,
    second: &RouteProximityMatch,
) -> Result<Option<TransferTrip>, PlanError> {
    let Some(choice) = best_transfer(store, config, first, second).await? else {
        return Ok(None);
    };

    let first_ride = store
        .extract_subline(first.key, first.position, choice.sample)
        .await?;
    let second_ride = store
        .extract_subline(second.key, choice.contact.position, second.position)
        .await?;

    // Each leg is priced on its own distance.
    let fare = config.fare_model;
    let first_leg = RouteSegment::new(
        first.route.clone(),
        first.key,
        first.position,
        choice.sample,
        first_ride.coordinates,
        first_ride.distance_m,
        fare.fare(first_ride.distance_m),
    )?;
    let second_leg = RouteSegment::new(
        second.route.clone(),
        second.key,
        choice.contact.position,
        second.position,
        second_ride.coordinates,
        second_ride.distance_m,
        fare.fare(second_ride.distance_m),
    )?;

    let transfer_point = TransferPoint {
        coordinate: choice.contact.sample,
        distance_m: choice.contact.distance_m,
    };

    let trip = TransferTrip::new(
        first_leg,
        second_leg,
        transfer_point,
        first.distance_m,
        second.distance_m,
    )?;
    Ok(Some(trip))
}

/// A usable transfer sample and its cost.
#[derive(Debug, Clone, Copy)]
struct TransferChoice {
    sample: Fraction,
    contact: RouteContact,
    cost: f64,
}

/// The cheapest sample along `first` where `second` can be boarded, if any.
async fn best_transfer<S: GeometryStore>(
    store: &S,
    config: &PlannerConfig,
    first: &RouteProximityMatch,
    second: &RouteProximityMatch,
) -> Result<Option<TransferChoice>, PlanError> {
    let mut best: Option<TransferChoice> = None;

    for sample in sample_positions(first.position, config.sample_step) {
        let contact = store
            .closest_point_between(first.key, sample, second.key)
            .await?;

        if contact.distance_m > config.transfer_tolerance_m {
            continue;
        }
        // Boarding B at or past the destination would mean riding away from it.
        if contact.position >= second.position {
            continue;
        }

        let cost = transfer_cost(first, sample, second, &contact);

        // Strict: equal cost keeps the earlier sample.
        if best.as_ref().is_none_or(|b| cost < b.cost) {
            best = Some(TransferChoice {
                sample,
                contact,
                cost,
            });
        }
    }

    Ok(best)
}

/// Ridden distance on both legs plus the gap between the routes.
///
/// Ridden distances are estimated as the fraction span times the route's
/// geodesic length. Fractions are planar, so on a route whose vertices are
/// unevenly spaced in latitude the estimate drifts from the true ridden
/// distance; it is only used to compare samples on the same pair of routes,
/// and the chosen legs are measured exactly afterwards.
fn transfer_cost(
    first: &RouteProximityMatch,
    sample: Fraction,
    second: &RouteProximityMatch,
    contact: &RouteContact,
) -> f64 {
    (sample.value() - first.position.value()) * first.route_length_m
        + (second.position.value() - contact.position.value()) * second.route_length_m
        + contact.distance_m
}

/// Positions `start + k * step` for `k = 1, 2, ...`, ending exactly at the
/// route end.
pub(crate) fn sample_positions(start: Fraction, step: f64) -> Vec<Fraction> {
    let remaining = 1.0 - start.value();
    if remaining <= 0.0 || step.is_nan() || step <= 0.0 {
        return Vec::new();
    }

    let count = (remaining / step - 1e-9).ceil().max(1.0) as usize;
    (1..=count)
        .map(|k| {
            if k == count {
                Fraction::END
            } else {
                Fraction::clamped(start.value() + k as f64 * step)
            }
        })
        .collect()
}
