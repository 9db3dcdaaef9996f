//! Proximity search: which routes pass within walking distance of a point.

use crate::domain::Coordinate;
use crate::store::{GeometryStore, RouteProximityMatch, StoreError};

/// A directed geometry near both the origin and the destination.
#[derive(Debug, Clone, Copy)]
pub struct SharedRoute<'a> {
    pub origin: &'a RouteProximityMatch,
    pub destination: &'a RouteProximityMatch,
}

/// Find routes within `threshold_m` of `point`, nearest first.
///
/// Store results are re-filtered and re-sorted so the ordering holds for
/// any store implementation: ascending distance, ties by route key.
pub async fn find_routes_near<S: GeometryStore>(
    store: &S,
    point: Coordinate,
    threshold_m: f64,
) -> Result<Vec<RouteProximityMatch>, StoreError> {
    let mut matches = store.find_routes_near(point, threshold_m).await?;
    matches.retain(|m| m.distance_m <= threshold_m);
    matches.sort_by(|a, b| {
        a.distance_m
            .total_cmp(&b.distance_m)
            .then_with(|| a.key.cmp(&b.key))
    });
    Ok(matches)
}

/// Geometries present in both match lists, in origin-list order.
pub fn shared_routes<'a>(
    origin: &'a [RouteProximityMatch],
    destination: &'a [RouteProximityMatch],
) -> Vec<SharedRoute<'a>> {
    origin
        .iter()
        .filter_map(|o| {
            destination
                .iter()
                .find(|d| d.key == o.key)
                .map(|d| SharedRoute {
                    origin: o,
                    destination: d,
                })
        })
        .collect()
}
