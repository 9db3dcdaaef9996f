//! Itinerary ranking for plan results.
//!
//! A single ride is always easier than changing jeepneys, so direct
//! itineraries come first however long they are.

use std::cmp::Ordering;

use crate::domain::Itinerary;

/// Rank itineraries by preference and keep the best `max_results`.
///
/// Itineraries are ranked by:
/// 1. Direct before transfer
/// 2. Total ridden distance (shorter is better)
/// 3. Total fare (cheaper is better)
/// 4. Route keys, so the order is fully deterministic
pub fn rank_itineraries(mut itineraries: Vec<Itinerary>, max_results: usize) -> Vec<Itinerary> {
    itineraries.sort_by(compare);
    itineraries.truncate(max_results);
    itineraries
}

fn compare(a: &Itinerary, b: &Itinerary) -> Ordering {
    // Primary: direct first
    let kind_cmp = a.is_transfer().cmp(&b.is_transfer());
    if kind_cmp != Ordering::Equal {
        return kind_cmp;
    }

    // Secondary: shorter ride
    let distance_cmp = a.total_distance_m().total_cmp(&b.total_distance_m());
    if distance_cmp != Ordering::Equal {
        return distance_cmp;
    }

    // Tertiary: cheaper, then stable by route
    a.total_fare()
        .pesos()
        .total_cmp(&b.total_fare().pesos())
        .then_with(|| a.route_keys().cmp(&b.route_keys()))
}

#[cfg(test)]
fn ranking_key(itinerary: &Itinerary) -> (bool, f64, f64) {
    (
        itinerary.is_transfer(),
        itinerary.total_distance_m(),
        itinerary.total_fare().pesos(),
    )
}


#[cfg(test)]
mod tests {
    use super::fixtures::{direct, transfer};
    use super::*;
    use crate::domain::RouteId;

    #[test]
    fn direct_before_shorter_transfer() {
        let ranked = rank_itineraries(
            vec![transfer(1, 2, 500.0, 500.0, 13.0), direct(3, 9_000.0)],
            5,
        );
        assert!(!ranked[0].is_transfer());
        assert!(ranked[1].is_transfer());
    }

    #[test]
    fn transfers_by_total_distance() {
        let ranked = rank_itineraries(
            vec![
                transfer(1, 2, 3_000.0, 3_000.0, 13.0),
                transfer(3, 4, 1_000.0, 1_500.0, 13.0),
                transfer(5, 6, 2_000.0, 2_000.0, 13.0),
            ],
            5,
        );
        let totals: Vec<f64> = ranked.iter().map(|i| i.total_distance_m()).collect();
        assert_eq!(totals, vec![2_500.0, 4_000.0, 6_000.0]);
    }

    #[test]
    fn equal_distance_breaks_on_fare_then_routes() {
        let ranked = rank_itineraries(
            vec![
                transfer(7, 8, 1_000.0, 1_000.0, 14.8),
                transfer(5, 6, 1_000.0, 1_000.0, 13.0),
                transfer(3, 4, 1_000.0, 1_000.0, 13.0),
            ],
            5,
        );
        let firsts: Vec<RouteId> = ranked.iter().map(|i| i.route_keys()[0].id).collect();
        assert_eq!(firsts, vec![RouteId(3), RouteId(5), RouteId(7)]);
    }

    #[test]
    fn truncates_to_max_results() {
        let itineraries = (0..9)
            .map(|i| transfer(i * 2 + 1, i * 2 + 2, 1_000.0 + f64::from(i), 1_000.0, 13.0))
            .collect();
        let ranked = rank_itineraries(itineraries, 5);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].route_keys()[0].id, RouteId(1));
    }

    #[test]
    fn empty() {
        assert!(rank_itineraries(Vec::new(), 5).is_empty());
    }
}
