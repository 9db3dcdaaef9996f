//! Itinerary types.
//!
//! An `Itinerary` is what the planner hands back to callers: either one
//! ride on a single route, or two rides joined at a transfer point.

use std::sync::Arc;

use super::{Coordinate, DomainError, Fare, Fraction, RouteInfo, RouteKey};

/// A contiguous ride on one route geometry.
///
/// # Invariants
///
/// - At least one coordinate
/// - Distance is finite and non-negative
/// - `start <= end` for a plain segment; `start > end` for a segment that
///   wraps past the route's last vertex back to its first
#[derive(Debug, Clone)]
pub struct RouteSegment {
    route: Arc<RouteInfo>,
    key: RouteKey,
    start: Fraction,
    end: Fraction,
    wraps: bool,
    coordinates: Vec<Coordinate>,
    distance_m: f64,
    fare: Fare,
}

impl RouteSegment {
    /// Construct a segment running forward from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `end < start`, the coordinates are empty, or the
    /// distance is negative or not finite.
    pub fn new(
        route: Arc<RouteInfo>,
        key: RouteKey,
        start: Fraction,
        end: Fraction,
        coordinates: Vec<Coordinate>,
        distance_m: f64,
        fare: Fare,
    ) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidSegment("end must not precede start"));
        }
        Self::build(route, key, start, end, false, coordinates, distance_m, fare)
    }

    /// Construct a segment that rides from `start` to the end of the route,
    /// continues from the route's first vertex and stops at `end`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `end >= start`, the coordinates are empty, or the
    /// distance is negative or not finite.
    pub fn wrapping(
        route: Arc<RouteInfo>,
        key: RouteKey,
        start: Fraction,
        end: Fraction,
        coordinates: Vec<Coordinate>,
        distance_m: f64,
        fare: Fare,
    ) -> Result<Self, DomainError> {
        if end >= start {
            return Err(DomainError::InvalidSegment(
                "wrapping segment must end before its start",
            ));
        }
        Self::build(route, key, start, end, true, coordinates, distance_m, fare)
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        route: Arc<RouteInfo>,
        key: RouteKey,
        start: Fraction,
        end: Fraction,
        wraps: bool,
        coordinates: Vec<Coordinate>,
        distance_m: f64,
        fare: Fare,
    ) -> Result<Self, DomainError> {
        if coordinates.is_empty() {
            return Err(DomainError::EmptySegment(key));
        }
        if !distance_m.is_finite() || distance_m < 0.0 {
            return Err(DomainError::InvalidSegment(
                "distance must be finite and non-negative",
            ));
        }
        Ok(Self {
            route,
            key,
            start,
            end,
            wraps,
            coordinates,
            distance_m,
            fare,
        })
    }

    /// Route ridden on this segment.
    pub fn route(&self) -> &RouteInfo {
        &self.route
    }

    /// Directed geometry ridden on this segment.
    pub fn key(&self) -> RouteKey {
        self.key
    }

    /// Boarding position.
    pub fn start(&self) -> Fraction {
        self.start
    }

    /// Alighting position.
    pub fn end(&self) -> Fraction {
        self.end
    }

    /// True if the ride passes the route's last vertex and continues from
    /// its first.
    pub fn wraps(&self) -> bool {
        self.wraps
    }

    /// Path geometry of the ride.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Ridden distance in meters.
    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    /// Fare for this ride.
    pub fn fare(&self) -> Fare {
        self.fare
    }
}

/// Where a rider alights one route and boards another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferPoint {
    /// Alighting coordinate on the first route.
    pub coordinate: Coordinate,

    /// Distance between the two routes at this point, in meters.
    pub distance_m: f64,
}

/// A single-route trip.
#[derive(Debug, Clone)]
pub struct DirectTrip {
    pub segment: RouteSegment,

    /// Distance from the origin to the boarding point, in meters.
    pub boarding_walk_m: f64,

    /// Distance from the alighting point to the destination, in meters.
    pub alighting_walk_m: f64,
}

/// A two-route trip with one transfer.
///
/// # Invariants
///
/// - The two segments ride different routes
#[derive(Debug, Clone)]
pub struct TransferTrip {
    first: RouteSegment,
    second: RouteSegment,
    transfer_point: TransferPoint,
    boarding_walk_m: f64,
    alighting_walk_m: f64,
}

impl TransferTrip {
    /// Construct a transfer trip.
    ///
    /// # Errors
    ///
    /// Returns `Err` if both segments ride the same route.
    pub fn new(
        first: RouteSegment,
        second: RouteSegment,
        transfer_point: TransferPoint,
        boarding_walk_m: f64,
        alighting_walk_m: f64,
    ) -> Result<Self, DomainError> {
        if first.key.id == second.key.id {
            return Err(DomainError::SameRouteTransfer(first.key.id));
        }
        Ok(Self {
            first,
            second,
            transfer_point,
            boarding_walk_m,
            alighting_walk_m,
        })
    }

    /// First leg, boarded near the origin.
    pub fn first(&self) -> &RouteSegment {
        &self.first
    }

    /// Second leg, alighted near the destination.
    pub fn second(&self) -> &RouteSegment {
        &self.second
    }

    /// Where the rider changes routes.
    pub fn transfer_point(&self) -> TransferPoint {
        self.transfer_point
    }

    /// Distance from the origin to the boarding point, in meters.
    pub fn boarding_walk_m(&self) -> f64 {
        self.boarding_walk_m
    }

    /// Distance from the alighting point to the destination, in meters.
    pub fn alighting_walk_m(&self) -> f64 {
        self.alighting_walk_m
    }
}

/// A candidate trip from origin to destination.
#[derive(Debug, Clone)]
pub enum Itinerary {
    /// One ride on one route (forward or loop-around)
    Direct(DirectTrip),
    /// Two rides joined by a transfer
    Transfer(TransferTrip),
}

impl Itinerary {
    /// Returns true if this itinerary requires a transfer.
    pub fn is_transfer(&self) -> bool {
        matches!(self, Itinerary::Transfer(_))
    }

    /// Ridden segments, in travel order.
    pub fn segments(&self) -> Vec<&RouteSegment> {
        match self {
            Itinerary::Direct(trip) => vec![&trip.segment],
            Itinerary::Transfer(trip) => vec![&trip.first, &trip.second],
        }
    }

    /// Total ridden distance in meters (sum of legs).
    pub fn total_distance_m(&self) -> f64 {
        self.segments().iter().map(|s| s.distance_m()).sum()
    }

    /// Total fare: the sum of each leg's own fare.
    pub fn total_fare(&self) -> Fare {
        self.segments().iter().map(|s| s.fare()).sum()
    }

    /// Directed geometries ridden, in travel order.
    pub fn route_keys(&self) -> Vec<RouteKey> {
        self.segments().iter().map(|s| s.key()).collect()
    }
}
