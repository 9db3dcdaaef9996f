//! Geometry store for route lines.
//!
//! The planner never touches route geometry directly: every spatial
//! question goes through the async [`GeometryStore`] trait, mirroring the
//! queries a spatial database answers (nearest distance, locate point on
//! line, line substring, closest point between lines).
//!
//! [`InMemoryStore`] is the shipped implementation, built from a GeoJSON
//! file by [`load_routes`].

mod error;
pub mod geometry;
mod loader;
mod memory;

use std::future::Future;
use std::sync::Arc;

use crate::domain::{Coordinate, Fraction, RouteInfo, RouteKey};

pub use error::StoreError;
pub use geometry::{InvalidGeometry, RouteGeometry};
pub use loader::{LoadError, load_routes, parse_routes};
pub use memory::InMemoryStore;

/// A route found near a query point.
#[derive(Debug, Clone)]
pub struct RouteProximityMatch {
    /// Route the geometry belongs to.
    pub route: Arc<RouteInfo>,

    /// Directed geometry that passed near the point.
    pub key: RouteKey,

    /// Geodesic distance from the query point to the geometry, in meters.
    pub distance_m: f64,

    /// Position of the closest point on the geometry.
    pub position: Fraction,

    /// Geodesic length of the whole geometry, in meters.
    pub route_length_m: f64,
}

/// A portion of a route geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Subline {
    /// Path coordinates in travel order.
    pub coordinates: Vec<Coordinate>,

    /// Geodesic length of the path, in meters.
    pub distance_m: f64,
}

/// Closest approach between a sampled point on one route and another route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteContact {
    /// The sampled coordinate on the first route.
    pub sample: Coordinate,

    /// The closest coordinate on the second route.
    pub closest: Coordinate,

    /// Position of `closest` along the second route.
    pub position: Fraction,

    /// Geodesic distance between `sample` and `closest`, in meters.
    pub distance_m: f64,
}

/// Spatial queries over stored route geometries.
///
/// Every query is I/O-shaped: implementations may be backed by a remote
/// database, so callers must not assume results are immediate.
pub trait GeometryStore: Send + Sync {
    /// All directed geometries within `threshold_m` of `point`, ordered by
    /// ascending distance. An empty list means no route serves the point.
    fn find_routes_near(
        &self,
        point: Coordinate,
        threshold_m: f64,
    ) -> impl Future<Output = Result<Vec<RouteProximityMatch>, StoreError>> + Send;

    /// Position along `route` of the point closest to `point`.
    fn project_point(
        &self,
        route: RouteKey,
        point: Coordinate,
    ) -> impl Future<Output = Result<Fraction, StoreError>> + Send;

    /// The part of `route` between `start` and `end` (`start <= end`).
    fn extract_subline(
        &self,
        route: RouteKey,
        start: Fraction,
        end: Fraction,
    ) -> impl Future<Output = Result<Subline, StoreError>> + Send;

    /// Sample `from` at `sample` and find the closest point on `to`.
    fn closest_point_between(
        &self,
        from: RouteKey,
        sample: Fraction,
        to: RouteKey,
    ) -> impl Future<Output = Result<RouteContact, StoreError>> + Send;

    /// Every stored route, ordered by id.
    fn routes(&self) -> impl Future<Output = Result<Vec<Arc<RouteInfo>>, StoreError>> + Send;
}
