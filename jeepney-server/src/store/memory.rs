//! In-memory geometry store.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{Coordinate, Direction, Fraction, RouteId, RouteInfo, RouteKey};

use super::geometry::{RouteGeometry, path_length_m};
use super::loader::LoadError;
use super::{GeometryStore, RouteContact, RouteProximityMatch, StoreError, Subline};

#[derive(Debug, Clone)]
struct StoredGeometry {
    route: Arc<RouteInfo>,
    geometry: RouteGeometry,
}

/// Geometry store holding every route line in memory.
///
/// Route data is read-only once loaded, so the store can be shared across
/// requests behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    geometries: BTreeMap<RouteKey, StoredGeometry>,
    routes: BTreeMap<RouteId, Arc<RouteInfo>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one directed geometry for a route.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the key is already present, if `info` disagrees
    /// with info stored earlier for the same id, or if the vertices do not
    /// form a usable line.
    pub fn insert(
        &mut self,
        info: RouteInfo,
        direction: Direction,
        vertices: Vec<Coordinate>,
    ) -> Result<(), LoadError> {
        let key = RouteKey {
            id: info.id,
            direction,
        };
        if self.geometries.contains_key(&key) {
            return Err(LoadError::DuplicateRoute(key));
        }
        let geometry =
            RouteGeometry::new(vertices).map_err(|source| LoadError::Geometry { route: key, source })?;

        let route = match self.routes.get(&info.id) {
            Some(existing) if **existing != info => {
                return Err(LoadError::ConflictingInfo(info.id));
            }
            Some(existing) => existing.clone(),
            None => {
                let route = Arc::new(info);
                self.routes.insert(route.id, route.clone());
                route
            }
        };

        self.geometries.insert(key, StoredGeometry { route, geometry });
        Ok(())
    }

    /// Check that every route has a forward geometry.
    pub fn check_complete(&self) -> Result<(), LoadError> {
        for id in self.routes.keys() {
            if !self.geometries.contains_key(&RouteKey::forward(*id)) {
                return Err(LoadError::MissingForward(*id));
            }
        }
        Ok(())
    }

    /// Number of routes (not counting reverse geometries separately).
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are stored.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The geometry stored under `key`.
    pub fn geometry(&self, key: RouteKey) -> Result<&RouteGeometry, StoreError> {
        self.stored(key).map(|s| &s.geometry)
    }

    fn stored(&self, key: RouteKey) -> Result<&StoredGeometry, StoreError> {
        self.geometries
            .get(&key)
            .ok_or(StoreError::UnknownRoute(key))
    }

    fn nearby(
        &self,
        point: Coordinate,
        threshold_m: f64,
    ) -> Result<Vec<RouteProximityMatch>, StoreError> {
        if !threshold_m.is_finite() || threshold_m < 0.0 {
            return Err(StoreError::InvalidQuery(format!(
                "threshold must be a non-negative distance, got {threshold_m}"
            )));
        }

        let mut matches: Vec<RouteProximityMatch> = self
            .geometries
            .iter()
            .filter(|(_, stored)| stored.geometry.may_be_within(point, threshold_m))
            .filter_map(|(key, stored)| {
                let (_, position, distance_m) = stored.geometry.closest(point);
                (distance_m <= threshold_m).then(|| RouteProximityMatch {
                    route: stored.route.clone(),
                    key: *key,
                    distance_m,
                    position,
                    route_length_m: stored.geometry.length_m(),
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            a.distance_m
                .total_cmp(&b.distance_m)
                .then_with(|| a.key.cmp(&b.key))
        });
        Ok(matches)
    }

    fn subline(&self, key: RouteKey, start: Fraction, end: Fraction) -> Result<Subline, StoreError> {
        if end < start {
            return Err(StoreError::InvalidQuery(format!(
                "sub-line end {end} precedes start {start} on route {key}"
            )));
        }
        let coordinates = self.geometry(key)?.subline(start, end);
        if coordinates.is_empty() {
            return Err(StoreError::DegenerateGeometry {
                route: key,
                reason: "empty extraction",
            });
        }
        let distance_m = path_length_m(&coordinates);
        Ok(Subline {
            coordinates,
            distance_m,
        })
    }

    fn contact(&self, from: RouteKey, sample: Fraction, to: RouteKey) -> Result<RouteContact, StoreError> {
        let sample = self.geometry(from)?.interpolate(sample);
        let (closest, position, distance_m) = self.geometry(to)?.closest(sample);
        Ok(RouteContact {
            sample,
            closest,
            position,
            distance_m,
        })
    }
}

impl GeometryStore for InMemoryStore {
    async fn find_routes_near(
        &self,
        point: Coordinate,
        threshold_m: f64,
    ) -> Result<Vec<RouteProximityMatch>, StoreError> {
        self.nearby(point, threshold_m)
    }

    async fn project_point(&self, route: RouteKey, point: Coordinate) -> Result<Fraction, StoreError> {
        Ok(self.geometry(route)?.locate(point))
    }

    async fn extract_subline(
        &self,
        route: RouteKey,
        start: Fraction,
        end: Fraction,
    ) -> Result<Subline, StoreError> {
        self.subline(route, start, end)
    }

    async fn closest_point_between(
        &self,
        from: RouteKey,
        sample: Fraction,
        to: RouteKey,
    ) -> Result<RouteContact, StoreError> {
        self.contact(from, sample, to)
    }

    async fn routes(&self) -> Result<Vec<Arc<RouteInfo>>, StoreError> {
        Ok(self.routes.values().cloned().collect())
    }
}
