//! Route geometry primitives.
//!
//! Fractional positions are measured along the planar (degree-space)
//! length of the line, the way a spatial database locates a point on a
//! geometry. Distances are geodesic meters (haversine).

use geo::{BoundingRect, Distance, Haversine, LineLocatePoint, LineString, Rect};

use crate::domain::{Coordinate, Fraction};

/// Meters per degree of latitude on the sphere `Haversine` measures on.
const METERS_PER_DEGREE: f64 = geo::HaversineMeasure::GRS80_MEAN_RADIUS.radius() * std::f64::consts::PI / 180.0;

/// Widening applied to the prefilter box. The box only rejects; exact
/// distances are checked afterwards.
const PREFILTER_PAD: f64 = 1.01;

/// Error returned when a vertex list cannot form a route geometry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidGeometry {
    #[error("geometry needs at least two vertices")]
    TooFewVertices,

    #[error("geometry has zero length")]
    ZeroLength,
}

/// Geodesic distance between two coordinates in meters.
pub fn geodesic_distance(a: Coordinate, b: Coordinate) -> f64 {
    Haversine.distance(a.to_point(), b.to_point())
}

/// Geodesic length of a coordinate path in meters.
pub fn path_length_m(path: &[Coordinate]) -> f64 {
    path.windows(2)
        .map(|pair| geodesic_distance(pair[0], pair[1]))
        .sum()
}

/// A directed route line with precomputed lengths.
#[derive(Debug, Clone)]
pub struct RouteGeometry {
    vertices: Vec<Coordinate>,
    line: LineString<f64>,
    /// Planar length from the first vertex to each vertex.
    cumulative: Vec<f64>,
    planar_length: f64,
    length_m: f64,
    bounds: Rect<f64>,
}

impl RouteGeometry {
    /// Build a geometry from vertices in traversal order.
    ///
    /// # Errors
    ///
    /// Returns `Err` with fewer than two vertices or when every vertex is
    /// the same point.
    pub fn new(vertices: Vec<Coordinate>) -> Result<Self, InvalidGeometry> {
        if vertices.len() < 2 {
            return Err(InvalidGeometry::TooFewVertices);
        }

        let line: LineString<f64> = vertices.iter().map(|c| geo::Coord::from(*c)).collect();

        let mut cumulative = Vec::with_capacity(vertices.len());
        cumulative.push(0.0);
        let mut total = 0.0;
        for segment in line.lines() {
            total += segment.dx().hypot(segment.dy());
            cumulative.push(total);
        }
        if total <= 0.0 {
            return Err(InvalidGeometry::ZeroLength);
        }

        let bounds = line.bounding_rect().ok_or(InvalidGeometry::TooFewVertices)?;
        let length_m = path_length_m(&vertices);

        Ok(Self {
            vertices,
            line,
            cumulative,
            planar_length: total,
            length_m,
            bounds,
        })
    }

    /// Vertices in traversal order.
    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    /// Geodesic length in meters.
    pub fn length_m(&self) -> f64 {
        self.length_m
    }

    /// Fractional position of the point on the line closest to `point`.
    pub fn locate(&self, point: Coordinate) -> Fraction {
        self.line
            .line_locate_point(&point.to_point())
            .map(Fraction::clamped)
            .unwrap_or(Fraction::START)
    }

    /// The point on the line closest to `point`, its position, and the
    /// geodesic distance to it.
    pub fn closest(&self, point: Coordinate) -> (Coordinate, Fraction, f64) {
        let position = self.locate(point);
        let closest = self.interpolate(position);
        (closest, position, geodesic_distance(point, closest))
    }

    /// The coordinate at a fractional position.
    pub fn interpolate(&self, position: Fraction) -> Coordinate {
        let target = position.value() * self.planar_length;
        // First vertex strictly beyond the target; the segment ends there.
        let upper = self
            .cumulative
            .partition_point(|&d| d <= target)
            .clamp(1, self.vertices.len() - 1);
        let lower = upper - 1;

        let span = self.cumulative[upper] - self.cumulative[lower];
        if span <= 0.0 {
            return self.vertices[lower];
        }
        let t = ((target - self.cumulative[lower]) / span).clamp(0.0, 1.0);
        let a = self.vertices[lower];
        let b = self.vertices[upper];
        Coordinate::new(
            a.lat() + (b.lat() - a.lat()) * t,
            a.lon() + (b.lon() - a.lon()) * t,
        )
        .unwrap_or(a)
    }

    /// The part of the line between two positions, `start <= end`.
    ///
    /// Equal positions yield a single coordinate.
    pub fn subline(&self, start: Fraction, end: Fraction) -> Vec<Coordinate> {
        let first = self.interpolate(start);
        if start >= end {
            return vec![first];
        }

        let from = start.value() * self.planar_length;
        let to = end.value() * self.planar_length;

        let mut path = vec![first];
        for (vertex, &distance) in self.vertices.iter().zip(&self.cumulative) {
            if distance > from && distance < to {
                push_distinct(&mut path, *vertex);
            }
        }
        push_distinct(&mut path, self.interpolate(end));
        path
    }

    /// Cheap rejection test: could any part of this line be within
    /// `threshold_m` of `point`?
    pub fn may_be_within(&self, point: Coordinate, threshold_m: f64) -> bool {
        let lat_margin = threshold_m * PREFILTER_PAD / METERS_PER_DEGREE;
        let lon_margin = lat_margin / point.lat().to_radians().cos().abs().max(0.01);
        let min = self.bounds.min();
        let max = self.bounds.max();
        point.lon() >= min.x - lon_margin
            && point.lon() <= max.x + lon_margin
            && point.lat() >= min.y - lat_margin
            && point.lat() <= max.y + lat_margin
    }
}

fn push_distinct(path: &mut Vec<Coordinate>, coordinate: Coordinate) {
    if path.last() != Some(&coordinate) {
        path.push(coordinate);
    }
}
