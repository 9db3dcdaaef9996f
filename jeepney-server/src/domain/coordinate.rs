//! Geographic coordinate type.

use std::fmt;

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

/// Error returned when constructing an out-of-range coordinate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoordinate {
    reason: &'static str,
}

/// A validated WGS84 latitude/longitude pair.
///
/// Both components are finite, latitude lies in `[-90, 90]` and longitude
/// in `[-180, 180]`. Any `Coordinate` value is valid by construction.
///
/// Serialized as `{"lat": .., "lng": ..}`; `lon` is accepted as an alias
/// when deserializing.
///
/// # Examples
///
/// ```
/// use jeepney_server::domain::Coordinate;
///
/// let colon = Coordinate::new(10.2966, 123.8977).unwrap();
/// assert_eq!(colon.lat(), 10.2966);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, validating ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(InvalidCoordinate {
                reason: "components must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate {
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinate {
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self { lat, lon })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// The coordinate as a `geo` point (x = longitude, y = latitude).
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    /// Bit-exact key, usable for hashing.
    pub(crate) fn bits(&self) -> (u64, u64) {
        (self.lat.to_bits(), self.lon.to_bits())
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(c: Coordinate) -> Self {
        Coord { x: c.lon, y: c.lat }
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.lat, self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// Wire form of a coordinate.
#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    lat: f64,
    #[serde(alias = "lon")]
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lng)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        RawCoordinate {
            lat: c.lat,
            lng: c.lon,
        }
    }
}
