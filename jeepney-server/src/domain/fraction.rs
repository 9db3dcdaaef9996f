//! Fractional positions along a route.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Error returned when a value is not a valid fraction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid fraction: must be a finite value within [0, 1]")]
pub struct InvalidFraction;

/// A position along a route geometry, from 0.0 (first vertex) to 1.0
/// (last vertex).
///
/// Fractions are totally ordered, which lets candidate positions be compared
/// and sorted without `partial_cmp` unwrapping.
///
/// # Examples
///
/// ```
/// use jeepney_server::domain::Fraction;
///
/// let half = Fraction::new(0.5).unwrap();
/// assert!(half < Fraction::END);
/// assert!(Fraction::new(1.2).is_err());
/// assert_eq!(Fraction::clamped(1.2), Fraction::END);
/// ```
#[derive(Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fraction(f64);

impl Fraction {
    /// The first vertex of a route.
    pub const START: Fraction = Fraction(0.0);

    /// The last vertex of a route.
    pub const END: Fraction = Fraction(1.0);

    /// Create a fraction, rejecting values outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, InvalidFraction> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidFraction)
        }
    }

    /// Create a fraction, clamping into `[0, 1]`. NaN maps to 0.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self::START
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// The raw value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Debug for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fraction({})", self.0)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}
