//! Monetary fare amounts.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::Serialize;

/// A fare in pesos, held to centavo precision.
///
/// Construction rounds to two decimal places so that fares computed from
/// fractional increments (e.g. 1.8 per kilometer) compare and sum exactly
/// as a rider would expect.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
#[serde(transparent)]
pub struct Fare(f64);

impl Fare {
    /// A zero fare.
    pub const ZERO: Fare = Fare(0.0);

    /// Create a fare from an amount in pesos, rounded to centavos.
    pub fn from_pesos(pesos: f64) -> Self {
        Self((pesos * 100.0).round() / 100.0)
    }

    /// The amount in pesos.
    pub fn pesos(self) -> f64 {
        self.0
    }
}

impl Add for Fare {
    type Output = Fare;

    fn add(self, rhs: Fare) -> Fare {
        Fare::from_pesos(self.0 + rhs.0)
    }
}

impl Sum for Fare {
    fn sum<I: Iterator<Item = Fare>>(iter: I) -> Self {
        iter.fold(Fare::ZERO, Add::add)
    }
}

impl fmt::Debug for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fare({:.2})", self.0)
    }
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PHP {:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_centavos() {
        assert_eq!(Fare::from_pesos(14.799999999).pesos(), 14.8);
        assert_eq!(Fare::from_pesos(13.004).pesos(), 13.0);
    }

    #[test]
    fn sums() {
        let total: Fare = [Fare::from_pesos(13.0), Fare::from_pesos(14.8)]
            .into_iter()
            .sum();
        assert_eq!(total, Fare::from_pesos(27.8));
    }

    #[test]
    fn display() {
        assert_eq!(Fare::from_pesos(13.0).to_string(), "PHP 13.00");
    }
}
