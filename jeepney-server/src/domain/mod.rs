//! Domain types for the jeepney journey planner.
//!
//! This module contains the core domain model types that represent
//! validated geographic and itinerary data. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod coordinate;
mod error;
mod fare;
mod fraction;
mod itinerary;
mod route;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use error::DomainError;
pub use fare::Fare;
pub use fraction::{Fraction, InvalidFraction};
pub use itinerary::{DirectTrip, Itinerary, RouteSegment, TransferPoint, TransferTrip};
pub use route::{Direction, RouteId, RouteInfo, RouteKey};
