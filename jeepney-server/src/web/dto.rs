//! Data transfer objects for web requests and responses.
//!
//! Field names are camelCase to match the mobile client.

use serde::{Deserialize, Serialize};

use crate::domain::{
    Coordinate, Direction, DirectTrip, Fraction, Itinerary, RouteInfo, RouteSegment, TransferTrip,
};
use crate::planner::{PlanError, PlanRequest};
use crate::store::RouteProximityMatch;

/// A point as sent by the client. Validated on conversion.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    #[serde(alias = "lon")]
    pub lng: f64,
}

/// Request to plan a journey.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanJourneyRequest {
    /// Where the rider starts
    pub from: Option<LatLng>,

    /// Where the rider wants to go
    pub to: Option<LatLng>,

    /// Also list transfer trips when a direct trip exists
    #[serde(default)]
    pub include_transfers: bool,
}

impl PlanJourneyRequest {
    /// Validate both ends and build a planner request.
    pub fn into_plan_request(self) -> Result<PlanRequest, PlanError> {
        let origin = parse_point("from", self.from)?;
        let destination = parse_point("to", self.to)?;
        Ok(PlanRequest::new(origin, destination).with_transfers(self.include_transfers))
    }
}

fn parse_point(field: &str, point: Option<LatLng>) -> Result<Coordinate, PlanError> {
    let point =
        point.ok_or_else(|| PlanError::InvalidRequest(format!("missing '{field}' coordinate")))?;
    Coordinate::new(point.lat, point.lng)
        .map_err(|e| PlanError::InvalidRequest(format!("invalid '{field}' coordinate: {e}")))
}

/// Response from journey planning.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanJourneyResponse {
    /// Itineraries, best first
    pub itineraries: Vec<ItineraryResult>,

    /// Strategies that ran, in order
    pub strategies: Vec<&'static str>,
}

/// An itinerary in plan results.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ItineraryResult {
    Direct(DirectResult),
    Transfer(TransferResult),
}

/// A single-route itinerary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectResult {
    /// Always false
    pub is_transfer: bool,
    pub route_id: u32,
    pub route_name: String,
    pub direction: Direction,
    pub coordinates: Vec<Coordinate>,
    pub distance_meters: f64,
    pub fare: f64,

    /// True if the ride continues past the terminal back to the start
    pub loop_around: bool,

    pub boarding_walk_meters: f64,
    pub alighting_walk_meters: f64,
}

/// One leg of a transfer itinerary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegResult {
    pub route_id: u32,
    pub route_name: String,
    pub direction: Direction,
    pub coordinates: Vec<Coordinate>,
    pub distance: f64,
    pub fare: f64,
}

/// A two-route itinerary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    /// Always true
    pub is_transfer: bool,
    pub first_route: LegResult,
    pub second_route: LegResult,

    /// Where the rider alights the first route
    pub transfer_point: Coordinate,

    /// Sum of both legs' fares
    pub total_fare: f64,

    /// Gap between the two routes at the transfer point, in meters
    pub transfer_distance: f64,

    /// Sum of both legs' distances, in meters
    pub total_distance: f64,

    pub boarding_walk_meters: f64,
    pub alighting_walk_meters: f64,
}

/// A route in the route listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub id: u32,
    pub code: String,
    pub start_terminal: String,
    pub end_terminal: String,
    pub name: String,
}

/// Response listing routes.
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<RouteResult>,
}

/// Query for routes near a point.
#[derive(Debug, Deserialize)]
pub struct NearbyRoutesQuery {
    pub lat: f64,
    #[serde(alias = "lon")]
    pub lng: f64,

    /// Search radius in meters (defaults to the walking threshold)
    pub radius: Option<f64>,
}

/// A route passing near a point.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyRouteResult {
    pub route_id: u32,
    pub route_name: String,
    pub direction: Direction,
    pub distance_meters: f64,
    pub position: Fraction,
}

/// Response from a nearby-routes query.
#[derive(Debug, Serialize)]
pub struct NearbyRoutesResponse {
    pub radius: f64,
    pub routes: Vec<NearbyRouteResult>,
}

/// Query projecting a point onto one route.
#[derive(Debug, Deserialize)]
pub struct PositionQuery {
    pub lat: f64,
    #[serde(alias = "lon")]
    pub lng: f64,

    /// Which geometry of the route (defaults to forward)
    pub direction: Option<Direction>,
}

/// Where a point falls along a route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    pub route_id: u32,
    pub direction: Direction,
    pub position: Fraction,
}

/// Query for a fare quote.
#[derive(Debug, Deserialize)]
pub struct FareQuery {
    /// Ride distance in meters
    pub distance: f64,

    /// Fare model name (defaults to `per_km`)
    pub model: Option<String>,
}

/// A fare quote.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FareResponse {
    pub distance_meters: f64,
    pub model: &'static str,
    pub fare: f64,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Machine-readable error category
    pub kind: &'static str,

    /// Whether the same request may succeed later
    pub retryable: bool,
}

// Conversion implementations

impl ItineraryResult {
    /// Create from a domain Itinerary.
    pub fn from_itinerary(itinerary: &Itinerary) -> Self {
        match itinerary {
            Itinerary::Direct(trip) => ItineraryResult::Direct(DirectResult::from_trip(trip)),
            Itinerary::Transfer(trip) => {
                ItineraryResult::Transfer(TransferResult::from_trip(trip))
            }
        }
    }
}

impl DirectResult {
    /// Create from a domain DirectTrip.
    pub fn from_trip(trip: &DirectTrip) -> Self {
        let segment = &trip.segment;
        Self {
            is_transfer: false,
            route_id: segment.key().id.0,
            route_name: segment.route().display_name(),
            direction: segment.key().direction,
            coordinates: segment.coordinates().to_vec(),
            distance_meters: segment.distance_m(),
            fare: segment.fare().pesos(),
            loop_around: segment.wraps(),
            boarding_walk_meters: trip.boarding_walk_m,
            alighting_walk_meters: trip.alighting_walk_m,
        }
    }
}

impl LegResult {
    /// Create from a domain RouteSegment.
    pub fn from_segment(segment: &RouteSegment) -> Self {
        Self {
            route_id: segment.key().id.0,
            route_name: segment.route().display_name(),
            direction: segment.key().direction,
            coordinates: segment.coordinates().to_vec(),
            distance: segment.distance_m(),
            fare: segment.fare().pesos(),
        }
    }
}

impl TransferResult {
    /// Create from a domain TransferTrip.
    pub fn from_trip(trip: &TransferTrip) -> Self {
        let point = trip.transfer_point();
        Self {
            is_transfer: true,
            first_route: LegResult::from_segment(trip.first()),
            second_route: LegResult::from_segment(trip.second()),
            transfer_point: point.coordinate,
            total_fare: (trip.first().fare() + trip.second().fare()).pesos(),
            transfer_distance: point.distance_m,
            total_distance: trip.first().distance_m() + trip.second().distance_m(),
            boarding_walk_meters: trip.boarding_walk_m(),
            alighting_walk_meters: trip.alighting_walk_m(),
        }
    }
}

impl RouteResult {
    /// Create from domain RouteInfo.
    pub fn from_info(info: &RouteInfo) -> Self {
        Self {
            id: info.id.0,
            code: info.code.clone(),
            start_terminal: info.start_terminal.clone(),
            end_terminal: info.end_terminal.clone(),
            name: info.display_name(),
        }
    }
}

impl NearbyRouteResult {
    /// Create from a store proximity match.
    pub fn from_match(m: &RouteProximityMatch) -> Self {
        Self {
            route_id: m.key.id.0,
            route_name: m.route.display_name(),
            direction: m.key.direction,
            distance_meters: m.distance_m,
            position: m.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{Fare, RouteId, RouteKey, TransferPoint};

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn segment(id: u32, start: f64, end: f64, distance_m: f64, fare: f64) -> RouteSegment {
        RouteSegment::new(
            Arc::new(RouteInfo::new(RouteId(id), format!("{id:02}B"), "Lahug", "Carbon")),
            RouteKey::forward(RouteId(id)),
            Fraction::new(start).unwrap(),
            Fraction::new(end).unwrap(),
            vec![coord(10.30, 123.88), coord(10.30, 123.90)],
            distance_m,
            Fare::from_pesos(fare),
        )
        .unwrap()
    }

    fn parse(json: &str) -> Result<PlanRequest, PlanError> {
        serde_json::from_str::<PlanJourneyRequest>(json)
            .unwrap()
            .into_plan_request()
    }

    #[test]
    fn plan_request_parses() {
        let request = parse(
            r#"{"from": {"lat": 10.30, "lng": 123.88}, "to": {"lat": 10.31, "lng": 123.90}, "includeTransfers": true}"#,
        )
        .unwrap();

        assert_eq!(request.origin, coord(10.30, 123.88));
        assert_eq!(request.destination, coord(10.31, 123.90));
        assert!(request.include_transfers);
    }

    #[test]
    fn plan_request_transfers_default_off() {
        let request =
            parse(r#"{"from": {"lat": 10.30, "lng": 123.88}, "to": {"lat": 10.31, "lon": 123.90}}"#)
                .unwrap();
        assert!(!request.include_transfers);
    }

    #[test]
    fn plan_request_missing_end() {
        let err = parse(r#"{"from": {"lat": 10.30, "lng": 123.88}}"#).unwrap_err();
        assert!(matches!(err, PlanError::InvalidRequest(ref m) if m.contains("'to'")));
    }

    #[test]
    fn plan_request_out_of_range() {
        let err = parse(r#"{"from": {"lat": 95.0, "lng": 123.88}, "to": {"lat": 10.31, "lng": 123.90}}"#)
            .unwrap_err();
        assert!(matches!(err, PlanError::InvalidRequest(ref m) if m.contains("'from'")));
    }

    #[test]
    fn direct_result_shape() {
        let trip = DirectTrip {
            segment: segment(4, 0.1, 0.6, 2_500.0, 13.0),
            boarding_walk_m: 30.0,
            alighting_walk_m: 45.0,
        };
        let json = serde_json::to_value(ItineraryResult::from_itinerary(&Itinerary::Direct(trip))).unwrap();

        assert_eq!(json["isTransfer"], false);
        assert_eq!(json["routeId"], 4);
        assert_eq!(json["routeName"], "04B Lahug - Carbon");
        assert_eq!(json["direction"], "forward");
        assert_eq!(json["distanceMeters"], 2_500.0);
        assert_eq!(json["fare"], 13.0);
        assert_eq!(json["loopAround"], false);
        assert_eq!(json["coordinates"][0]["lat"], 10.30);
        assert_eq!(json["coordinates"][0]["lng"], 123.88);
    }

    #[test]
    fn transfer_result_shape() {
        let point = TransferPoint {
            coordinate: coord(10.30, 123.90),
            distance_m: 12.5,
        };
        let trip = TransferTrip::new(
            segment(1, 0.05, 0.5, 2_200.0, 13.0),
            segment(2, 0.5, 0.95, 4_100.0, 14.8),
            point,
            55.0,
            55.0,
        )
        .unwrap();
        let json =
            serde_json::to_value(ItineraryResult::from_itinerary(&Itinerary::Transfer(trip))).unwrap();

        assert_eq!(json["isTransfer"], true);
        assert_eq!(json["firstRoute"]["routeId"], 1);
        assert_eq!(json["secondRoute"]["distance"], 4_100.0);
        assert_eq!(json["transferPoint"]["lng"], 123.90);
        assert_eq!(json["totalFare"], 27.8);
        assert_eq!(json["transferDistance"], 12.5);
        assert_eq!(json["totalDistance"], 6_300.0);
    }

    #[test]
    fn route_result_shape() {
        let info = RouteInfo::new(RouteId(17), "17B", "Apas", "Carbon");
        let json = serde_json::to_value(RouteResult::from_info(&info)).unwrap();

        assert_eq!(json["id"], 17);
        assert_eq!(json["startTerminal"], "Apas");
        assert_eq!(json["name"], "17B Apas - Carbon");
    }
}
