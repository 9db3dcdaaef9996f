//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{debug, error, warn};

use crate::domain::{Coordinate, Direction, RouteId, RouteKey};
use crate::planner::{FareModel, PlanError, Planner, find_routes_near};
use crate::store::{GeometryStore, StoreError};

use super::dto::*;
use super::state::AppState;

/// Largest radius accepted by the nearby-routes query, in meters.
const MAX_NEARBY_RADIUS_M: f64 = 2_000.0;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/plan", post(plan_journey))
        .route("/api/routes", get(list_routes))
        .route("/api/routes/near", get(routes_near))
        .route("/api/routes/:id/position", get(route_position))
        .route("/api/fare", get(quote_fare))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Plan a journey between two points.
async fn plan_journey(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    // Parse JSON manually so malformed bodies get our error shape
    let req: PlanJourneyRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, body = %String::from_utf8_lossy(&body), "rejecting plan body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;
    let request = req.into_plan_request()?;

    let planner = Planner::new(state.store.as_ref(), &state.config);
    let result = planner.plan(&request).await?;

    if result.is_empty() {
        debug!(
            origin = %request.origin,
            destination = %request.destination,
            "no itinerary found"
        );
        return Err(AppError::NotFound {
            kind: "no_route",
            message: "No route available between these points".to_string(),
        });
    }

    let itineraries = result
        .itineraries
        .iter()
        .map(ItineraryResult::from_itinerary)
        .collect();

    Ok(Json(PlanJourneyResponse {
        itineraries,
        strategies: result.strategies_run,
    })
    .into_response())
}

/// List every route.
async fn list_routes(State(state): State<AppState>) -> Result<Json<RoutesResponse>, AppError> {
    let routes = state.store.routes().await?;
    let routes = routes.iter().map(|r| RouteResult::from_info(r)).collect();
    Ok(Json(RoutesResponse { routes }))
}

/// Routes passing near a point.
async fn routes_near(
    State(state): State<AppState>,
    Query(req): Query<NearbyRoutesQuery>,
) -> Result<Json<NearbyRoutesResponse>, AppError> {
    let point = parse_coordinate(req.lat, req.lng)?;

    let radius = req.radius.unwrap_or(state.config.proximity_threshold_m);
    if !radius.is_finite() || radius < 0.0 {
        return Err(AppError::BadRequest {
            message: format!("Invalid radius: {radius}"),
        });
    }
    let radius = radius.min(MAX_NEARBY_RADIUS_M);

    let matches = find_routes_near(state.store.as_ref(), point, radius).await?;
    let routes = matches.iter().map(NearbyRouteResult::from_match).collect();

    Ok(Json(NearbyRoutesResponse { radius, routes }))
}

/// Where a point falls along one route.
async fn route_position(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(req): Query<PositionQuery>,
) -> Result<Json<PositionResponse>, AppError> {
    let point = parse_coordinate(req.lat, req.lng)?;
    let direction = req.direction.unwrap_or(Direction::Forward);
    let key = RouteKey {
        id: RouteId(id),
        direction,
    };

    let position = state.store.project_point(key, point).await?;

    Ok(Json(PositionResponse {
        route_id: id,
        direction,
        position,
    }))
}

/// Fare for a ride distance under a named model.
async fn quote_fare(Query(req): Query<FareQuery>) -> Result<Json<FareResponse>, AppError> {
    if !req.distance.is_finite() || req.distance < 0.0 {
        return Err(AppError::BadRequest {
            message: format!("Invalid distance: {}", req.distance),
        });
    }

    let name = req.model.as_deref().unwrap_or("per_km");
    let model = FareModel::from_name(name).ok_or_else(|| AppError::BadRequest {
        message: format!("Unknown fare model: {name}"),
    })?;

    Ok(Json(FareResponse {
        distance_meters: req.distance,
        model: model.name(),
        fare: model.fare(req.distance).pesos(),
    }))
}

fn parse_coordinate(lat: f64, lng: f64) -> Result<Coordinate, AppError> {
    Coordinate::new(lat, lng).map_err(|e| AppError::BadRequest {
        message: format!("Invalid coordinate: {e}"),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { kind: &'static str, message: String },
    Store { message: String, retryable: bool },
    Timeout,
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InvalidRequest(message) => AppError::BadRequest { message },
            PlanError::Store(e) => AppError::Store {
                retryable: e.is_retryable(),
                message: e.to_string(),
            },
            PlanError::Timeout => AppError::Timeout,
            PlanError::Domain(e) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UnknownRoute(key) => AppError::NotFound {
                kind: "unknown_route",
                message: format!("Unknown route {key}"),
            },
            StoreError::InvalidQuery(message) => AppError::BadRequest { message },
            other => AppError::Store {
                retryable: other.is_retryable(),
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, kind, retryable, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, "bad_request", false, message),
            AppError::NotFound { kind, message } => (StatusCode::NOT_FOUND, kind, false, message),
            AppError::Store { message, retryable } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "store", retryable, message)
            }
            AppError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "timeout",
                true,
                "Journey planning timed out".to_string(),
            ),
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", false, message)
            }
        };

        if status.is_server_error() {
            error!(%status, kind, %message, "request failed");
        } else if status == StatusCode::BAD_REQUEST {
            warn!(%status, %message, "bad request");
        }

        let body = Json(ErrorResponse {
            error: message,
            kind,
            retryable,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::cache::{CacheConfig, CachedStore};
    use crate::planner::PlannerConfig;
    use crate::store::parse_routes;

    const ROUTES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"id": 1, "code": "01K", "start_terminal": "Urgello", "end_terminal": "Parkmall"},
                "geometry": {"type": "LineString", "coordinates": [[123.88, 10.30], [123.92, 10.30]]}
            },
            {
                "type": "Feature",
                "properties": {"id": 2, "code": "04B", "start_terminal": "Lahug", "end_terminal": "Carbon"},
                "geometry": {"type": "LineString", "coordinates": [[123.90, 10.28], [123.90, 10.32]]}
            }
        ]
    }"#;

    fn app() -> Router {
        let store = CachedStore::new(parse_routes(ROUTES).unwrap(), &CacheConfig::default());
        create_router(AppState::new(store, PlannerConfig::default()))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_plan(body: &str) -> (StatusCode, Value) {
        send(
            Request::post("/api/plan")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    #[tokio::test]
    async fn health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn plan_transfer_across_crossing() {
        let (status, json) = post_plan(
            r#"{"from": {"lat": 10.3005, "lng": 123.882}, "to": {"lat": 10.318, "lng": 123.9005}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let itinerary = &json["itineraries"][0];
        assert_eq!(itinerary["isTransfer"], true);
        assert_eq!(itinerary["firstRoute"]["routeId"], 1);
        assert_eq!(itinerary["secondRoute"]["routeId"], 2);
        assert!(itinerary["transferDistance"].as_f64().unwrap() <= 100.0);
    }

    #[tokio::test]
    async fn plan_direct() {
        let (status, json) = post_plan(
            r#"{"from": {"lat": 10.3004, "lng": 123.885}, "to": {"lat": 10.3004, "lng": 123.91}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let itinerary = &json["itineraries"][0];
        assert_eq!(itinerary["isTransfer"], false);
        assert_eq!(itinerary["routeId"], 1);
        assert_eq!(itinerary["loopAround"], false);
        assert_eq!(json["strategies"][0], "forward");
    }

    #[tokio::test]
    async fn plan_no_route_is_404() {
        let (status, json) = post_plan(
            r#"{"from": {"lat": 10.40, "lng": 123.80}, "to": {"lat": 10.318, "lng": 123.9005}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["kind"], "no_route");
        assert_eq!(json["retryable"], false);
    }

    #[tokio::test]
    async fn plan_missing_coordinate_is_400() {
        let (status, json) = post_plan(r#"{"from": {"lat": 10.3005, "lng": 123.882}}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["kind"], "bad_request");
    }

    #[tokio::test]
    async fn plan_malformed_json_is_400() {
        let (status, json) = post_plan("{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON"));
    }

    #[tokio::test]
    async fn list_routes() {
        let (status, json) = get_json("/api/routes").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["routes"].as_array().unwrap().len(), 2);
        assert_eq!(json["routes"][1]["name"], "04B Lahug - Carbon");
    }

    #[tokio::test]
    async fn routes_near_point() {
        let (status, json) = get_json("/api/routes/near?lat=10.3005&lng=123.882").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["radius"], 200.0);
        assert_eq!(json["routes"].as_array().unwrap().len(), 1);
        assert_eq!(json["routes"][0]["routeId"], 1);
    }

    #[tokio::test]
    async fn routes_near_caps_radius() {
        let (status, json) = get_json("/api/routes/near?lat=10.3005&lng=123.885&radius=50000").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["radius"], 2_000.0);
        assert_eq!(json["routes"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn routes_near_rejects_bad_coordinate() {
        let (status, _) = get_json("/api/routes/near?lat=91&lng=123.882").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn route_position_projects() {
        let (status, json) = get_json("/api/routes/1/position?lat=10.3005&lng=123.90").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["direction"], "forward");
        assert!((json["position"].as_f64().unwrap() - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn route_position_endpoints() {
        let (_, json) = get_json("/api/routes/1/position?lat=10.30&lng=123.80").await;
        assert_eq!(json["position"], 0.0);

        let (_, json) = get_json("/api/routes/1/position?lat=10.30&lng=124.0").await;
        assert_eq!(json["position"], 1.0);
    }

    #[tokio::test]
    async fn route_position_unknown_route() {
        let (status, json) = get_json("/api/routes/1/position?lat=10.30&lng=123.90&direction=reverse").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["kind"], "unknown_route");
    }

    #[tokio::test]
    async fn fare_defaults_to_per_km() {
        let (status, json) = get_json("/api/fare?distance=10000").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["model"], "per_km");
        assert_eq!(json["fare"], 22.0);
    }

    #[tokio::test]
    async fn fare_stepped() {
        let (_, json) = get_json("/api/fare?distance=5500&model=stepped").await;
        assert_eq!(json["fare"], 16.6);
    }

    #[tokio::test]
    async fn fare_unknown_model() {
        let (status, json) = get_json("/api/fare?distance=5500&model=flat").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("flat"));
    }

    #[test]
    fn store_errors_map_to_status() {
        let response = AppError::from(PlanError::Store(StoreError::Unavailable("down".into()))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::from(PlanError::Timeout).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let response = AppError::from(PlanError::InvalidRequest("missing".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn store_error_body_is_retryable() {
        let response = AppError::from(StoreError::Unavailable("down".into())).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["kind"], "store");
        assert_eq!(json["retryable"], true);
    }
}
