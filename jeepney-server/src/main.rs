use std::error::Error;
use std::net::SocketAddr;

use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jeepney_server::cache::{CacheConfig, CachedStore};
use jeepney_server::planner::PlannerConfig;
use jeepney_server::store::load_routes;
use jeepney_server::web::{AppState, create_router};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_ROUTES_PATH: &str = "data/routes.geojson";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    // Load config
    let config = PlannerConfig::from_env()?;
    tracing::info!(
        threshold_m = config.proximity_threshold_m,
        transfer_tolerance_m = config.transfer_tolerance_m,
        fare_model = config.fare_model.name(),
        max_results = config.max_results,
        "Loaded planner configuration"
    );

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;
    let routes_path =
        std::env::var("ROUTES_PATH").unwrap_or_else(|_| DEFAULT_ROUTES_PATH.to_string());

    // Load route geometries
    let store = load_routes(&routes_path).map_err(|e| {
        tracing::error!(path = %routes_path, error = %e, "Failed to load routes");
        e
    })?;
    tracing::info!(path = %routes_path, geometries = store.len(), "Loaded routes");

    let cached = CachedStore::new(store, &CacheConfig::default());
    let state = AppState::new(cached, config);

    let cors_layer = if std::env::var("CORS_PERMISSIVE").is_ok_and(|v| v == "true" || v == "1") {
        tracing::warn!("CORS: Permissive mode enabled (all origins allowed)");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Jeepney planner listening on http://{addr}");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /api/plan");
    tracing::info!("  GET  /api/routes");
    tracing::info!("  GET  /api/routes/near");
    tracing::info!("  GET  /api/routes/:id/position");
    tracing::info!("  GET  /api/fare");

    axum::serve(listener, app).await?;
    Ok(())
}
