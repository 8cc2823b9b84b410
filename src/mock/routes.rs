use super::handlers;
use super::state::MockState;
use axum::{routing::get, routing::post, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the mock service router with all routes
pub fn create_router(state: MockState) -> Router {
    Router::new()
        // Status
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Classification
        .route("/predict", post(handlers::predict))
        .route("/predict-batch", post(handlers::predict_batch))
        // History and aggregates
        .route(
            "/history",
            get(handlers::history).delete(handlers::clear_history),
        )
        .route("/analytics", get(handlers::analytics))
        // Request logging, and CORS for browser clients
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
