use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use super::analysis::{analysis_routes, get_config};
use super::health::health_check;
use super::middleware::{cors_layer, security_headers_layer};
use crate::services::PoseAnalysisService;

/// Largest accepted request body; fits a 10000-frame sequence of all thirteen joints
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn create_routes(service: PoseAnalysisService) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/config", get(get_config))
        .nest("/api/analysis", analysis_routes())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security_headers_layer())
                .layer(cors_layer()),
        )
        .with_state(service)
}
