//! HTTP API route definitions.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    health, metrics_endpoint, on_resource_creation_begin, on_resource_creation_completed,
    on_resource_creation_validate, on_resource_deletion_validate, AppState,
};
use crate::provider::LifecycleEvent;

/// Create the API router.
pub fn create_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        // Lifecycle webhooks
        .route(
            &LifecycleEvent::ResourceCreationValidate.path(),
            post(on_resource_creation_validate),
        )
        .route(
            &LifecycleEvent::ResourceCreationBegin.path(),
            put(on_resource_creation_begin),
        )
        .route(
            &LifecycleEvent::ResourceCreationCompleted.path(),
            post(on_resource_creation_completed),
        )
        .route(
            &LifecycleEvent::ResourceDeletionValidate.path(),
            post(on_resource_deletion_validate),
        )
        // Health and metrics
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Method and path of every lifecycle route, for display.
pub fn route_table() -> Vec<(String, String)> {
    use strum::IntoEnumIterator;

    LifecycleEvent::iter()
        .map(|event| (event.method().to_string(), event.path()))
        .collect()
}
