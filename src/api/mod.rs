//! HTTP API module: lifecycle webhooks plus health and metrics endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
