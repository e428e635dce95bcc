//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::Result;
use crate::metrics::{self, LatencyTimer};
use crate::provider::{
    LifecycleEvent, MetadataStamp, Resource, ResourceScope, TableLog, WebhookResponse,
};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Writer for collector table lines.
    pub table_log: Arc<TableLog>,
    /// Description stamped into new internal metadata.
    pub metadata_description: Arc<str>,
    /// Prometheus handle, when a recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create app state from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            table_log: Arc::new(TableLog::new(config.table_name.clone())),
            metadata_description: Arc::from(config.internal_metadata_description.as_str()),
            prometheus: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Record the start of a lifecycle callback.
    fn record_call(&self, event: LifecycleEvent) {
        self.table_log.emit(event, Utc::now());
        metrics::inc_webhook_requests(event);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Raw query pairs, or the rejection when the query string does not parse.
type ScopeQuery = std::result::Result<Query<Vec<(String, String)>>, QueryRejection>;

/// Bind the identifying parameters; an unparsable query binds nothing.
fn resolve_scope(query: ScopeQuery) -> ResourceScope {
    match query {
        Ok(Query(pairs)) => ResourceScope::from_pairs(pairs),
        Err(rejection) => {
            warn!(error = %rejection, "unparsable query string, no parameters bound");
            ResourceScope::default()
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Prometheus scrape handler.
pub async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let body = state
        .prometheus
        .as_ref()
        .map(PrometheusHandle::render)
        .unwrap_or_default();
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}

/// Called before a resource creation is committed.
pub async fn on_resource_creation_validate(
    State(state): State<AppState>,
    query: ScopeQuery,
) -> WebhookResponse {
    let scope = resolve_scope(query);
    validate_scope(&state, LifecycleEvent::ResourceCreationValidate, &scope)
}

/// Called to materialize the resource; stamps its internal metadata.
pub async fn on_resource_creation_begin(
    State(state): State<AppState>,
    query: ScopeQuery,
    body: Bytes,
) -> Result<WebhookResponse> {
    let scope = resolve_scope(query);
    begin_creation(&state, &scope, &body)
}

/// Called after the resource creation finished.
pub async fn on_resource_creation_completed(
    State(state): State<AppState>,
    query: ScopeQuery,
) -> WebhookResponse {
    let scope = resolve_scope(query);
    complete_creation(&state, &scope)
}

/// Called before a resource deletion is committed.
pub async fn on_resource_deletion_validate(
    State(state): State<AppState>,
    query: ScopeQuery,
) -> WebhookResponse {
    let scope = resolve_scope(query);
    validate_scope(&state, LifecycleEvent::ResourceDeletionValidate, &scope)
}

/// Shared validation rule: every identifying parameter must be present.
#[instrument(skip(state), fields(action = %event))]
fn validate_scope(
    state: &AppState,
    event: LifecycleEvent,
    scope: &ResourceScope,
) -> WebhookResponse {
    let _timer = LatencyTimer::new(event);
    state.record_call(event);

    if scope.is_complete() {
        info!("validation passed");
        return WebhookResponse::ok_empty();
    }

    metrics::inc_validation_failures(event);
    warn!(missing = ?scope.missing_fields(), "validation refused");
    match event.validation_failure() {
        Some(error) => WebhookResponse::ok_error(error),
        None => WebhookResponse::ok_empty(),
    }
}

#[instrument(
    skip(state, body),
    fields(action = %LifecycleEvent::ResourceCreationBegin, body_len = body.len())
)]
fn begin_creation(
    state: &AppState,
    scope: &ResourceScope,
    body: &[u8],
) -> Result<WebhookResponse> {
    let event = LifecycleEvent::ResourceCreationBegin;
    let _timer = LatencyTimer::new(event);
    state.record_call(event);

    let mut resource = Resource::from_slice(body)?;

    // Provisioning work for the resource goes here.
    let stamp = resource
        .properties
        .stamp_internal_metadata(Utc::now(), &state.metadata_description)?;
    match stamp {
        MetadataStamp::Created => info!("internal metadata created"),
        MetadataStamp::Updated => info!("internal metadata refreshed"),
    }

    Ok(WebhookResponse::ok_resource(resource))
}

#[instrument(skip(state), fields(action = %LifecycleEvent::ResourceCreationCompleted))]
fn complete_creation(state: &AppState, scope: &ResourceScope) -> WebhookResponse {
    let _timer = LatencyTimer::new(LifecycleEvent::ResourceCreationCompleted);
    state.record_call(LifecycleEvent::ResourceCreationCompleted);

    // Post-provisioning work (e.g. starting billing) goes here.
    debug!("creation completed");
    WebhookResponse::ok_empty()
}
