// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. With an upstream
//! configured the `/api` tree becomes a pass-through proxy instead of
//! serving the local store.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::middleware as axum_middleware;
use axum::routing::{any, delete, get, post};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use hearth_config::model::{PlanTier, ServerConfig};
use hearth_core::HearthError;
use hearth_notify::Notifier;
use hearth_store::{PresenceTracker, TaskStore};

use crate::handlers;
use crate::identity::identity_middleware;
use crate::proxy::{self, UpstreamClient};

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The in-memory task and roster store.
    pub store: Arc<TaskStore>,
    /// Device presence map.
    pub presence: Arc<PresenceTracker>,
    /// Enforcement alert delivery.
    pub notifier: Arc<Notifier>,
    /// Active plan tier for `/api/plan`.
    pub plan: PlanTier,
    /// Upstream client; `Some` switches `/api` into proxy mode.
    pub upstream: Option<Arc<UpstreamClient>>,
    /// CORS origins; empty means permissive (dev).
    pub allowed_origins: Vec<String>,
    /// Health state.
    pub health: HealthState,
}

/// Build the gateway router for the given state.
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::get_service_info))
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = if state.upstream.is_some() {
        Router::new()
            .route("/api/{*path}", any(proxy::forward))
            .with_state(state.clone())
    } else {
        Router::new()
            .route("/api/users", get(handlers::get_users))
            .route("/api/plan", get(handlers::get_plan))
            .route(
                "/api/tasks",
                get(handlers::get_tasks).post(handlers::post_task),
            )
            .route(
                "/api/tasks/{id}",
                delete(handlers::delete_task).patch(handlers::patch_task),
            )
            .route("/api/tasks/{id}/ack", post(handlers::post_ack))
            .route("/api/tasks/{id}/hold", post(handlers::post_hold))
            .route("/api/tasks/{id}/resume", post(handlers::post_resume))
            .route("/api/tasks/{id}/enforce", post(handlers::post_enforce))
            .route(
                "/api/tasks/{id}/clear-enforcement",
                post(handlers::post_clear_enforcement),
            )
            .route("/api/tasks/{id}/cancel", post(handlers::post_cancel))
            .route("/api/tasks/{id}/proof", post(handlers::post_proof))
            .route(
                "/api/parental/enforce",
                post(handlers::post_parental_enforce),
            )
            .route("/api/device/presence", get(handlers::get_presence))
            .route(
                "/api/device/heartbeat",
                post(handlers::post_device_heartbeat),
            )
            .route_layer(axum_middleware::from_fn_with_state(
                state.clone(),
                identity_middleware,
            ))
            .with_state(state.clone())
    };

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(cors_layer(&state.allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// Permissive CORS in dev; a fixed origin list when configured.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves until `cancel` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), HearthError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HearthError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Hearth gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| HearthError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
