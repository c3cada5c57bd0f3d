// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the webhook receiver.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use pathsetu_agent::TurnProcessor;
use pathsetu_core::{PathsetuError, PluginAdapter};
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::signature_middleware;
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Pipeline that handles each webhook delivery.
    pub processor: Arc<TurnProcessor>,
    /// Adapters reported on `GET /health`.
    pub adapters: Vec<Arc<dyn PluginAdapter>>,
    /// Enables body signature checks on `POST /webhook` when set.
    pub app_secret: Option<String>,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(processor: Arc<TurnProcessor>) -> Self {
        Self {
            processor,
            adapters: Vec::new(),
            app_secret: None,
            start_time: Instant::now(),
        }
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn PluginAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    pub fn with_app_secret(mut self, secret: Option<String>) -> Self {
        self.app_secret = secret.filter(|s| !s.is_empty());
        self
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("adapters", &self.adapters.len())
            .field("app_secret", &self.app_secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Bind address for the gateway.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Builds the gateway router:
/// - `GET /` (banner)
/// - `GET /health` (adapter health)
/// - `POST /webhook` (signature-checked when an app secret is set)
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::get_home))
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let webhook_routes = Router::new()
        .route("/webhook", post(handlers::post_webhook))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            signature_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(webhook_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Serves the gateway until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), PathsetuError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PathsetuError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| PathsetuError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway stopped");
    Ok(())
}
