// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pathsetu_core::HealthStatus;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::server::GatewayState;

/// Body of `GET /`.
pub const HOME_BANNER: &str = "Pathsetu WhatsApp Bot is Running!";

/// Body returned for every accepted webhook delivery.
pub const EVENT_RECEIVED: &str = "EVENT_RECEIVED";

/// Response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy", "degraded", or "unhealthy".
    pub status: &'static str,
    /// Binary version.
    pub version: &'static str,
    pub uptime_secs: u64,
    pub adapters: Vec<AdapterHealth>,
}

#[derive(Debug, Serialize)]
pub struct AdapterHealth {
    pub name: String,
    pub kind: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET / - liveness banner.
pub async fn get_home() -> &'static str {
    HOME_BANNER
}

/// GET /health - aggregated adapter health.
///
/// Responds 503 when any adapter reports unhealthy.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let mut adapters = Vec::with_capacity(state.adapters.len());
    let mut worst = 0u8;

    for adapter in &state.adapters {
        let (status, detail, rank) = match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => ("healthy", None, 0),
            Ok(HealthStatus::Degraded(reason)) => ("degraded", Some(reason), 1),
            Ok(HealthStatus::Unhealthy(reason)) => ("unhealthy", Some(reason), 2),
            Err(e) => ("unhealthy", Some(e.to_string()), 2),
        };
        worst = worst.max(rank);
        adapters.push(AdapterHealth {
            name: adapter.name().to_string(),
            kind: adapter.adapter_type().to_string(),
            status,
            detail,
        });
    }

    let (code, status) = match worst {
        0 => (StatusCode::OK, "healthy"),
        1 => (StatusCode::OK, "degraded"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy"),
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.start_time.elapsed().as_secs(),
        adapters,
    };
    (code, Json(body)).into_response()
}

/// POST /webhook - one WhatsApp delivery.
///
/// Anything that parses as JSON is acknowledged with 200 once the turn has
/// been handled; the turn itself never fails the request.
pub async fn post_webhook(State(state): State<GatewayState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "webhook body is not valid JSON");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "invalid JSON body".to_string(),
                }),
            )
                .into_response();
        }
    };

    let outcome = state.processor.process_payload(&payload).await;
    debug!(?outcome, "webhook delivery handled");

    (StatusCode::OK, EVENT_RECEIVED).into_response()
}
