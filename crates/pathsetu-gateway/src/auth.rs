// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook body signature middleware.
//!
//! When an app secret is configured, every request on the webhook route must
//! carry `X-Hub-Signature-256: sha256=<hex>` matching the HMAC-SHA256 of the
//! raw body. Without a secret the check is skipped.

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use pathsetu_whatsapp::{SIGNATURE_HEADER, verify_signature};
use tracing::warn;

use crate::server::GatewayState;

/// Upper bound on a buffered webhook body.
pub const MAX_WEBHOOK_BODY_BYTES: usize = 1024 * 1024;

/// Rejects webhook deliveries whose signature does not match the body.
pub async fn signature_middleware(
    State(state): State<GatewayState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(secret) = state.app_secret.as_deref() else {
        return Ok(next.run(request).await);
    };

    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_WEBHOOK_BODY_BYTES)
        .await
        .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;

    let header = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    match header {
        Some(value) if verify_signature(secret, &bytes, value) => {
            let request = Request::from_parts(parts, Body::from(bytes));
            Ok(next.run(request).await)
        }
        Some(_) => {
            warn!("webhook signature mismatch, rejecting delivery");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            warn!("webhook delivery without signature header, rejecting");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
