// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for Pathsetu.
//!
//! Receives WhatsApp Cloud API webhook deliveries on `POST /webhook`, checks
//! the body signature when an app secret is configured, and hands each
//! delivery to the [`TurnProcessor`](pathsetu_agent::TurnProcessor). Also
//! serves a banner on `GET /` and adapter health on `GET /health`.

pub mod auth;
pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, build_router, start_server};
