// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Cloud API integration.
//!
//! Inbound: webhook payload classification and body signature checks.
//! Outbound: a [`MessageDispatcher`](pathsetu_core::MessageDispatcher) over
//! the Graph API `messages` endpoint.

pub mod dispatcher;
pub mod signature;
pub mod types;
pub mod webhook;

pub use dispatcher::WhatsAppDispatcher;
pub use signature::{SIGNATURE_HEADER, sign, verify_signature};
pub use webhook::parse_event;
