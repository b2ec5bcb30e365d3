// SPDX-FileCopyrightText: 2026 Tiprelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the tiprelay donation relay.
//!
//! Serves three groups of routes on one axum router:
//!
//! - Provider webhooks under the target's secret path segment
//!   (`/{secret}/saweria`, `/{secret}/socialbuzz`, `/{secret}/test`)
//! - The dashboard and admin JSON API under `/api`
//! - HTML views (`/`, `/dashboard`, `/admin/dashboard`)

pub mod api;
pub mod body;
pub mod render;
pub mod server;
pub mod verify;
pub mod views;
pub mod webhooks;

pub use server::{GatewayState, build_router, start_server};
