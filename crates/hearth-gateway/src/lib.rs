// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Hearth family task service.
//!
//! Exposes the task store as the REST surface the admin clients speak:
//! task CRUD and lifecycle actions, roster and plan lookups, device
//! presence, and the device-level parental enforce endpoint. Identity
//! comes from the client-supplied `x-user-id` header (a documented trust
//! gap); role checks are a policy function at this boundary, never inside
//! the store.

pub mod error;
pub mod handlers;
pub mod identity;
pub mod policy;
pub mod proxy;
pub mod server;

pub use error::ApiError;
pub use identity::{Identity, USER_HEADER};
pub use proxy::UpstreamClient;
pub use server::{build_router, start_server, GatewayState, HealthState};
