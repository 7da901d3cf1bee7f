// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared across the Hearth workspace.

use thiserror::Error;

/// The primary error type used across the Hearth store, gateway, and
/// integrations.
#[derive(Debug, Error)]
pub enum HearthError {
    /// Malformed or missing input, rejected at the boundary before any
    /// mutation (empty title, non-positive hold minutes, empty weekly day
    /// set).
    #[error("validation error: {0}")]
    Validation(String),

    /// A task or user id that does not exist in the store.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Configuration errors (invalid TOML, missing required fields, type
    /// mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// An upstream call made in proxy mode failed or timed out.
    #[error("proxy error: {message}")]
    Proxy {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An optional integration is missing required configuration. Callers
    /// degrade to a logged no-op rather than failing the request.
    #[error("{integration} is not configured: {message}")]
    Unconfigured {
        integration: &'static str,
        message: String,
    },

    /// Notification delivery errors (SMTP connect, send failure).
    #[error("notify error: {message}")]
    Notify {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HearthError {
    /// Shorthand for a `NotFound` error about a task id.
    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "task",
            id: id.into(),
        }
    }

    /// Shorthand for a `NotFound` error about a user id.
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "user",
            id: id.into(),
        }
    }
}
