// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from domain errors to HTTP responses.
//!
//! Validation errors become 400s, unknown ids 404s, and upstream proxy
//! failures a distinguishable 502 `proxy_failed` body so clients can tell
//! gateway trouble from application errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use hearth_core::HearthError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error description.
    pub error: String,
    /// Extra detail, set for proxy failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Error type returned by all gateway handlers.
#[derive(Debug)]
pub enum ApiError {
    /// A domain error from the store or an integration.
    Domain(HearthError),
    /// The acting user's role does not permit the action.
    Forbidden(String),
}

impl From<HearthError> for ApiError {
    fn from(err: HearthError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    error: message,
                    detail: None,
                },
            ),
            ApiError::Domain(err) => match &err {
                HearthError::Validation(_) => (
                    StatusCode::BAD_REQUEST,
                    ErrorBody {
                        error: err.to_string(),
                        detail: None,
                    },
                ),
                HearthError::NotFound { .. } => (
                    StatusCode::NOT_FOUND,
                    ErrorBody {
                        error: err.to_string(),
                        detail: None,
                    },
                ),
                HearthError::Proxy { message, .. } => (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        error: "proxy_failed".to_string(),
                        detail: Some(message.clone()),
                    },
                ),
                HearthError::Unconfigured { .. } => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody {
                        error: err.to_string(),
                        detail: None,
                    },
                ),
                HearthError::Notify { .. }
                | HearthError::Config(_)
                | HearthError::Internal(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: err.to_string(),
                        detail: None,
                    },
                ),
            },
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = body.error.as_str(), "request failed");
        }
        (status, Json(body)).into_response()
    }
}
