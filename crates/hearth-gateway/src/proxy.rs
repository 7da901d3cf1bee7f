// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pass-through proxy mode.
//!
//! When `upstream.base_url` is configured the gateway does not serve the
//! local store; every `/api/*` request is forwarded verbatim to the
//! backing service and the response relayed back. Upstream failures map
//! to a 502 `proxy_failed` body so browser clients can tell gateway
//! trouble from application errors.

use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use hearth_config::model::UpstreamConfig;
use hearth_core::HearthError;

use crate::error::ApiError;
use crate::identity::USER_HEADER;
use crate::server::GatewayState;

/// Largest request body the proxy will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// HTTP client bound to the configured upstream base URL.
pub struct UpstreamClient {
    base_url: String,
    http: reqwest::Client,
}

impl UpstreamClient {
    /// Build a client when an upstream is configured; `Ok(None)` when the
    /// gateway serves its own store.
    pub fn from_config(config: &UpstreamConfig) -> Result<Option<Self>, HearthError> {
        let Some(base_url) = &config.base_url else {
            return Ok(None);
        };
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HearthError::Proxy {
                message: format!("building upstream client failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }))
    }

    /// Forward one request and return the upstream's status, content type,
    /// and body.
    async fn send(
        &self,
        method: &axum::http::Method,
        path_and_query: &str,
        user_header: Option<String>,
        content_type: Option<String>,
        body: Bytes,
    ) -> Result<(StatusCode, String, Bytes), HearthError> {
        let method = reqwest::Method::from_bytes(method.as_str().as_bytes()).map_err(|e| {
            HearthError::Proxy {
                message: format!("method not forwardable: {e}"),
                source: Some(Box::new(e)),
            }
        })?;
        let url = format!("{}{}", self.base_url, path_and_query);

        let mut builder = self.http.request(method, &url).body(body.to_vec());
        if let Some(user) = user_header {
            builder = builder.header(USER_HEADER, user);
        }
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }

        let response = builder.send().await.map_err(|e| HearthError::Proxy {
            message: format!("upstream request to {url} failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();
        let bytes = response.bytes().await.map_err(|e| HearthError::Proxy {
            message: format!("reading upstream response failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok((status, content_type, Bytes::from(bytes.to_vec())))
    }
}

/// Axum handler forwarding any `/api/*` request to the upstream.
pub async fn forward(
    State(state): State<GatewayState>,
    request: Request,
) -> Result<Response, ApiError> {
    let Some(upstream) = state.upstream.clone() else {
        return Err(ApiError::from(HearthError::Internal(
            "proxy route mounted without an upstream".into(),
        )));
    };

    let method = request.method().clone();
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let user_header = request
        .headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            ApiError::from(HearthError::Proxy {
                message: format!("reading request body failed: {e}"),
                source: Some(Box::new(e)),
            })
        })?;

    let (status, content_type, bytes) = upstream
        .send(&method, &path_and_query, user_header, content_type, body)
        .await?;

    Ok((status, [(header::CONTENT_TYPE, content_type)], bytes).into_response())
}
