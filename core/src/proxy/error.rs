//! Gateway errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid upstream target {target:?}: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("invalid path rewrite pattern {pattern:?}: {source}")]
    InvalidRewrite {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("failed to read request body: {0}")]
    Body(String),

    #[error("upstream timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),
}

impl ProxyError {
    pub fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e)
        } else {
            Self::Upstream(e)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidTarget { .. } | Self::InvalidRewrite { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Proxy error: {}", self);
        } else {
            tracing::debug!("Rejected proxy request: {}", self);
        }
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}
