//! Upstream client for forwarding proxied requests

use std::net::SocketAddr;

use axum::{
    body::{self, Body},
    http::{header, Request, Response},
};
use http_body_util::LengthLimitError;
use reqwest::{redirect, Client};
use tokio::time::Duration;

use crate::config::UpstreamConfig;
use crate::proxy::config::ProxyRule;
use crate::proxy::error::ProxyError;
use crate::proxy::headers;

#[derive(Clone)]
pub struct UpstreamClient {
    http_client: Client,
    max_body_bytes: usize,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(Duration::from_secs(config.request_timeout))
            // Redirects are relayed to the client, not followed
            .redirect(redirect::Policy::none());

        if let Some(proxy) = config.proxy_url.as_deref() {
            if !proxy.is_empty() {
                builder = builder.proxy(reqwest::Proxy::all(proxy)?);
                tracing::info!("Using outbound proxy: {}", proxy);
            }
        }

        Ok(Self {
            http_client: builder.build()?,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Forward a request that matched `rule` and relay the upstream response
    pub async fn forward(
        &self,
        rule: &ProxyRule,
        request: Request<Body>,
        client_addr: Option<SocketAddr>,
    ) -> Result<Response<Body>, ProxyError> {
        let (parts, body) = request.into_parts();

        let declared_len = parts
            .headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if declared_len.is_some_and(|len| len > self.max_body_bytes) {
            return Err(ProxyError::PayloadTooLarge { limit: self.max_body_bytes });
        }

        let body = body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(|e| {
                if exceeds_limit(&e) {
                    ProxyError::PayloadTooLarge { limit: self.max_body_bytes }
                } else {
                    ProxyError::Body(e.to_string())
                }
            })?;

        let url = rule.target_url(parts.uri.path(), parts.uri.query());
        let outbound = headers::outbound_headers(rule, &parts.headers, client_addr);

        tracing::debug!("{} {} -> {}", parts.method, parts.uri, url);

        let mut upstream_request = self
            .http_client
            .request(parts.method.clone(), url)
            .headers(outbound);
        if !body.is_empty() {
            upstream_request = upstream_request.body(body);
        }

        let upstream = upstream_request
            .send()
            .await
            .map_err(ProxyError::from_transport)?;

        let status = upstream.status();
        if status.is_server_error() {
            tracing::warn!("Upstream returned {} for {}", status, parts.uri.path());
        }

        let mut response = Response::builder().status(status);
        if let Some(relayed) = response.headers_mut() {
            *relayed = headers::response_headers(upstream.headers());
        }

        response
            .body(Body::from_stream(upstream.bytes_stream()))
            .map_err(|e| ProxyError::Body(e.to_string()))
    }
}

/// Whether a body read failed on the size limit rather than on the transport
fn exceeds_limit(e: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(e);
    while let Some(err) = source {
        if err.is::<LengthLimitError>() {
            return true;
        }
        source = err.source();
    }
    false
}
