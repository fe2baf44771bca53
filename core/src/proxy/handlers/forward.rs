//! Fallback handler
//! Requests under the mount prefix go upstream, everything else to the front-end bundle

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
};

use crate::proxy::server::AppState;

pub async fn handle_request(State(state): State<AppState>, request: Request<Body>) -> Response {
    if !state.rule.matches(request.uri().path()) {
        return crate::proxy::handlers::frontend::serve(state.frontend.clone(), request).await;
    }

    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);

    match state.upstream.forward(&state.rule, request, client_addr).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}
