//! Gateway server - Axum HTTP server

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::proxy::handlers::frontend::{self, FrontendService};
use crate::proxy::{ProxyRule, UpstreamClient};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub rule: Arc<ProxyRule>,
    pub upstream: Arc<UpstreamClient>,
    pub frontend: Option<FrontendService>,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let rule = ProxyRule::from_config(&config.upstream)?;
        let upstream = UpstreamClient::new(&config.upstream)?;

        let frontend = match &config.frontend.dist_dir {
            Some(dir) if dir.is_dir() => Some(frontend::service(dir)),
            Some(dir) => {
                tracing::warn!("Front-end directory {:?} not found, serving API only", dir);
                None
            }
            None => None,
        };

        Ok(Self {
            rule: Arc::new(rule),
            upstream: Arc::new(upstream),
            frontend,
        })
    }
}

/// Gateway server instance
pub struct ProxyServer {
    bind: String,
    port: u16,
    state: AppState,
}

impl ProxyServer {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            bind: config.server.bind_address().to_string(),
            port: config.server.port,
            state: AppState::from_config(config)?,
        })
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Run the gateway server (blocking)
    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();

        let addr = format!("{}:{}", self.bind, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("Gateway listening on {}", addr);
        tracing::info!(
            "Proxying {}* -> {}",
            self.state.rule.mount(),
            self.state.rule.target()
        );

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // CORS stays on the local routes; proxied requests and responses pass through untouched
    let health = Router::new()
        .route("/healthz", get(health_check_handler))
        .route("/health", get(health_check_handler))
        .layer(cors);

    Router::new()
        .merge(health)
        .fallback(crate::proxy::handlers::forward::handle_request)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_check_handler() -> Response {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
