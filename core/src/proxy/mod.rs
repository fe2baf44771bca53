//! Proxy module - API path-rewrite reverse proxy

pub mod config;
pub mod error;
pub mod handlers;
pub mod headers;
pub mod rewrite;
pub mod server;
pub mod upstream;

pub use config::ProxyRule;
pub use error::ProxyError;
pub use rewrite::PathRewrite;
pub use server::{build_router, AppState, ProxyServer};
pub use upstream::UpstreamClient;
