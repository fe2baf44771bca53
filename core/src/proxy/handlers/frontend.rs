//! Built front-end bundle (SPA) serving

use std::path::Path;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

pub type FrontendService = ServeDir<ServeFile>;

/// Static files from `dist_dir`, unknown paths fall back to `index.html`
/// so client-side routes resolve.
pub fn service(dist_dir: &Path) -> FrontendService {
    ServeDir::new(dist_dir).fallback(ServeFile::new(dist_dir.join("index.html")))
}

pub async fn serve(frontend: Option<FrontendService>, request: Request<Body>) -> Response {
    let Some(frontend) = frontend else {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response();
    };

    match frontend.oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
