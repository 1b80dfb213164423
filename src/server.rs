//! Liveness endpoint for hosting platforms (Render/Replit style health
//! checks). One route, constant payload, no auth.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

pub fn router() -> Router {
    Router::new().route("/", get(health))
}

async fn health() -> Json<Health> {
    Json(Health { status: "running" })
}

/// Serve the health check on all interfaces for the process lifetime.
pub async fn run(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("health endpoint listening on {}", addr);
    axum::serve(listener, router()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get_root() -> (StatusCode, serde_json::Value) {
        let response = router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn get_root_reports_running() {
        let (status, body) = get_root().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"status": "running"}));
    }

    #[tokio::test]
    async fn payload_is_the_same_on_every_request() {
        let first = get_root().await;
        let second = get_root().await;
        assert_eq!(first, second);
    }
}
