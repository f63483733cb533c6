//! HTTP server implementation using Axum.

use crate::handler::{
    handle_health, handle_manifest_release, handle_product_release, handle_products,
    handle_repository_release,
};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use studio_core::ReleaseInfoProvider;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Application state shared across handlers.
pub struct AppState {
    /// Process-wide release lookup and cache.
    pub provider: ReleaseInfoProvider,
}

/// Build the router with all routes and layers.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/releases", get(handle_manifest_release))
        .route("/api/releases/:owner/:repo", get(handle_repository_release))
        .route("/api/products", get(handle_products))
        .route("/api/products/:slug/release", get(handle_product_release))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server.
///
/// Returns the actual address the server is bound to (useful when port=0).
pub async fn start_server(
    provider: ReleaseInfoProvider,
    host: &str,
    port: u16,
) -> anyhow::Result<SocketAddr> {
    let state = Arc::new(AppState { provider });
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode, Json};
    use serde_json::{json, Value};
    use studio_core::ProviderConfig;

    /// Minimal stand-in for github.com and api.github.com.
    async fn start_fake_github() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let manifest_base = base.clone();
        let release_base = base.clone();
        let app = Router::new()
            .route(
                "/:owner/:repo/releases/latest/download/latest.json",
                get(move |Path((owner, _repo)): Path<(String, String)>| {
                    let base = manifest_base.clone();
                    async move {
                        if owner != "djyde" {
                            return (StatusCode::NOT_FOUND, Json(json!({})));
                        }
                        (
                            StatusCode::OK,
                            Json(json!({
                                "version": "1.2.0",
                                "notes": "",
                                "pub_date": "2025-09-01T10:00:00Z",
                                "platforms": {
                                    "darwin-aarch64": { "url": format!("{}/dl/a.dmg", base) }
                                }
                            })),
                        )
                    }
                }),
            )
            .route(
                "/repos/:owner/:repo/releases/latest",
                get(move || {
                    let base = release_base.clone();
                    async move {
                        Json(json!({
                            "tag_name": "v1.2.0",
                            "assets": [{
                                "name": "a.dmg",
                                "size": 5242880,
                                "browser_download_url": format!("{}/dl/a.dmg", base)
                            }]
                        }))
                    }
                }),
            );

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        base
    }

    async fn start_test_server() -> SocketAddr {
        let github = start_fake_github().await;
        let config = ProviderConfig::default()
            .with_github_host(github.clone())
            .with_github_api_base(github);
        let provider = ReleaseInfoProvider::new(config).unwrap();
        start_server(provider, "127.0.0.1", 0).await.unwrap()
    }

    async fn get_json(addr: SocketAddr, path: &str) -> (u16, Value) {
        let response = reqwest::get(format!("http://{}{}", addr, path)).await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn test_server_starts() {
        let addr = start_test_server().await;
        assert!(addr.port() > 0);

        let (status, body) = get_json(addr, "/health").await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_repository_release() {
        let addr = start_test_server().await;

        let (status, body) = get_json(addr, "/api/releases/djyde/ccmate-release").await;
        assert_eq!(status, 200);
        assert_eq!(body["versions"]["version"], "1.2.0");
        assert_eq!(
            body["versions"]["platforms"]["darwin-aarch64"]["size"],
            5242880
        );
        assert_eq!(body["downloads"][0]["label"], "macOS (Apple Silicon)");
        assert_eq!(body["downloads"][0]["size_label"], "5 MB");
    }

    #[tokio::test]
    async fn test_upstream_failure_still_answers_ok() {
        let addr = start_test_server().await;

        let (status, body) = get_json(addr, "/api/releases/someone-else/app").await;
        assert_eq!(status, 200);
        assert_eq!(
            body["versions"],
            json!({"version": "N/A", "notes": "", "pub_date": "", "platforms": {}})
        );
        assert_eq!(body["downloads"], json!([]));
    }

    #[tokio::test]
    async fn test_invalid_requests_are_rejected() {
        let addr = start_test_server().await;

        let (status, body) = get_json(addr, "/api/releases/bad%20owner/app").await;
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("owner"));

        let (status, _) = get_json(addr, "/api/releases").await;
        assert_eq!(status, 400);

        let (status, _) = get_json(addr, "/api/releases?manifest_url=ftp://x/latest.json").await;
        assert_eq!(status, 400);

        let (status, body) = get_json(
            addr,
            "/api/releases?manifest_url=http://169.254.169.254/a/b/releases/latest.json",
        )
        .await;
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("manifest_url"));

        let (status, _) = get_json(addr, "/api/products/unknown/release").await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_products_listing() {
        let addr = start_test_server().await;

        let (status, body) = get_json(addr, "/api/products").await;
        assert_eq!(status, 200);
        let products = body.as_array().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0]["slug"], "ccmate");
        assert_eq!(products[0]["query"], "djyde/ccmate-release");
        assert_eq!(products[0]["cache"]["cached"], false);
    }
}
