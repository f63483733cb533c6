//! HTTP-level tests for the GitHub release source and provider.
//!
//! An in-process axum server plays both github.com (manifest downloads) and
//! api.github.com (latest release listings).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use studio_core::{
    FailureKind, GitHubSource, ProviderConfig, ReleaseInfoProvider, ReleaseQuery, ReleaseSource,
    StudioError, UNKNOWN_ASSET_NAME,
};

#[derive(Default)]
struct Hits {
    manifest: AtomicUsize,
    release: AtomicUsize,
}

struct Upstream {
    addr: SocketAddr,
    hits: Arc<Hits>,
}

impl Upstream {
    fn base(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn config(&self) -> ProviderConfig {
        ProviderConfig::default()
            .with_github_host(self.base())
            .with_github_api_base(self.base())
    }
}

async fn manifest(
    State((hits, base)): State<(Arc<Hits>, String)>,
    Path((owner, repo)): Path<(String, String)>,
) -> impl IntoResponse {
    hits.manifest.fetch_add(1, Ordering::SeqCst);
    match (owner.as_str(), repo.as_str()) {
        ("djyde", "ccmate-release") => (
            StatusCode::OK,
            json!({
                "version": "1.2.0",
                "notes": "Bug fixes",
                "pub_date": "2025-09-01T10:00:00Z",
                "platforms": {
                    "darwin-aarch64": { "url": format!("{}/dl/a.dmg", base), "signature": "s" },
                    "darwin-x86_64": { "url": format!("{}/dl/b.dmg", base), "signature": "s" }
                }
            })
            .to_string(),
        ),
        ("broken", _) => (StatusCode::OK, "<html>not json</html>".to_string()),
        ("limited", _) => (
            StatusCode::OK,
            json!({"version": "0.1.0", "platforms": {}}).to_string(),
        ),
        _ => (StatusCode::NOT_FOUND, "Not Found".to_string()),
    }
}

async fn latest_release(
    State((hits, base)): State<(Arc<Hits>, String)>,
    Path((owner, repo)): Path<(String, String)>,
) -> axum::response::Response {
    hits.release.fetch_add(1, Ordering::SeqCst);
    match (owner.as_str(), repo.as_str()) {
        ("djyde", "ccmate-release") => Json(json!({
            "tag_name": "v1.2.0",
            "assets": [
                {
                    "name": "a.dmg",
                    "size": 5242880,
                    "browser_download_url": format!("{}/dl/a.dmg", base)
                },
                {
                    "name": "latest.json",
                    "size": 512,
                    "browser_download_url": format!("{}/dl/latest.json", base)
                }
            ]
        }))
        .into_response(),
        ("limited", _) => (
            StatusCode::FORBIDDEN,
            [("X-RateLimit-Remaining", "0"), ("X-RateLimit-Limit", "60")],
            Json(json!({"message": "API rate limit exceeded"})),
        )
            .into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"}))).into_response(),
    }
}

async fn start_upstream() -> Upstream {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(Hits::default());

    let app = Router::new()
        .route(
            "/:owner/:repo/releases/latest/download/latest.json",
            get(manifest),
        )
        .route("/repos/:owner/:repo/releases/latest", get(latest_release))
        .with_state((hits.clone(), format!("http://{}", addr)));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Upstream { addr, hits }
}

#[tokio::test]
async fn test_provider_merges_manifest_and_assets_over_http() {
    let upstream = start_upstream().await;
    let provider = ReleaseInfoProvider::new(upstream.config()).unwrap();

    let info = provider
        .get_release_info(&ReleaseQuery::repository("djyde", "ccmate-release"))
        .await;

    assert_eq!(info.version, "1.2.0");
    assert_eq!(info.published_at, "2025-09-01T10:00:00Z");
    assert_eq!(info.platforms.len(), 2);

    let arm = &info.platforms["darwin-aarch64"];
    assert_eq!(arm.size, 5_242_880);
    assert_eq!(arm.name, "a.dmg");

    let intel = &info.platforms["darwin-x86_64"];
    assert_eq!(intel.size, 0);
    assert_eq!(intel.name, UNKNOWN_ASSET_NAME);
}

#[tokio::test]
async fn test_provider_caches_across_calls() {
    let upstream = start_upstream().await;
    let provider = ReleaseInfoProvider::new(upstream.config()).unwrap();
    let query = ReleaseQuery::repository("djyde", "ccmate-release");

    let first = provider.get_release_info(&query).await;
    let second = provider.get_release_info(&query).await;

    assert_eq!(first, second);
    assert_eq!(upstream.hits.manifest.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.hits.release.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_manifest_404_returns_placeholder() {
    let upstream = start_upstream().await;
    let provider = ReleaseInfoProvider::new(upstream.config()).unwrap();
    let query = ReleaseQuery::repository("djyde", "missing");

    let info = provider.get_release_info(&query).await;
    assert!(info.is_placeholder());

    let again = provider.get_release_info(&query).await;
    assert!(again.is_placeholder());
    assert_eq!(upstream.hits.manifest.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.hits.release.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_source_reports_status_errors() {
    let upstream = start_upstream().await;
    let source = GitHubSource::from_config(&upstream.config()).unwrap();

    let err = source
        .fetch_manifest(&format!(
            "{}/djyde/missing/releases/latest/download/latest.json",
            upstream.base()
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, StudioError::HttpStatus { status: 404, .. }));
    assert_eq!(err.kind(), FailureKind::Status);
}

#[tokio::test]
async fn test_source_reports_malformed_manifest() {
    let upstream = start_upstream().await;
    let source = GitHubSource::from_config(&upstream.config()).unwrap();

    let err = source
        .fetch_manifest(&format!(
            "{}/broken/app/releases/latest/download/latest.json",
            upstream.base()
        ))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Parse);
}

#[tokio::test]
async fn test_source_detects_exhausted_rate_limit() {
    let upstream = start_upstream().await;
    let source = GitHubSource::from_config(&upstream.config()).unwrap();

    let err = source.fetch_latest_release("limited", "app").await.unwrap_err();

    assert!(matches!(err, StudioError::RateLimited { .. }));
    let state = source.http().rate_limit_state();
    assert_eq!(state.remaining, Some(0));
    assert_eq!(state.limit, Some(60));
}

#[tokio::test]
async fn test_unreachable_host_is_a_transport_failure() {
    let config = ProviderConfig::default()
        .with_github_host("http://127.0.0.1:1")
        .with_github_api_base("http://127.0.0.1:1");
    let provider = ReleaseInfoProvider::new(config).unwrap();

    let outcome = provider
        .fetch_release_info(&ReleaseQuery::repository("djyde", "ccmate-release"))
        .await;

    match outcome {
        studio_core::FetchOutcome::Failure(err) => {
            assert_eq!(err.kind(), FailureKind::Transport)
        }
        studio_core::FetchOutcome::Success(_) => panic!("expected a transport failure"),
    }
}
