//! HTTP request handlers.
//!
//! Release lookups always answer 200 with whatever the provider returns,
//! placeholder included. Only malformed requests are rejected.

use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use studio_core::{
    format_file_size, platform_display_name, CacheStatus, Product, ReleaseInfo, ReleaseQuery,
};
use tracing::debug;

/// One entry of a download menu.
#[derive(Debug, Serialize)]
pub struct DownloadOption {
    pub platform: String,
    pub label: String,
    pub url: String,
    pub size: u64,
    pub size_label: String,
    pub name: String,
}

/// Payload returned for every release lookup.
#[derive(Debug, Serialize)]
pub struct ReleaseResponse {
    pub versions: ReleaseInfo,
    pub downloads: Vec<DownloadOption>,
}

impl From<ReleaseInfo> for ReleaseResponse {
    fn from(info: ReleaseInfo) -> Self {
        let downloads = info
            .platforms
            .values()
            .map(|download| DownloadOption {
                platform: download.platform.clone(),
                label: platform_display_name(&download.platform).to_string(),
                url: download.url.clone(),
                size: download.size,
                size_label: format_file_size(download.size),
                name: download.name.clone(),
            })
            .collect();

        Self {
            versions: info,
            downloads,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub slug: &'static str,
    pub name: &'static str,
    pub query: String,
    pub cache: CacheStatus,
}

#[derive(Debug, Deserialize)]
pub struct ManifestParams {
    pub manifest_url: Option<String>,
}

/// Request errors surfaced to the caller.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// `GET /api/releases/:owner/:repo`
pub async fn handle_repository_release(
    State(state): State<Arc<AppState>>,
    Path((owner, repo)): Path<(String, String)>,
) -> Result<Json<ReleaseResponse>, ApiError> {
    let query = ReleaseQuery::repository(owner, repo);
    query
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(lookup(&state, &query).await)
}

/// `GET /api/releases?manifest_url=...`
pub async fn handle_manifest_release(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ManifestParams>,
) -> Result<Json<ReleaseResponse>, ApiError> {
    let url = params
        .manifest_url
        .ok_or_else(|| ApiError::BadRequest("missing manifest_url parameter".to_string()))?;
    let query = ReleaseQuery::manifest(url);
    query
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    // Only release manifests hosted on the configured GitHub host are fetched.
    let github_host = &state.provider.config().github_host;
    if query.repository_for(github_host).is_none() {
        return Err(ApiError::BadRequest(format!(
            "manifest_url must point at a release under {}",
            github_host
        )));
    }
    Ok(lookup(&state, &query).await)
}

/// `GET /api/products/:slug/release`
pub async fn handle_product_release(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<ReleaseResponse>, ApiError> {
    let product = Product::from_slug(&slug)
        .ok_or_else(|| ApiError::NotFound(format!("unknown product: {}", slug)))?;
    Ok(lookup(&state, &product.release_query()).await)
}

/// `GET /api/products`
pub async fn handle_products(State(state): State<Arc<AppState>>) -> Json<Vec<ProductSummary>> {
    let products = Product::ALL
        .iter()
        .map(|product| {
            let query = product.release_query();
            ProductSummary {
                slug: product.slug(),
                name: product.display_name(),
                cache: state.provider.cache_status(&query),
                query: query.cache_key(),
            }
        })
        .collect();
    Json(products)
}

async fn lookup(state: &AppState, query: &ReleaseQuery) -> Json<ReleaseResponse> {
    debug!("Release lookup for {}", query);
    let info = state.provider.get_release_info(query).await;
    Json(ReleaseResponse::from(info))
}
