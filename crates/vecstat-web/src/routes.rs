use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use vecstat_core::{fetch_normalized, FetchRequest, Product, SourceError};

use crate::error::ApiError;
use crate::AppState;

/// `POST /api/statcan`: `{vectorIds, latestN?}` in, `{series}` out.
pub async fn fetch_series(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let body: Value = if body.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| SourceError::internal(format!("invalid JSON body: {e}")))?
    };

    let request = FetchRequest::from_body(&body)?;
    tracing::info!(
        vectors = request.identifiers.len(),
        latest_n = request.observation_count,
        "fetch requested"
    );

    let report = fetch_normalized(state.source.as_ref(), request).await?;
    Ok(Json(json!({ "series": report.series })))
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// `GET /data.json`: the catalog asset as loaded at startup.
pub async fn catalog_asset(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let catalog = state.catalog.as_ref().map_err(|error| ApiError(error.clone()))?;
    Ok(Json(catalog.clone()))
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: String,
}

/// `GET /api/catalog?q=`: products whose id or description matches.
pub async fn search_catalog(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let catalog = state.catalog.as_ref().map_err(|error| ApiError(error.clone()))?;
    let products: Vec<&Product> = catalog.search(&query.q);
    Ok(Json(json!({ "query": query.q, "products": products })))
}

pub async fn healthz() -> &'static str {
    "ok"
}
