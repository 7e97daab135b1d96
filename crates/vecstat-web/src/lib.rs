//! # vecstat Web
//!
//! Serverless-style proxy in front of the WDS vector endpoint.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `POST /api/statcan` | Fetch and normalize vectors |
//! | `GET /data.json` | Static product catalog |
//! | `GET /api/catalog?q=` | Catalog search |
//! | `GET /healthz` | Liveness check |

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use vecstat_core::{Catalog, SourceError, StatCanAdapter, VectorSource};

pub use config::ServerConfig;
pub use error::{ApiError, ServerError};

/// Shared, read-only state of the running server.
pub struct AppState {
    pub source: Arc<dyn VectorSource>,
    /// A missing catalog is served as an error response, never a crash.
    pub catalog: Result<Catalog, SourceError>,
}

impl AppState {
    pub fn new(source: Arc<dyn VectorSource>, catalog: Result<Catalog, SourceError>) -> Self {
        Self { source, catalog }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        let catalog = Catalog::load(&config.catalog_path);
        match &catalog {
            Ok(catalog) => tracing::info!(products = catalog.len(), "catalog loaded"),
            Err(error) => tracing::warn!("{}", error.message()),
        }

        let source = StatCanAdapter::new(
            Arc::new(vecstat_core::ReqwestHttpClient::new()),
            config.fetch.clone(),
        );
        Self::new(Arc::new(source), catalog)
    }
}

pub fn router(state: Arc<AppState>, public_dir: Option<&std::path::Path>) -> Router {
    let router = Router::new()
        .route(
            "/api/statcan",
            post(routes::fetch_series).fallback(routes::method_not_allowed),
        )
        .route("/api/catalog", get(routes::search_catalog))
        .route("/data.json", get(routes::catalog_asset))
        .route("/healthz", get(routes::healthz));

    let router = match public_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
