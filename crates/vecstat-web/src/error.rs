use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use vecstat_core::{SourceError, SourceErrorKind};

/// Startup failures of the server binary.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid value '{value}' for {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidConfig { .. } => 2,
            Self::Io(_) => 10,
        }
    }
}

/// Request failure rendered as a JSON error body.
#[derive(Debug)]
pub struct ApiError(pub SourceError);

impl From<SourceError> for ApiError {
    fn from(error: SourceError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;
        let (status, body) = match error.kind() {
            SourceErrorKind::InvalidRequest => {
                (StatusCode::BAD_REQUEST, json!({ "error": error.message() }))
            }
            SourceErrorKind::UpstreamError => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": "Upstream error", "detail": error.detail().unwrap_or_default() }),
            ),
            SourceErrorKind::UpstreamUnavailable => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": "Upstream unavailable", "detail": error.message() }),
            ),
            SourceErrorKind::CatalogLoadFailure => {
                (StatusCode::NOT_FOUND, json!({ "error": error.message() }))
            }
            SourceErrorKind::Internal => {
                tracing::error!(code = error.code(), "{}", error.message());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": error.message() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
