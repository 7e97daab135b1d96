//! Vector source trait and request/error types.
//!
//! [`VectorSource`] is the adapter contract for anything that can answer a
//! batch of vector lookups. The production implementation is
//! [`StatCanAdapter`](crate::adapters::StatCanAdapter).
//!
//! # Example
//!
//! ```rust,ignore
//! use vecstat_core::{FetchRequest, SeriesIdentifier, StatCanAdapter, VectorSource};
//!
//! async fn latest(adapter: &StatCanAdapter) -> Result<(), vecstat_core::SourceError> {
//!     let request = FetchRequest::new(vec![SeriesIdentifier::text("v41690973")], 12)?;
//!     let results = adapter.fetch(request).await?;
//!     println!("{} results", results.len());
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::{RawResult, SeriesIdentifier};

/// Observation count used when the caller supplies none or an unusable one.
pub const DEFAULT_OBSERVATION_COUNT: u32 = 60;

/// Error classification shared by the fetcher, catalog and HTTP boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    InvalidRequest,
    UpstreamUnavailable,
    UpstreamError,
    CatalogLoadFailure,
    Internal,
}

/// Structured source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    detail: Option<String>,
    status: Option<u16>,
    retryable: bool,
}

impl SourceError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidRequest, message, false)
    }

    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::UpstreamUnavailable, message, true)
    }

    /// Non-2xx provider response; `detail` carries the response body text.
    pub fn upstream_error(status: u16, detail: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::UpstreamError,
            message: format!("upstream returned status {status}"),
            detail: Some(detail.into()),
            status: Some(status),
            retryable: false,
        }
    }

    pub fn catalog_load_failure(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::CatalogLoadFailure, message, false)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Internal, message, false)
    }

    fn new(kind: SourceErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
            status: None,
            retryable,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Upstream HTTP status for `UpstreamError`.
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::InvalidRequest => "fetch.invalid_request",
            SourceErrorKind::UpstreamUnavailable => "fetch.upstream_unavailable",
            SourceErrorKind::UpstreamError => "fetch.upstream_error",
            SourceErrorKind::CatalogLoadFailure => "catalog.load_failure",
            SourceErrorKind::Internal => "fetch.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// A batch lookup of vectors with a shared observation count.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub identifiers: Vec<SeriesIdentifier>,
    pub observation_count: u32,
}

impl FetchRequest {
    /// A zero `observation_count` falls back to [`DEFAULT_OBSERVATION_COUNT`].
    pub fn new(
        identifiers: Vec<SeriesIdentifier>,
        observation_count: u32,
    ) -> Result<Self, SourceError> {
        if identifiers.is_empty() {
            return Err(SourceError::invalid_request("vectorIds required"));
        }

        let observation_count = if observation_count == 0 {
            DEFAULT_OBSERVATION_COUNT
        } else {
            observation_count
        };

        Ok(Self {
            identifiers,
            observation_count,
        })
    }

    /// Builds a request from a `{vectorIds, latestN}` JSON body.
    ///
    /// `vectorIds` must be a non-empty array. Elements that are neither
    /// strings nor numbers are kept as unresolvable identifiers.
    pub fn from_body(body: &Value) -> Result<Self, SourceError> {
        let identifiers = match body.get("vectorIds") {
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| {
                    SeriesIdentifier::from_json(value)
                        .unwrap_or_else(|| SeriesIdentifier::Text(value.to_string()))
                })
                .collect::<Vec<_>>(),
            _ => Vec::new(),
        };

        Self::new(identifiers, coerce_observation_count(body.get("latestN")))
    }
}

/// Coerces a loosely typed `latestN` into a positive count.
///
/// Numbers and numeric strings are truncated toward zero; absent, zero,
/// negative, non-finite or non-numeric input yields the default.
pub fn coerce_observation_count(value: Option<&Value>) -> u32 {
    let number = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(number) if number.is_finite() && number >= 1.0 => {
            number.trunc().min(f64::from(u32::MAX)) as u32
        }
        _ => DEFAULT_OBSERVATION_COUNT,
    }
}

/// Vector source adapter contract.
///
/// Implementations perform exactly one upstream call per [`fetch`](VectorSource::fetch)
/// and never retry; callers decide whether to try again.
pub trait VectorSource: Send + Sync {
    /// Short provider name used in logs and envelopes.
    fn name(&self) -> &'static str;

    /// Fetches the latest observations for every identifier in the batch.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if:
    /// - the transport fails (`UpstreamUnavailable`)
    /// - the provider answers with a non-success status (`UpstreamError`)
    /// - the provider body cannot be decoded (`Internal`)
    fn fetch<'a>(
        &'a self,
        req: FetchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawResult>, SourceError>> + Send + 'a>>;
}
