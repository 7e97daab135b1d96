//! # vecstat Core
//!
//! Fetching, normalizing and tabulating Statistics Canada vector data.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | WDS provider adapter (the vector fetcher) |
//! | [`chart`] | Chart-ready datasets |
//! | [`config`] | Environment-backed fetch configuration |
//! | [`data_source`] | Source trait, fetch request and error taxonomy |
//! | [`domain`] | Vector ids, raw results, normalized series, catalog |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`export`] | CSV export |
//! | [`http_client`] | HTTP client abstraction |
//! | [`normalize`] | Raw results to chronological series |
//! | [`pivot`] | Series aligned by reference period |
//! | [`state`] | Session state reducer |
//!
//! ## Data flow
//!
//! ```text
//! ids + latestN ─▶ StatCanAdapter ─▶ Vec<RawResult> ─▶ normalize ─▶ Vec<NormalizedSeries>
//!                                                                         │
//!                                    chart_data ◀─────────────────────────┼──▶ pivot ─▶ to_csv
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vecstat_core::{
//!     fetch_normalized, pivot, to_csv, FetchRequest, SeriesIdentifier, StatCanAdapter,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = StatCanAdapter::from_env();
//!     let request = FetchRequest::new(vec![SeriesIdentifier::text("v41690973")], 12)?;
//!     let report = fetch_normalized(&adapter, request).await?;
//!     println!("{}", to_csv(&pivot(&report.series)));
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod chart;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod export;
pub mod http_client;
pub mod normalize;
pub mod pivot;
pub mod state;

pub use adapters::{build_payload, parse_response, StatCanAdapter, VectorQuery};

pub use chart::{chart_data, ChartData, ChartDataset, ChartType, DatasetValues, ScatterPoint};

pub use config::{FetchConfig, ENV_CATALOG, WDS_VECTORS_ENDPOINT};

pub use data_source::{
    coerce_observation_count, FetchRequest, SourceError, SourceErrorKind, VectorSource,
    DEFAULT_OBSERVATION_COUNT,
};

pub use domain::{
    Catalog, NormalizedSeries, Product, RawObservation, RawResult, RawValue, ResultStatus,
    SeriesFailure, SeriesIdentifier, SeriesPoint, VectorEntry, VectorId, DEFAULT_CATALOG_PATH,
    VECTOR_MARKER,
};

pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

pub use error::{CoreError, ValidationError};

pub use export::{to_csv, write_csv, DEFAULT_CSV_FILE_NAME};

pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use normalize::{fetch_normalized, normalize, normalize_with_report, NormalizeReport};

pub use pivot::{pivot, PivotRow, PivotTable, REF_PER_HEADER};

pub use state::{reduce, Action, SessionState};
