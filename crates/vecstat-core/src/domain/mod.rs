//! # Domain Models
//!
//! Canonical domain types for WDS vector data.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`VectorId`] | Normalized vector number |
//! | [`SeriesIdentifier`] | Caller-supplied identifier (`"v123"` or `123`) |
//! | [`RawResult`] | One entry of a provider batch response, newest first |
//! | [`NormalizedSeries`] | Labelled series, oldest first |
//! | [`Catalog`] | Static product/vector catalog |

mod catalog;
pub(crate) mod models;
pub(crate) mod vector_id;

pub use catalog::{Catalog, Product, VectorEntry, DEFAULT_CATALOG_PATH};
pub use models::{
    NormalizedSeries, RawObservation, RawResult, RawValue, ResultStatus, SeriesFailure,
    SeriesPoint,
};
pub use vector_id::{SeriesIdentifier, VectorId, VECTOR_MARKER};
