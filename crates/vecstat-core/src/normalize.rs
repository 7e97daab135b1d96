//! Series normalization: raw provider batches to chronological series.

use crate::data_source::{FetchRequest, SourceError, VectorSource};
use crate::{NormalizedSeries, RawResult, SeriesFailure, SeriesPoint};

/// Normalized series plus the batch entries that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeReport {
    pub series: Vec<NormalizedSeries>,
    pub failures: Vec<SeriesFailure>,
}

impl NormalizeReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Human-readable warning per dropped entry.
    pub fn warnings(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }
}

/// Keeps `SUCCESS` results in input order, each reversed to oldest-first.
pub fn normalize(results: &[RawResult]) -> Vec<NormalizedSeries> {
    results
        .iter()
        .filter(|result| result.status.is_success())
        .map(normalize_one)
        .collect()
}

/// Like [`normalize`], but also reports which identifiers were dropped.
pub fn normalize_with_report(results: &[RawResult]) -> NormalizeReport {
    let mut report = NormalizeReport::default();
    for result in results {
        if result.status.is_success() {
            report.series.push(normalize_one(result));
        } else {
            report.failures.push(SeriesFailure {
                identifier: result.vector_id(),
                status: result.status.as_str().to_owned(),
            });
        }
    }
    report
}

/// One fetch followed by normalization. Dropped entries are logged at `warn`.
pub async fn fetch_normalized(
    source: &dyn VectorSource,
    req: FetchRequest,
) -> Result<NormalizeReport, SourceError> {
    let results = source.fetch(req).await?;
    let report = normalize_with_report(&results);
    for failure in &report.failures {
        tracing::warn!(source = source.name(), "{failure}");
    }
    Ok(report)
}

fn normalize_one(result: &RawResult) -> NormalizedSeries {
    let table = result
        .observations
        .iter()
        .rev()
        .map(|observation| {
            SeriesPoint::new(observation.period.clone(), observation.value.coerce())
        })
        .collect();

    NormalizedSeries {
        label: result.label(),
        product_id: result.product_id.clone(),
        table,
    }
}
