mod catalog;
mod chart;
mod export;
mod fetch;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use uuid::Uuid;
use vecstat_core::{
    fetch_normalized, Envelope, EnvelopeError, EnvelopeMeta, FetchConfig, FetchRequest,
    NormalizeReport, PivotTable, ReqwestHttpClient, SeriesIdentifier, StatCanAdapter,
    VectorSource, DEFAULT_CATALOG_PATH, ENV_CATALOG,
};

use crate::cli::{Cli, Command, SeriesArgs};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub source: &'static str,
    /// Aligned table behind `data`, for the table and csv renderers.
    pub pivot: Option<PivotTable>,
}

impl CommandResult {
    pub fn ok(data: Value, source: &'static str) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            source,
            pivot: None,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_pivot(mut self, pivot: PivotTable) -> Self {
        self.pivot = Some(pivot);
        self
    }
}

/// A rendered-ready envelope plus the pivot it was derived from.
pub struct CommandOutput {
    pub envelope: Envelope<Value>,
    pub pivot: Option<PivotTable>,
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let lookup = |key: &str| std::env::var(key).ok();
    let adapter = StatCanAdapter::new(
        Arc::new(ReqwestHttpClient::new()),
        fetch_config(cli, lookup),
    );
    execute(cli, &adapter, catalog_path(cli, lookup)).await
}

/// Runs the selected command against `source` and wraps it in an envelope.
pub async fn execute(
    cli: &Cli,
    source: &dyn VectorSource,
    catalog_path: PathBuf,
) -> Result<CommandOutput, CliError> {
    let command_result = match &cli.command {
        Command::Fetch(args) => fetch::run(args, source).await?,
        Command::Export(args) => export::run(args, source).await?,
        Command::Chart(args) => chart::run(args, source).await?,
        Command::Catalog(args) => catalog::run(args, &catalog_path)?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        latency_ms,
        source,
        pivot,
    } = command_result;

    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), source, latency_ms)?;
    for warning in warnings {
        meta.push_warning(warning);
    }

    let envelope = Envelope::with_errors(meta, data, errors)?;
    Ok(CommandOutput { envelope, pivot })
}

/// Environment settings with command-line overrides applied.
pub fn fetch_config<F>(cli: &Cli, lookup: F) -> FetchConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = FetchConfig::from_lookup(lookup);
    if let Some(url) = &cli.upstream_url {
        config = config.with_endpoint(url.clone());
    }
    if let Some(timeout_ms) = cli.timeout_ms.filter(|value| *value > 0) {
        config = config.with_timeout_ms(timeout_ms);
    }
    config
}

pub fn catalog_path<F>(cli: &Cli, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    cli.catalog
        .clone()
        .or_else(|| {
            lookup(ENV_CATALOG)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH))
}

/// Outcome of one batch fetch. Upstream failures land in `errors` so the
/// envelope is still printed.
pub(crate) struct SeriesOutcome {
    pub report: NormalizeReport,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
}

pub(crate) async fn fetch_series(
    args: &SeriesArgs,
    source: &dyn VectorSource,
) -> Result<SeriesOutcome, CliError> {
    let mut warnings = Vec::new();
    let identifiers = args
        .ids
        .iter()
        .map(|raw| {
            let identifier = SeriesIdentifier::text(raw.trim());
            if identifier.normalize().is_none() {
                warnings.push(format!("'{raw}' is not a vector id and will not resolve"));
            }
            identifier
        })
        .collect::<Vec<_>>();
    let request = FetchRequest::new(identifiers, args.latest_n)?;

    let started = Instant::now();
    let outcome = fetch_normalized(source, request).await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    Ok(match outcome {
        Ok(report) => {
            warnings.extend(report.warnings());
            SeriesOutcome {
                report,
                warnings,
                errors: Vec::new(),
                latency_ms,
            }
        }
        Err(error) => SeriesOutcome {
            report: NormalizeReport::default(),
            warnings,
            errors: vec![EnvelopeError::from(&error)],
            latency_ms,
        },
    })
}
