use serde::Serialize;
use vecstat_core::{pivot, NormalizedSeries, VectorSource};

use crate::cli::FetchArgs;
use crate::error::CliError;

use super::{fetch_series, CommandResult};

#[derive(Debug, Serialize)]
struct FetchResponseData {
    series: Vec<NormalizedSeries>,
}

pub async fn run(args: &FetchArgs, source: &dyn VectorSource) -> Result<CommandResult, CliError> {
    let outcome = fetch_series(&args.series, source).await?;
    let table = pivot(&outcome.report.series);
    let data = serde_json::to_value(FetchResponseData {
        series: outcome.report.series,
    })?;

    Ok(CommandResult::ok(data, source.name())
        .with_errors(outcome.errors)
        .with_warnings(outcome.warnings)
        .with_latency(outcome.latency_ms)
        .with_pivot(table))
}
