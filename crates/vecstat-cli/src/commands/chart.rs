use serde::Serialize;
use vecstat_core::{chart_data, ChartData, ChartType, VectorSource};

use crate::cli::ChartArgs;
use crate::error::CliError;

use super::{fetch_series, CommandResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartResponseData {
    chart_type: ChartType,
    chart: ChartData,
}

pub async fn run(args: &ChartArgs, source: &dyn VectorSource) -> Result<CommandResult, CliError> {
    let chart_type = ChartType::from(args.chart_type);
    let outcome = fetch_series(&args.series, source).await?;
    let data = serde_json::to_value(ChartResponseData {
        chart_type,
        chart: chart_data(&outcome.report.series, chart_type),
    })?;

    Ok(CommandResult::ok(data, source.name())
        .with_errors(outcome.errors)
        .with_warnings(outcome.warnings)
        .with_latency(outcome.latency_ms))
}
