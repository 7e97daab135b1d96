//! Fetch vectors and write their pivot to a CSV file.

use serde_json::json;
use vecstat_core::{pivot, write_csv, VectorSource};

use crate::cli::ExportArgs;
use crate::error::CliError;

use super::{fetch_series, CommandResult};

pub async fn run(args: &ExportArgs, source: &dyn VectorSource) -> Result<CommandResult, CliError> {
    let outcome = fetch_series(&args.series, source).await?;
    let table = pivot(&outcome.report.series);
    let output = args.output.display().to_string();

    let result = CommandResult::ok(json!({}), source.name())
        .with_errors(outcome.errors)
        .with_warnings(outcome.warnings)
        .with_latency(outcome.latency_ms);

    if !result.errors.is_empty() {
        return Ok(CommandResult {
            data: json!({ "output": output, "exported": false }),
            ..result
        });
    }

    if table.is_empty() {
        return Ok(CommandResult {
            data: json!({ "output": output, "rows": 0, "exported": false }),
            ..result
        }
        .with_warning("no observations to export"));
    }

    let rows = write_csv(&table, &args.output)?;
    tracing::info!(rows, output = %output, "csv exported");

    Ok(CommandResult {
        data: json!({
            "output": output,
            "columns": table.headers(),
            "rows": rows,
            "exported": true,
        }),
        ..result
    }
    .with_pivot(table))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use vecstat_core::SourceError;

    use crate::cli::Cli;
    use crate::commands::execute;
    use crate::commands::test_support::{FixedSource, TWO_SERIES};

    fn cli_for(output: &std::path::Path) -> Cli {
        Cli::try_parse_from([
            "vecstat",
            "export",
            "v1",
            "v2",
            "--output",
            output.to_str().expect("utf-8 path"),
        ])
        .expect("parses")
    }

    #[tokio::test]
    async fn export_writes_aligned_csv_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("statcan_data.csv");
        let source = FixedSource::from_body(TWO_SERIES);

        let output = execute(&cli_for(&path), &source, PathBuf::from("unused.json"))
            .await
            .expect("command succeeds");

        assert_eq!(output.envelope.data["exported"], true);
        assert_eq!(output.envelope.data["rows"], 2);
        let written = std::fs::read_to_string(&path).expect("file written");
        assert_eq!(
            written,
            "refPer,v1,v2\n\"2020-01-01\",1,\"\"\n\"2021-01-01\",2,4.5"
        );
    }

    #[tokio::test]
    async fn export_skips_file_when_upstream_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("statcan_data.csv");
        let source = FixedSource(Err(SourceError::upstream_unavailable("offline")));

        let output = execute(&cli_for(&path), &source, PathBuf::from("unused.json"))
            .await
            .expect("envelope still produced");

        assert_eq!(output.envelope.data["exported"], false);
        assert_eq!(output.envelope.errors.len(), 1);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn export_without_observations_warns() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("statcan_data.csv");
        let source = FixedSource(Ok(Vec::new()));

        let output = execute(&cli_for(&path), &source, PathBuf::from("unused.json"))
            .await
            .expect("command succeeds");

        assert_eq!(output.envelope.meta.warnings, ["no observations to export"]);
        assert!(!path.exists());
    }
}
