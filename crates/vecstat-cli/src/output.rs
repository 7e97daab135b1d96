use std::io::{self, Write};

use vecstat_core::{to_csv, PivotTable};

use crate::cli::OutputFormat;
use crate::commands::CommandOutput;
use crate::error::CliError;

pub fn render(output: &CommandOutput, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    render_to(&mut writer, output, format, pretty)?;
    writer.flush()?;
    Ok(())
}

pub fn render_to<W: Write>(
    writer: &mut W,
    output: &CommandOutput,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(&output.envelope)?
            } else {
                serde_json::to_string(&output.envelope)?
            };
            writeln!(writer, "{payload}")?;
        }
        OutputFormat::Table => render_table(writer, output)?,
        OutputFormat::Csv => {
            let Some(table) = &output.pivot else {
                return Err(CliError::Command(String::from(
                    "--format csv applies to the 'fetch' and 'export' commands",
                )));
            };
            let csv = to_csv(table);
            if !csv.is_empty() {
                writeln!(writer, "{csv}")?;
            }
        }
    }

    Ok(())
}

fn render_table<W: Write>(writer: &mut W, output: &CommandOutput) -> Result<(), CliError> {
    let envelope = &output.envelope;
    writeln!(writer, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(writer, "schema      : {}", envelope.meta.schema_version)?;
    writeln!(writer, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(writer, "source      : {}", envelope.meta.source)?;
    writeln!(writer, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(writer, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(writer, "  - {warning}")?;
        }
    }

    match &output.pivot {
        Some(table) => {
            writeln!(writer, "data:")?;
            for line in format_pivot(table) {
                writeln!(writer, "  {line}")?;
            }
        }
        None => {
            writeln!(writer, "data:")?;
            let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
            for line in pretty_data.lines() {
                writeln!(writer, "  {line}")?;
            }
        }
    }

    if !envelope.errors.is_empty() {
        writeln!(writer, "errors:")?;
        for error in &envelope.errors {
            writeln!(writer, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

/// Space-aligned rows of the pivot; blank cells for missing or null values.
fn format_pivot(table: &PivotTable) -> Vec<String> {
    if table.is_empty() {
        return vec![String::from("(no observations)")];
    }

    let headers = table.headers();
    let body: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(index, header)| match index {
                    0 => row.ref_per().to_owned(),
                    _ => row
                        .cell(header)
                        .flatten()
                        .map(|value| value.to_string())
                        .unwrap_or_default(),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            body.iter()
                .map(|cells| cells[index].len())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let format_line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    std::iter::once(format_line(headers))
        .chain(body.iter().map(|cells| format_line(cells.as_slice())))
        .collect()
}
