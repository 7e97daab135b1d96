//! CSV export of a [`PivotTable`].
//!
//! The header line is the plain comma-joined header list. Every data cell is
//! JSON-encoded, so text is double-quoted with backslash escapes, numbers are
//! bare, and absent or null cells become `""`. Lines are joined with `\n`
//! and there is no trailing newline.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::pivot::{PivotRow, PivotTable, REF_PER_HEADER};
use crate::CoreError;

/// File name used when the caller does not choose one.
pub const DEFAULT_CSV_FILE_NAME: &str = "statcan_data.csv";

pub fn to_csv(table: &PivotTable) -> String {
    if table.is_empty() {
        return String::new();
    }

    let headers = table.headers();
    let mut lines = Vec::with_capacity(table.rows().len() + 1);
    lines.push(headers.join(","));
    for row in table.rows() {
        let fields: Vec<String> = headers.iter().map(|header| encode_field(row, header)).collect();
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

/// Writes [`to_csv`] output to `path` and returns the number of data rows.
pub fn write_csv(table: &PivotTable, path: impl AsRef<Path>) -> Result<usize, CoreError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    writer.write_all(to_csv(table).as_bytes())?;
    writer.flush()?;
    Ok(table.rows().len())
}

fn encode_field(row: &PivotRow, header: &str) -> String {
    if header == REF_PER_HEADER {
        return encode_text(row.ref_per());
    }

    match row.cell(header) {
        Some(Some(value)) => encode_number(value),
        Some(None) | None => encode_text(""),
    }
}

fn encode_text(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

/// JavaScript-style number text: integral values have no fraction,
/// magnitudes outside `[1e-6, 1e21)` use exponent form (`1e+21`, `1e-7`), and
/// non-finite values encode as `null`.
fn encode_number(value: f64) -> String {
    if !value.is_finite() {
        return String::from("null");
    }
    if value == 0.0 {
        return String::from("0");
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }

    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_follow_json_text() {
        assert_eq!(encode_number(5.0), "5");
        assert_eq!(encode_number(-0.0), "0");
        assert_eq!(encode_number(158.3), "158.3");
        assert_eq!(encode_number(f64::NAN), "null");
    }

    #[test]
    fn extreme_magnitudes_use_exponent_form() {
        assert_eq!(encode_number(1e21), "1e+21");
        assert_eq!(encode_number(-2.5e22), "-2.5e+22");
        assert_eq!(encode_number(1e-7), "1e-7");
        assert_eq!(encode_number(1.5e-7), "1.5e-7");
        assert_eq!(encode_number(1e20), "100000000000000000000");
        assert_eq!(encode_number(0.000001), "0.000001");
    }

    #[test]
    fn text_is_json_quoted() {
        assert_eq!(encode_text("2020"), "\"2020\"");
        assert_eq!(encode_text("a,\"b\""), r#""a,\"b\"""#);
        assert_eq!(encode_text(""), "\"\"");
    }

    #[test]
    fn empty_table_exports_nothing() {
        assert_eq!(to_csv(&PivotTable::default()), "");
    }
}
