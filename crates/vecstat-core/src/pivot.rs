//! Wide table keyed by reference period, one column per series label.

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::NormalizedSeries;

/// Name of the key column in headers and CSV exports.
pub const REF_PER_HEADER: &str = "refPer";

/// One period of the pivot.
///
/// A label missing from `cells` means the series has no observation for
/// this period; `Some(None)` from [`cell`](PivotRow::cell) is an observation
/// the provider reported as null.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    ref_per: String,
    /// Insertion ordered, so serialized keys follow first sighting.
    cells: Vec<(String, Option<f64>)>,
}

impl PivotRow {
    fn new(ref_per: String) -> Self {
        Self {
            ref_per,
            cells: Vec::new(),
        }
    }

    /// Overwrites an existing label in place.
    fn set(&mut self, label: &str, value: Option<f64>) {
        match self.cells.iter_mut().find(|(existing, _)| existing == label) {
            Some((_, cell)) => *cell = value,
            None => self.cells.push((label.to_owned(), value)),
        }
    }

    pub fn ref_per(&self) -> &str {
        &self.ref_per
    }

    pub fn cell(&self, label: &str) -> Option<Option<f64>> {
        self.cells
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| *value)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.cell(label).is_some()
    }
}

impl Serialize for PivotRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.cells.len() + 1))?;
        map.serialize_entry(REF_PER_HEADER, &self.ref_per)?;
        for (label, value) in &self.cells {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PivotTable {
    headers: Vec<String>,
    rows: Vec<PivotRow>,
}

impl PivotTable {
    /// `refPer` first, then labels in first-seen order. Empty when there are
    /// no rows.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[PivotRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, ref_per: &str) -> Option<&PivotRow> {
        self.rows.iter().find(|row| row.ref_per == ref_per)
    }
}

/// Aligns series by exact `refPer` match in a single pass over series, then
/// observations. Rows and label headers keep first-encounter order.
pub fn pivot(series: &[NormalizedSeries]) -> PivotTable {
    let mut rows: Vec<PivotRow> = Vec::new();
    let mut row_index: HashMap<String, usize> = HashMap::new();
    let mut labels: Vec<String> = Vec::new();

    for item in series {
        for point in &item.table {
            let index = *row_index.entry(point.ref_per.clone()).or_insert_with(|| {
                rows.push(PivotRow::new(point.ref_per.clone()));
                rows.len() - 1
            });
            rows[index].set(&item.label, point.value);

            if !labels.contains(&item.label) {
                labels.push(item.label.clone());
            }
        }
    }

    if rows.is_empty() {
        return PivotTable::default();
    }

    let mut headers = Vec::with_capacity(labels.len() + 1);
    headers.push(String::from(REF_PER_HEADER));
    headers.extend(labels.into_iter().filter(|label| label != REF_PER_HEADER));

    PivotTable { headers, rows }
}
