//! Chart-ready datasets derived from normalized series.
//!
//! Rendering is left to the front end; this module only shapes data the way
//! a Chart.js style consumer expects it.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{NormalizedSeries, ValidationError};

/// Series colors, assigned by dataset index and cycled.
pub const PALETTE: [&str; 8] = [
    "#2563eb", "#16a34a", "#dc2626", "#7c3aed", "#f59e0b", "#0ea5e9", "#d946ef", "#059669",
];

/// Alpha suffix applied to fill colors of line and bar datasets.
const FILL_ALPHA: &str = "88";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    #[default]
    Line,
    Bar,
    Scatter,
}

impl ChartType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Scatter => "scatter",
        }
    }
}

impl Display for ChartType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "bar" => Ok(Self::Bar),
            "scatter" => Ok(Self::Scatter),
            _ => Err(ValidationError::InvalidChartType {
                value: value.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: usize,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DatasetValues {
    Values(Vec<Option<f64>>),
    Points(Vec<ScatterPoint>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: DatasetValues,
    pub background_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    pub point_radius: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// Category charts share the first series' periods as x labels; scatter
/// charts plot each series against its observation index.
pub fn chart_data(series: &[NormalizedSeries], chart_type: ChartType) -> ChartData {
    match chart_type {
        ChartType::Line | ChartType::Bar => ChartData {
            labels: series
                .first()
                .map(|first| first.table.iter().map(|point| point.ref_per.clone()).collect())
                .unwrap_or_default(),
            datasets: series
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let color = palette_color(index);
                    ChartDataset {
                        label: item.label.clone(),
                        data: DatasetValues::Values(
                            item.table.iter().map(|point| point.value).collect(),
                        ),
                        background_color: format!("{color}{FILL_ALPHA}"),
                        border_color: Some(color.to_owned()),
                        point_radius: 2,
                        fill: Some(false),
                    }
                })
                .collect(),
        },
        ChartType::Scatter => ChartData {
            labels: Vec::new(),
            datasets: series
                .iter()
                .enumerate()
                .map(|(index, item)| ChartDataset {
                    label: item.label.clone(),
                    data: DatasetValues::Points(
                        item.table
                            .iter()
                            .enumerate()
                            .map(|(x, point)| ScatterPoint { x, y: point.value })
                            .collect(),
                    ),
                    background_color: palette_color(index).to_owned(),
                    border_color: None,
                    point_radius: 3,
                    fill: None,
                })
                .collect(),
        },
    }
}

fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}
