use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::vector_id::VECTOR_MARKER;
use crate::{SeriesIdentifier, VectorId};

/// Per-vector status reported by WDS inside a batch response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultStatus {
    Success,
    Other(String),
}

impl ResultStatus {
    pub const SUCCESS: &'static str = "SUCCESS";

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => Self::SUCCESS,
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for ResultStatus {
    fn from(value: &str) -> Self {
        if value == Self::SUCCESS {
            Self::Success
        } else {
            Self::Other(value.to_owned())
        }
    }
}

impl Display for ResultStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observation value exactly as the provider sent it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Missing,
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawValue {
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Missing,
            serde_json::Value::Number(number) => {
                Self::Number(number.as_f64().unwrap_or(f64::NAN))
            }
            serde_json::Value::String(text) => Self::Text(text),
            other => Self::Other(other),
        }
    }

    /// Null, absent and `""` are measured-but-missing. Everything else is
    /// coerced to a number; unparseable input becomes NaN.
    pub fn coerce(&self) -> Option<f64> {
        match self {
            Self::Missing => None,
            Self::Number(value) => Some(*value),
            Self::Text(text) if text.is_empty() => None,
            Self::Text(text) => Some(coerce_text(text)),
            Self::Other(serde_json::Value::Bool(flag)) => Some(if *flag { 1.0 } else { 0.0 }),
            Self::Other(_) => Some(f64::NAN),
        }
    }
}

/// Opaque provider ids arrive as JSON strings or numbers; both are kept as text.
pub(crate) fn opaque_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

pub(crate) fn deserialize_opaque_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    opaque_string(&value)
        .ok_or_else(|| serde::de::Error::custom("expected a string or number identifier"))
}

fn coerce_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// One provider data point, newest first in provider order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub period: String,
    pub value: RawValue,
}

impl RawObservation {
    pub fn new(period: impl Into<String>, value: RawValue) -> Self {
        Self {
            period: period.into(),
            value,
        }
    }
}

/// One entry of a WDS batch response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResult {
    pub status: ResultStatus,
    /// The id echoed by the provider, kept as sent; it may be missing on failures.
    pub identifier: Option<SeriesIdentifier>,
    pub product_id: Option<String>,
    pub observations: Vec<RawObservation>,
}

impl RawResult {
    pub fn success(identifier: VectorId, observations: Vec<RawObservation>) -> Self {
        Self {
            status: ResultStatus::Success,
            identifier: Some(identifier.into()),
            product_id: None,
            observations,
        }
    }

    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// `v` + echoed identifier text; a missing identifier yields the bare marker.
    pub fn label(&self) -> String {
        match &self.identifier {
            Some(id) => format!("{VECTOR_MARKER}{id}"),
            None => VECTOR_MARKER.to_string(),
        }
    }

    /// The echoed identifier resolved to a vector number, if it is one.
    pub fn vector_id(&self) -> Option<VectorId> {
        self.identifier.as_ref().and_then(SeriesIdentifier::normalize)
    }
}

/// One chronologically ordered point of a normalized series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub ref_per: String,
    pub value: Option<f64>,
}

impl SeriesPoint {
    pub fn new(ref_per: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            ref_per: ref_per.into(),
            value,
        }
    }
}

/// Chart/table friendly series, oldest observation first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSeries {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub table: Vec<SeriesPoint>,
}

impl NormalizedSeries {
    pub fn new(label: impl Into<String>, table: Vec<SeriesPoint>) -> Self {
        Self {
            label: label.into(),
            product_id: None,
            table,
        }
    }

    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// A batch entry the normalizer dropped because its status was not `SUCCESS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesFailure {
    pub identifier: Option<VectorId>,
    pub status: String,
}

impl Display for SeriesFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.identifier {
            Some(id) => write!(f, "vector {} returned status '{}'", id.label(), self.status),
            None => write!(f, "unidentified vector returned status '{}'", self.status),
        }
    }
}
