use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Marker prefixed to vector numbers in labels and catalog entries (`v41690973`).
pub const VECTOR_MARKER: char = 'v';

/// Normalized WDS vector number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorId(u64);

impl VectorId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Strip one leading case-insensitive `v` and parse the remainder as an integer.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyVectorId);
        }

        let digits = strip_marker(trimmed).trim();
        if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(ValidationError::InvalidVectorId {
                value: input.to_owned(),
            });
        }

        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidVectorId {
                value: input.to_owned(),
            })
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub fn label(self) -> String {
        format!("{VECTOR_MARKER}{}", self.0)
    }
}

impl Display for VectorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for VectorId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl TryFrom<&str> for VectorId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

fn strip_marker(input: &str) -> &str {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) if first.eq_ignore_ascii_case(&VECTOR_MARKER) => chars.as_str(),
        _ => input,
    }
}

/// Series identifier as supplied by a caller: catalog entries and request
/// bodies carry either `"v123"` strings or bare numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesIdentifier {
    Number(serde_json::Number),
    Text(String),
}

impl SeriesIdentifier {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Resolve to a vector number. Anything that is not a non-negative
    /// integer after marker stripping resolves to `None` and travels to the
    /// upstream as `null`.
    pub fn normalize(&self) -> Option<VectorId> {
        match self {
            Self::Number(number) => number.as_u64().map(VectorId),
            Self::Text(text) => VectorId::parse(text).ok(),
        }
    }

    /// Builds an identifier from an arbitrary JSON value, accepting only
    /// strings and numbers.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(number) => Some(Self::Number(number.clone())),
            serde_json::Value::String(text) => Some(Self::Text(text.clone())),
            _ => None,
        }
    }
}

impl Display for SeriesIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<VectorId> for SeriesIdentifier {
    fn from(value: VectorId) -> Self {
        Self::Number(serde_json::Number::from(value.get()))
    }
}

impl From<&str> for SeriesIdentifier {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}
