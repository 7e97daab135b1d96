use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data_source::SourceError;
use crate::domain::models::deserialize_opaque_string;
use crate::SeriesIdentifier;

/// Default catalog asset name, resolved relative to the working directory.
pub const DEFAULT_CATALOG_PATH: &str = "data.json";

/// Selectable vector inside a catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorEntry {
    pub vector_id: SeriesIdentifier,
    #[serde(default)]
    pub text: String,
}

impl VectorEntry {
    pub fn new(vector_id: impl Into<SeriesIdentifier>, text: impl Into<String>) -> Self {
        Self {
            vector_id: vector_id.into(),
            text: text.into(),
        }
    }
}

/// One WDS product (cube) and its browsable vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(deserialize_with = "deserialize_opaque_string")]
    pub product_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vectors: Vec<VectorEntry>,
}

/// Ordered product catalog loaded from the static asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Reads and parses a catalog asset.
    ///
    /// # Errors
    ///
    /// Returns a `catalog_load_failure` [`SourceError`] when the file is
    /// missing, unreadable, or not a JSON product list.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|error| {
            SourceError::catalog_load_failure(format!(
                "failed to load {}: {error}",
                path.display()
            ))
        })?;
        Self::from_json(&raw).map_err(|error| {
            SourceError::catalog_load_failure(format!(
                "failed to load {}: {}",
                path.display(),
                error.message()
            ))
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, SourceError> {
        serde_json::from_str(raw).map_err(|error| {
            SourceError::catalog_load_failure(format!("catalog is not a product list: {error}"))
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Products whose id contains `query`, or whose description contains it
    /// case-insensitively. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        if query.is_empty() {
            return self.products.iter().collect();
        }

        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|product| {
                product.product_id.contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|product| product.product_id == product_id)
    }

    /// The browser's current product: the requested one among `products`,
    /// otherwise the first.
    pub fn current<'a>(products: &[&'a Product], product_id: Option<&str>) -> Option<&'a Product> {
        product_id
            .and_then(|id| products.iter().find(|product| product.product_id == id))
            .or_else(|| products.first())
            .copied()
    }
}
