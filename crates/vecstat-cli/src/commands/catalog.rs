use std::path::Path;

use serde::Serialize;
use vecstat_core::{Catalog, EnvelopeError, Product, VectorEntry};

use crate::cli::CatalogArgs;
use crate::error::CliError;

use super::CommandResult;

const SOURCE: &str = "catalog";

#[derive(Debug, Serialize)]
struct SearchResponseData<'a> {
    query: &'a str,
    products: Vec<&'a Product>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductResponseData<'a> {
    product_id: &'a str,
    description: &'a str,
    vectors: &'a [VectorEntry],
}

pub fn run(args: &CatalogArgs, path: &Path) -> Result<CommandResult, CliError> {
    let catalog = match Catalog::load(path) {
        Ok(catalog) => catalog,
        Err(error) => {
            return Ok(CommandResult::ok(serde_json::json!({ "products": [] }), SOURCE)
                .with_errors(vec![EnvelopeError::from(&error)]));
        }
    };

    let query = args.query.as_deref().map(str::trim).unwrap_or_default();

    if let Some(product_id) = args.product.as_deref() {
        let products = catalog.search(query);
        let Some(product) = products
            .iter()
            .copied()
            .find(|product| product.product_id == product_id)
        else {
            let error = EnvelopeError::new(
                "catalog.unknown_product",
                format!("product '{product_id}' is not in the catalog"),
            )?;
            return Ok(
                CommandResult::ok(serde_json::json!({ "vectors": [] }), SOURCE)
                    .with_errors(vec![error]),
            );
        };

        let data = serde_json::to_value(ProductResponseData {
            product_id: &product.product_id,
            description: &product.description,
            vectors: &product.vectors,
        })?;
        return Ok(CommandResult::ok(data, SOURCE));
    }

    let data = serde_json::to_value(SearchResponseData {
        query,
        products: catalog.search(query),
    })?;
    Ok(CommandResult::ok(data, SOURCE))
}
