//! Embedded product catalog shipped with the binary.

use crate::models::Product;
use anyhow::Context;

const SEED_PRODUCTS_JSON: &str = include_str!("../data/seed_products.json");

/// Parses and validates the embedded catalog.
///
/// Fails if any record breaks the product invariants, naming the offending id
/// and fields. Called once at startup.
pub fn load_seed_products() -> anyhow::Result<Vec<Product>> {
    let products: Vec<Product> =
        serde_json::from_str(SEED_PRODUCTS_JSON).context("Failed to parse embedded catalog")?;

    for product in &products {
        if let Err(errors) = product.validate() {
            let details = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            anyhow::bail!("Invalid embedded product {}: {}", product.id, details);
        }
    }

    Ok(products)
}
