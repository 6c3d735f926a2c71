//! Seed the catalog with demo products.

use rust_decimal::Decimal;

use hoodies_storefront::backend::{ProductInput, StoreBackend};

/// The demo catalog: name, description, price, sizes.
const DEMO_PRODUCTS: &[(&str, &str, &str, &str)] = &[
    (
        "Midnight Hoodie",
        "Heavyweight fleece in washed black. Brushed interior, double-lined hood.",
        "59.95",
        "S,M,L,XL",
    ),
    (
        "Ember Zip-Up",
        "Full-zip hoodie in burnt orange with ribbed cuffs and hem.",
        "64.00",
        "S,M,L",
    ),
    (
        "Cloud Crewneck Hoodie",
        "Lightweight french terry for warmer days. Relaxed fit.",
        "49.50",
        "XS,S,M,L,XL",
    ),
    (
        "Field Pullover",
        "Water-resistant shell over fleece lining. Kangaroo pocket.",
        "74.00",
        "M,L,XL",
    ),
];

/// Insert the demo products through the backend client.
///
/// # Errors
///
/// Returns an error if configuration loading or any insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let backend = super::backend_from_env()?;

    for (name, description, price, sizes) in DEMO_PRODUCTS {
        let input = ProductInput {
            name: (*name).to_owned(),
            description: (*description).to_owned(),
            price: price.parse::<Decimal>()?,
            sizes: sizes.split(',').map(str::to_owned).collect(),
            image_url: None,
        };
        backend.insert_product(&input).await?;
        tracing::info!(product = name, "Seeded product");
    }

    tracing::info!(count = DEMO_PRODUCTS.len(), "Catalog seeded");
    Ok(())
}
