//! Typed form objects.
//!
//! Each form is a typed struct validated before any backend call is made,
//! rather than relying on native form constraints alone. Validation
//! failures render as inline warnings; nothing is submitted.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use hoodies_core::ProductId;

use crate::backend::{Product, ProductInput, ShippingAddress};

/// Validation failure for a submitted form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// A required field was empty.
    #[error("{0} is required")]
    Missing(&'static str),
    /// The price field did not parse as a decimal number.
    #[error("Price must be a number")]
    InvalidPrice,
}

/// Shipping address form on the checkout page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShippingForm {
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingForm {
    /// Validate the form into an address ready to persist.
    ///
    /// All five fields are required free text; values are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Missing`] naming the first empty field.
    pub fn validate(&self) -> Result<ShippingAddress, FormError> {
        let field = |value: &str, name: &'static str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(FormError::Missing(name))
            } else {
                Ok(trimmed.to_owned())
            }
        };

        Ok(ShippingAddress {
            address: field(&self.address, "Street address")?,
            city: field(&self.city, "City")?,
            state: field(&self.state, "State")?,
            postal_code: field(&self.postal_code, "Postal code")?,
            country: field(&self.country, "Country")?,
        })
    }
}

/// Product create/edit form on the admin panel.
///
/// All fields arrive as text (the form posts as multipart alongside the
/// image file); `validate` produces the typed row input.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    /// Set when editing an existing product.
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: String,
    pub sizes: String,
    pub image_url: String,
}

impl ProductForm {
    /// Prefill the form from an existing product row.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: Some(product.id),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.price.to_string(),
            sizes: product.sizes.join(","),
            image_url: product.image_url.clone().unwrap_or_default(),
        }
    }

    /// Whether the form is in editing mode.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.id.is_some()
    }

    /// Validate the form into a product row input.
    ///
    /// Name, price, and sizes are required; the price must parse as a
    /// decimal number.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] describing the first failed field.
    pub fn validate(&self) -> Result<ProductInput, FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::Missing("Product name"));
        }
        if self.price.trim().is_empty() {
            return Err(FormError::Missing("Price"));
        }
        let price: Decimal = self
            .price
            .trim()
            .parse()
            .map_err(|_| FormError::InvalidPrice)?;

        let sizes = parse_sizes(&self.sizes);
        if sizes.is_empty() {
            return Err(FormError::Missing("Sizes"));
        }

        let image_url = self.image_url.trim();
        Ok(ProductInput {
            name: self.name.trim().to_owned(),
            description: self.description.trim().to_owned(),
            price,
            sizes,
            image_url: if image_url.is_empty() {
                None
            } else {
                Some(image_url.to_owned())
            },
        })
    }
}

/// Split a comma-separated size list into trimmed labels, order preserved.
fn parse_sizes(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled_shipping() -> ShippingForm {
        ShippingForm {
            address: "1 Main St".to_owned(),
            city: "Portland".to_owned(),
            state: "OR".to_owned(),
            postal_code: "97201".to_owned(),
            country: "USA".to_owned(),
        }
    }

    #[test]
    fn test_shipping_validate_trims() {
        let form = ShippingForm {
            city: "  Portland  ".to_owned(),
            ..filled_shipping()
        };
        let address = form.validate().unwrap();
        assert_eq!(address.city, "Portland");
    }

    #[test]
    fn test_shipping_validate_rejects_empty_field() {
        let form = ShippingForm {
            postal_code: "   ".to_owned(),
            ..filled_shipping()
        };
        assert_eq!(form.validate(), Err(FormError::Missing("Postal code")));
    }

    #[test]
    fn test_parse_sizes_trims_and_preserves_order() {
        assert_eq!(parse_sizes("S, M ,L"), vec!["S", "M", "L"]);
    }

    #[test]
    fn test_parse_sizes_drops_empty_entries() {
        assert_eq!(parse_sizes("S,,L,"), vec!["S", "L"]);
        assert!(parse_sizes("").is_empty());
    }

    #[test]
    fn test_product_form_requires_name() {
        let form = ProductForm {
            name: " ".to_owned(),
            price: "49.99".to_owned(),
            sizes: "S,M".to_owned(),
            ..ProductForm::default()
        };
        assert_eq!(form.validate(), Err(FormError::Missing("Product name")));
    }

    #[test]
    fn test_product_form_rejects_unparseable_price() {
        let form = ProductForm {
            name: "Hoodie".to_owned(),
            price: "forty".to_owned(),
            sizes: "S,M".to_owned(),
            ..ProductForm::default()
        };
        assert_eq!(form.validate(), Err(FormError::InvalidPrice));
    }

    #[test]
    fn test_product_form_validates() {
        let form = ProductForm {
            name: " Hoodie ".to_owned(),
            description: "Warm.".to_owned(),
            price: "49.99".to_owned(),
            sizes: "S, M ,L".to_owned(),
            image_url: String::new(),
            id: None,
        };
        let input = form.validate().unwrap();
        assert_eq!(input.name, "Hoodie");
        assert_eq!(input.sizes, vec!["S", "M", "L"]);
        assert_eq!(input.price.to_string(), "49.99");
        assert_eq!(input.image_url, None);
    }
}
