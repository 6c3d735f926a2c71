//! Checkout route handlers.
//!
//! Checkout persists the shipping address onto the user's profile and then
//! inserts the order row. The two writes are sequential, independent
//! network calls - there is no transaction. A profile update that lands
//! before a failed order insert stays put.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use hoodies_core::ProductId;

use crate::backend::{OrderInput, Product};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::{Nav, ShippingForm};
use crate::state::AppState;

/// Order intent carried from the product detail page.
#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    pub product: Option<String>,
    pub size: Option<String>,
}

/// Checkout form data: the intent as hidden fields plus the address.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub product: i64,
    pub size: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl CheckoutForm {
    fn shipping_form(&self) -> ShippingForm {
        ShippingForm {
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
        }
    }
}

/// Order summary display data.
#[derive(Debug, Clone)]
pub struct OrderSummaryView {
    pub id: i64,
    pub name: String,
    pub price: String,
}

impl From<&Product> for OrderSummaryView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            price: product.display_price(),
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub nav: Nav,
    pub product: OrderSummaryView,
    pub size: String,
    pub form: ShippingForm,
    pub error: Option<String>,
}

/// Resolve the order intent from the query string.
fn resolve_intent(query: &CheckoutQuery) -> Option<(ProductId, String)> {
    let product = query.product.as_deref()?.parse::<i64>().ok()?;
    let size = query.size.as_deref()?.trim().to_owned();
    if size.is_empty() {
        return None;
    }
    Some((ProductId::new(product), size))
}

/// Display the checkout page.
///
/// Requires a signed-in user and a resolved product+size intent; anything
/// less redirects back to the catalog.
pub async fn page(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(query): Query<CheckoutQuery>,
) -> Result<Response> {
    let Some((product_id, size)) = resolve_intent(&query) else {
        return Ok(Redirect::to("/shop").into_response());
    };

    let Some(product) = state.store().product(product_id).await? else {
        return Ok(Redirect::to("/shop").into_response());
    };

    Ok(CheckoutTemplate {
        nav: Nav::for_user(Some(&user)),
        product: OrderSummaryView::from(&product),
        size,
        form: ShippingForm::default(),
        error: None,
    }
    .into_response())
}

/// Handle the checkout submit.
pub async fn submit(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let product_id = ProductId::new(form.product);
    let size = form.size.trim().to_owned();
    if size.is_empty() {
        return Ok(Redirect::to("/shop").into_response());
    }

    let Some(product) = state.store().product(product_id).await? else {
        return Ok(Redirect::to("/shop").into_response());
    };

    let nav = Nav::for_user(Some(&user));
    let shipping_form = form.shipping_form();

    let shipping = match shipping_form.validate() {
        Ok(shipping) => shipping,
        Err(e) => {
            return Ok(CheckoutTemplate {
                nav,
                product: OrderSummaryView::from(&product),
                size,
                form: shipping_form,
                error: Some(e.to_string()),
            }
            .into_response());
        }
    };

    // Step 1: persist the address onto the profile. This outlives the
    // order; a failure here is logged but does not stop the order insert,
    // and a later insert failure does not roll it back.
    if let Err(e) = state
        .store()
        .update_profile_address(user.id, &shipping)
        .await
    {
        tracing::warn!(user = %user.id, error = %e, "Profile address update failed");
    }

    // Step 2: insert the order. Quantity is fixed at 1; the size is
    // recorded as submitted - the catalog's size list is a UI constraint
    // only.
    let input = OrderInput {
        user_id: user.id,
        product_id,
        quantity: 1,
        size: size.clone(),
        shipping,
    };

    match state.store().insert_order(&input).await {
        Ok(()) => Ok(Redirect::to("/dashboard").into_response()),
        Err(e) => Ok(CheckoutTemplate {
            nav,
            product: OrderSummaryView::from(&product),
            size,
            form: shipping_form,
            error: Some(e.to_string()),
        }
        .into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_intent_complete() {
        let query = CheckoutQuery {
            product: Some("3".to_owned()),
            size: Some("L".to_owned()),
        };
        assert_eq!(
            resolve_intent(&query),
            Some((ProductId::new(3), "L".to_owned()))
        );
    }

    #[test]
    fn test_resolve_intent_missing_pieces() {
        let query = CheckoutQuery {
            product: None,
            size: Some("L".to_owned()),
        };
        assert!(resolve_intent(&query).is_none());

        let query = CheckoutQuery {
            product: Some("3".to_owned()),
            size: None,
        };
        assert!(resolve_intent(&query).is_none());

        let query = CheckoutQuery {
            product: Some("three".to_owned()),
            size: Some("L".to_owned()),
        };
        assert!(resolve_intent(&query).is_none());

        let query = CheckoutQuery {
            product: Some("3".to_owned()),
            size: Some("  ".to_owned()),
        };
        assert!(resolve_intent(&query).is_none());
    }
}
