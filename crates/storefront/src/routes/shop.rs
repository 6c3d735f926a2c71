//! Catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use hoodies_core::ProductId;

use crate::backend::Product;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::Nav;
use crate::state::AppState;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub sizes: Vec<String>,
    pub image_url: Option<String>,
    pub in_stock: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.display_price(),
            sizes: product.sizes.clone(),
            image_url: product.image_url.clone(),
            in_stock: product.in_stock,
        }
    }
}

/// "Order Now" form data.
#[derive(Debug, Deserialize)]
pub struct OrderNowForm {
    pub size: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopIndexTemplate {
    pub nav: Nav,
    pub products: Vec<ProductView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/show.html")]
pub struct ShopShowTemplate {
    pub nav: Nav,
    pub product: ProductView,
    /// Set after an "Order Now" submit without a size selection.
    pub size_warning: bool,
}

/// Not-found state for an unknown product id.
#[derive(Template, WebTemplate)]
#[template(path = "shop/not_found.html")]
pub struct ProductNotFoundTemplate {
    pub nav: Nav,
}

/// Display the product listing page.
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<ShopIndexTemplate> {
    let products = state.store().products().await?;

    Ok(ShopIndexTemplate {
        nav: Nav::for_user(user.as_ref()),
        products: products.iter().map(ProductView::from).collect(),
    })
}

/// Display the product detail page.
///
/// An id that resolves to no row (or does not parse as one) renders the
/// not-found state rather than an error.
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let nav = Nav::for_user(user.as_ref());

    let Ok(id) = id.parse::<i64>() else {
        return Ok(ProductNotFoundTemplate { nav }.into_response());
    };

    match state.store().product(ProductId::new(id)).await? {
        Some(product) => Ok(ShopShowTemplate {
            nav,
            product: ProductView::from(&product),
            size_warning: false,
        }
        .into_response()),
        None => Ok(ProductNotFoundTemplate { nav }.into_response()),
    }
}

/// Handle the "Order Now" submit on the product detail page.
///
/// Requires a signed-in user (else redirects to sign-in with a notice) and
/// a selected size (else re-renders the detail page with a warning). On
/// success, carries the order intent to checkout as query parameters.
pub async fn order(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<String>,
    Form(form): Form<OrderNowForm>,
) -> Result<Response> {
    let Ok(id) = id.parse::<i64>() else {
        return Ok(Redirect::to("/shop").into_response());
    };

    if user.is_none() {
        return Ok(Redirect::to("/auth?notice=signin_required").into_response());
    }

    let size = form.size.as_deref().map(str::trim).unwrap_or_default();
    if size.is_empty() {
        let nav = Nav::for_user(user.as_ref());
        return match state.store().product(ProductId::new(id)).await? {
            Some(product) => Ok(ShopShowTemplate {
                nav,
                product: ProductView::from(&product),
                size_warning: true,
            }
            .into_response()),
            None => Ok(ProductNotFoundTemplate { nav }.into_response()),
        };
    }

    let location = format!("/checkout?product={id}&size={}", urlencoding::encode(size));
    Ok(Redirect::to(&location).into_response())
}
