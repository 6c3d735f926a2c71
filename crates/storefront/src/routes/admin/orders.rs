//! Admin order overview route handler.
//!
//! Read-only: every order joined with product and customer profile data,
//! newest first. No mutation operations exist on orders.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use hoodies_core::Price;

use crate::backend::AdminOrder;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::Nav;
use crate::state::AppState;

/// Order display data for the admin overview.
#[derive(Debug, Clone)]
pub struct AdminOrderView {
    pub id: i64,
    pub placed_on: String,
    pub customer_name: String,
    pub customer_email: String,
    pub product_name: String,
    pub price: Option<String>,
    pub size: String,
    pub quantity: i32,
    pub address: String,
    pub city_line: String,
    pub country: String,
}

impl From<&AdminOrder> for AdminOrderView {
    fn from(row: &AdminOrder) -> Self {
        let shipping = &row.order.shipping;
        let customer = row.profiles.as_ref();
        Self {
            id: row.order.id.as_i64(),
            placed_on: row.order.created_at.format("%b %e, %Y").to_string(),
            customer_name: customer
                .and_then(|c| c.full_name.clone())
                .unwrap_or_else(|| "N/A".to_owned()),
            customer_email: customer
                .and_then(|c| c.email.clone())
                .unwrap_or_default(),
            product_name: row
                .products
                .as_ref()
                .map_or_else(|| "No longer available".to_owned(), |p| p.name.clone()),
            price: row
                .products
                .as_ref()
                .map(|p| Price::new(p.price).display()),
            size: row.order.size.clone(),
            quantity: row.order.quantity,
            address: shipping.address.clone(),
            city_line: format!(
                "{}, {} {}",
                shipping.city, shipping.state, shipping.postal_code
            ),
            country: shipping.country.clone(),
        }
    }
}

/// Admin orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct AdminOrdersTemplate {
    pub nav: Nav,
    pub orders: Vec<AdminOrderView>,
}

/// Display every order with product and customer details.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<AdminOrdersTemplate> {
    let orders = state.store().all_orders().await?;

    Ok(AdminOrdersTemplate {
        nav: Nav::for_user(Some(&admin)),
        orders: orders.iter().map(AdminOrderView::from).collect(),
    })
}
