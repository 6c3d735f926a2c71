//! Customer dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use hoodies_core::Price;

use crate::backend::CustomerOrder;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::Nav;
use crate::state::AppState;

/// Order display data for the dashboard.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: i64,
    pub product_name: String,
    /// `None` when the product row no longer exists.
    pub price: Option<String>,
    pub size: String,
    pub quantity: i32,
    pub placed_on: String,
    pub address_line: String,
}

impl From<&CustomerOrder> for OrderView {
    fn from(row: &CustomerOrder) -> Self {
        let shipping = &row.order.shipping;
        Self {
            id: row.order.id.as_i64(),
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
            placed_on: row.order.created_at.format("%b %e, %Y").to_string(),
            address_line: format!(
                "{}, {}, {} {}, {}",
                shipping.address,
                shipping.city,
                shipping.state,
                shipping.postal_code,
                shipping.country
            ),
        }
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub nav: Nav,
    pub orders: Vec<OrderView>,
}

/// Display the signed-in user's order history.
pub async fn index(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<DashboardTemplate> {
    let orders = state.store().orders_for_user(user.id).await?;

    Ok(DashboardTemplate {
        nav: Nav::for_user(Some(&user)),
        orders: orders.iter().map(OrderView::from).collect(),
    })
}
