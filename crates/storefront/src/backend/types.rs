//! Row and input types for the hosted backend's table API.
//!
//! These mirror the `profiles`, `products`, and `orders` tables owned by the
//! hosted backend. This application reads and writes through them but does
//! not own their schema.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hoodies_core::{OrderId, Price, ProductId, Role, UserId};

/// Shipping address fields.
///
/// Shared by the checkout form, the profile row it is persisted onto, and
/// the snapshot copied into each order row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// A row in the `profiles` table.
///
/// Created by the backend when an account is created; this application only
/// updates the address fields (checkout) and reads the role (admin guard).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    /// Raw role column; use [`Profile::role`] for the fail-closed view.
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl Profile {
    /// The profile's role, failing closed to [`Role::Customer`].
    #[must_use]
    pub fn role(&self) -> Role {
        Role::from_db(self.role.as_deref())
    }
}

/// A row in the `products` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
}

const fn default_in_stock() -> bool {
    true
}

impl Product {
    /// The price formatted for display.
    #[must_use]
    pub fn display_price(&self) -> String {
        Price::new(self.price).display()
    }
}

/// Fields written when creating or updating a product.
///
/// `id`, `in_stock`, and `created_at` stay under the backend's control:
/// inserts get defaults, updates leave them untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub sizes: Vec<String>,
    pub image_url: Option<String>,
}

/// Fields written when placing an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderInput {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub size: String,
    #[serde(flatten)]
    pub shipping: ShippingAddress,
}

/// A row in the `orders` table.
///
/// Append-only from this application's perspective: created once at
/// checkout, never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub size: String,
    #[serde(flatten)]
    pub shipping: ShippingAddress,
    pub created_at: DateTime<Utc>,
}

/// Product columns embedded into order reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderProduct {
    pub name: String,
    pub price: Decimal,
}

/// Profile columns embedded into admin order reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCustomer {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// An order joined with its product, as read for the customer dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerOrder {
    #[serde(flatten)]
    pub order: Order,
    /// `None` when the product row has since been deleted (no cascade).
    #[serde(default)]
    pub products: Option<OrderProduct>,
}

/// An order joined with product and customer profile, for the admin panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOrder {
    #[serde(flatten)]
    pub order: Order,
    #[serde(default)]
    pub products: Option<OrderProduct>,
    #[serde(default)]
    pub profiles: Option<OrderCustomer>,
}

/// An authenticated backend session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: UserId,
    pub email: String,
    pub access_token: String,
}

/// Result of a sign-up attempt.
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// The backend issued a session immediately.
    SignedIn(AuthSession),
    /// The backend wants the email address confirmed first.
    ConfirmationRequired,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_row_deserializes() {
        let json = r#"{
            "id": 3,
            "name": "Midnight Hoodie",
            "description": "Heavyweight fleece.",
            "price": 59.95,
            "sizes": ["S", "M", "L"],
            "image_url": null,
            "in_stock": true,
            "created_at": "2026-08-01T10:15:00+00:00"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.sizes, vec!["S", "M", "L"]);
        assert_eq!(product.display_price(), "$59.95");
    }

    #[test]
    fn test_product_row_defaults() {
        // Minimal row: description/sizes/image_url/in_stock absent
        let json = r#"{
            "id": 1,
            "name": "Plain Hoodie",
            "price": 40,
            "created_at": "2026-08-01T10:15:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.in_stock);
        assert!(product.sizes.is_empty());
        assert_eq!(product.description, None);
    }

    #[test]
    fn test_customer_order_with_deleted_product() {
        let json = r#"{
            "id": 12,
            "user_id": "4f0cd3a2-1c57-44b2-9b5d-9f3f9a2b6c1e",
            "product_id": 3,
            "quantity": 1,
            "size": "L",
            "address": "1 Main St",
            "city": "Portland",
            "state": "OR",
            "postal_code": "97201",
            "country": "USA",
            "created_at": "2026-08-02T09:00:00+00:00",
            "products": null
        }"#;
        let order: CustomerOrder = serde_json::from_str(json).unwrap();
        assert!(order.products.is_none());
        assert_eq!(order.order.size, "L");
        assert_eq!(order.order.shipping.city, "Portland");
    }

    #[test]
    fn test_admin_order_with_joins() {
        let json = r#"{
            "id": 12,
            "user_id": "4f0cd3a2-1c57-44b2-9b5d-9f3f9a2b6c1e",
            "product_id": 3,
            "quantity": 1,
            "size": "M",
            "address": "1 Main St",
            "city": "Portland",
            "state": "OR",
            "postal_code": "97201",
            "country": "USA",
            "created_at": "2026-08-02T09:00:00+00:00",
            "products": {"name": "Midnight Hoodie", "price": 59.95},
            "profiles": {"email": "shopper@example.com", "full_name": "Sam Shopper"}
        }"#;
        let order: AdminOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.products.unwrap().name, "Midnight Hoodie");
        assert_eq!(
            order.profiles.unwrap().email.as_deref(),
            Some("shopper@example.com")
        );
    }

    #[test]
    fn test_profile_role_fails_closed() {
        let json = r#"{"id": "4f0cd3a2-1c57-44b2-9b5d-9f3f9a2b6c1e", "role": "moderator"}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.role(), Role::Customer);

        let json = r#"{"id": "4f0cd3a2-1c57-44b2-9b5d-9f3f9a2b6c1e", "role": "admin"}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert!(profile.role().is_admin());
    }

    #[test]
    fn test_order_input_flattens_shipping() {
        let input = OrderInput {
            user_id: UserId::parse("4f0cd3a2-1c57-44b2-9b5d-9f3f9a2b6c1e").unwrap(),
            product_id: ProductId::new(3),
            quantity: 1,
            size: "L".to_owned(),
            shipping: ShippingAddress {
                address: "1 Main St".to_owned(),
                city: "Portland".to_owned(),
                state: "OR".to_owned(),
                postal_code: "97201".to_owned(),
                country: "USA".to_owned(),
            },
        };
        let value = serde_json::to_value(&input).unwrap();
        // Address fields sit at the top level of the row, not nested
        assert_eq!(value["city"], "Portland");
        assert_eq!(value["quantity"], 1);
        assert!(value.get("shipping").is_none());
    }
}
