//! In-memory stand-in for the hosted backend.
//!
//! Backs the test suites: same observable behavior as the real backend,
//! including profile rows created at sign-up, no cascade from product
//! deletes to orders, and newest-first ordering. Failure injection flags
//! and operation counters let tests assert on what was (not) called.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use hoodies_core::{OrderId, ProductId, Role, UserId};

use super::types::{
    AdminOrder, AuthSession, CustomerOrder, Order, OrderCustomer, OrderInput, OrderProduct,
    Product, ProductInput, Profile, ShippingAddress, SignUpOutcome,
};
use super::{BackendError, StoreBackend};

/// In-memory fake of the hosted backend.
#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<State>,
    /// Calls to `insert_order`, including rejected ones.
    pub order_inserts: AtomicU64,
    /// Calls to `insert_product`, including rejected ones.
    pub product_inserts: AtomicU64,
    /// Calls to `all_orders`.
    pub all_order_reads: AtomicU64,
    /// When set, `insert_order` rejects with a backend-style message.
    pub fail_order_inserts: AtomicBool,
    /// When set, `profile` reads fail, exercising fail-closed role checks.
    pub fail_profile_reads: AtomicBool,
}

#[derive(Default)]
struct State {
    accounts: Vec<Account>,
    profiles: HashMap<UserId, Profile>,
    products: Vec<Product>,
    orders: Vec<Order>,
    tokens: HashMap<String, UserId>,
    next_product_id: i64,
    next_order_id: i64,
    uploads: Vec<StoredObject>,
}

struct Account {
    id: UserId,
    email: String,
    password: String,
}

/// An object "stored" by [`MemoryBackend::upload_product_image`].
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account together with its profile row, the way the real
    /// backend's trigger does at account creation.
    pub fn add_account(&self, email: &str, password: &str, full_name: &str, role: Role) -> UserId {
        let id = UserId::new(Uuid::new_v4());
        let mut state = self.state.lock().expect("state lock");
        state.accounts.push(Account {
            id,
            email: email.to_owned(),
            password: password.to_owned(),
        });
        state.profiles.insert(
            id,
            Profile {
                id,
                email: Some(email.to_owned()),
                full_name: Some(full_name.to_owned()),
                role: Some(role.as_str().to_owned()),
                address: None,
                city: None,
                state: None,
                postal_code: None,
                country: None,
            },
        );
        id
    }

    /// Seed a product row directly, bypassing the admin surface.
    pub fn add_product(&self, name: &str, price: Decimal, sizes: &[&str]) -> ProductId {
        let mut state = self.state.lock().expect("state lock");
        state.next_product_id += 1;
        let id = ProductId::new(state.next_product_id);
        state.products.push(Product {
            id,
            name: name.to_owned(),
            description: Some(format!("{name} description")),
            price,
            sizes: sizes.iter().map(|s| (*s).to_owned()).collect(),
            image_url: None,
            in_stock: true,
            created_at: Utc::now(),
        });
        id
    }

    /// Snapshot of all stored orders.
    pub fn stored_orders(&self) -> Vec<Order> {
        let state = self.state.lock().expect("state lock");
        state.orders.clone()
    }

    /// Snapshot of all stored products.
    pub fn stored_products(&self) -> Vec<Product> {
        let state = self.state.lock().expect("state lock");
        state.products.clone()
    }

    /// Snapshot of a stored profile row.
    pub fn stored_profile(&self, user: UserId) -> Option<Profile> {
        let state = self.state.lock().expect("state lock");
        state.profiles.get(&user).cloned()
    }

    /// Snapshot of the objects uploaded to storage.
    pub fn stored_uploads(&self) -> Vec<StoredObject> {
        let state = self.state.lock().expect("state lock");
        state.uploads.clone()
    }

    fn mint_token(state: &mut State, user: UserId) -> String {
        let token = Uuid::new_v4().to_string();
        state.tokens.insert(token.clone(), user);
        token
    }
}

#[async_trait]
impl StoreBackend for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let mut state = self.state.lock().expect("state lock");
        let account = state
            .accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .map(|a| (a.id, a.email.clone()));
        let Some((user_id, email)) = account else {
            return Err(BackendError::Auth("Invalid login credentials".to_owned()));
        };
        let access_token = Self::mint_token(&mut state, user_id);
        Ok(AuthSession {
            user_id,
            email,
            access_token,
        })
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<SignUpOutcome, BackendError> {
        {
            let state = self.state.lock().expect("state lock");
            if state.accounts.iter().any(|a| a.email == email) {
                return Err(BackendError::Auth("User already registered".to_owned()));
            }
        }
        let user_id = self.add_account(email, password, full_name, Role::Customer);
        let mut state = self.state.lock().expect("state lock");
        let access_token = Self::mint_token(&mut state, user_id);
        Ok(SignUpOutcome::SignedIn(AuthSession {
            user_id,
            email: email.to_owned(),
            access_token,
        }))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let mut state = self.state.lock().expect("state lock");
        state.tokens.remove(access_token);
        Ok(())
    }

    async fn profile(&self, user: UserId) -> Result<Option<Profile>, BackendError> {
        if self.fail_profile_reads.load(Ordering::Relaxed) {
            return Err(BackendError::Api {
                status: 500,
                message: "profile lookup failed".to_owned(),
            });
        }
        let state = self.state.lock().expect("state lock");
        Ok(state.profiles.get(&user).cloned())
    }

    async fn update_profile_address(
        &self,
        user: UserId,
        shipping: &ShippingAddress,
    ) -> Result<(), BackendError> {
        let mut state = self.state.lock().expect("state lock");
        // PATCH with no matching row is a no-op, same as the real table API
        if let Some(profile) = state.profiles.get_mut(&user) {
            profile.address = Some(shipping.address.clone());
            profile.city = Some(shipping.city.clone());
            profile.state = Some(shipping.state.clone());
            profile.postal_code = Some(shipping.postal_code.clone());
            profile.country = Some(shipping.country.clone());
        }
        Ok(())
    }

    async fn set_role_by_email(&self, email: &str, role: Role) -> Result<u64, BackendError> {
        let mut state = self.state.lock().expect("state lock");
        let mut updated = 0;
        for profile in state.profiles.values_mut() {
            if profile.email.as_deref() == Some(email) {
                profile.role = Some(role.as_str().to_owned());
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn products(&self) -> Result<Vec<Product>, BackendError> {
        let state = self.state.lock().expect("state lock");
        let mut products = state.products.clone();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(products)
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>, BackendError> {
        let state = self.state.lock().expect("state lock");
        Ok(state.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, input: &ProductInput) -> Result<(), BackendError> {
        self.product_inserts.fetch_add(1, Ordering::Relaxed);
        let mut state = self.state.lock().expect("state lock");
        state.next_product_id += 1;
        let id = ProductId::new(state.next_product_id);
        state.products.push(Product {
            id,
            name: input.name.clone(),
            description: Some(input.description.clone()),
            price: input.price,
            sizes: input.sizes.clone(),
            image_url: input.image_url.clone(),
            in_stock: true,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<(), BackendError> {
        let mut state = self.state.lock().expect("state lock");
        if let Some(product) = state.products.iter_mut().find(|p| p.id == id) {
            product.name = input.name.clone();
            product.description = Some(input.description.clone());
            product.price = input.price;
            product.sizes = input.sizes.clone();
            product.image_url = input.image_url.clone();
        }
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), BackendError> {
        let mut state = self.state.lock().expect("state lock");
        // Orders referencing the product are deliberately left in place
        state.products.retain(|p| p.id != id);
        Ok(())
    }

    async fn insert_order(&self, input: &OrderInput) -> Result<(), BackendError> {
        self.order_inserts.fetch_add(1, Ordering::Relaxed);
        if self.fail_order_inserts.load(Ordering::Relaxed) {
            return Err(BackendError::Api {
                status: 400,
                message: "order insert rejected".to_owned(),
            });
        }
        let mut state = self.state.lock().expect("state lock");
        state.next_order_id += 1;
        let id = OrderId::new(state.next_order_id);
        state.orders.push(Order {
            id,
            user_id: input.user_id,
            product_id: input.product_id,
            quantity: input.quantity,
            size: input.size.clone(),
            shipping: input.shipping.clone(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn orders_for_user(&self, user: UserId) -> Result<Vec<CustomerOrder>, BackendError> {
        let state = self.state.lock().expect("state lock");
        let mut orders: Vec<CustomerOrder> = state
            .orders
            .iter()
            .filter(|o| o.user_id == user)
            .map(|o| CustomerOrder {
                order: o.clone(),
                products: join_product(&state, o),
            })
            .collect();
        orders.sort_by(|a, b| {
            b.order
                .created_at
                .cmp(&a.order.created_at)
                .then(b.order.id.cmp(&a.order.id))
        });
        Ok(orders)
    }

    async fn all_orders(&self) -> Result<Vec<AdminOrder>, BackendError> {
        self.all_order_reads.fetch_add(1, Ordering::Relaxed);
        let state = self.state.lock().expect("state lock");
        let mut orders: Vec<AdminOrder> = state
            .orders
            .iter()
            .map(|o| AdminOrder {
                order: o.clone(),
                products: join_product(&state, o),
                profiles: state.profiles.get(&o.user_id).map(|p| OrderCustomer {
                    email: p.email.clone(),
                    full_name: p.full_name.clone(),
                }),
            })
            .collect();
        orders.sort_by(|a, b| {
            b.order
                .created_at
                .cmp(&a.order.created_at)
                .then(b.order.id.cmp(&a.order.id))
        });
        Ok(orders)
    }

    async fn upload_product_image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BackendError> {
        let mut state = self.state.lock().expect("state lock");
        state.uploads.push(StoredObject {
            file_name: file_name.to_owned(),
            content_type: content_type.to_owned(),
            size: bytes.len(),
        });
        Ok(format!(
            "https://backend.test/storage/v1/object/public/product-images/{file_name}"
        ))
    }
}

fn join_product(state: &State, order: &Order) -> Option<OrderProduct> {
    state
        .products
        .iter()
        .find(|p| p.id == order.product_id)
        .map(|p| OrderProduct {
            name: p.name.clone(),
            price: p.price,
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn shipping() -> ShippingAddress {
        ShippingAddress {
            address: "1 Main St".to_owned(),
            city: "Portland".to_owned(),
            state: "OR".to_owned(),
            postal_code: "97201".to_owned(),
            country: "USA".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_rejects_bad_password() {
        let backend = MemoryBackend::new();
        backend.add_account("a@example.com", "hunter2", "A", Role::Customer);

        assert!(backend.sign_in("a@example.com", "wrong").await.is_err());
        assert!(backend.sign_in("a@example.com", "hunter2").await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_up_creates_profile_row() {
        let backend = MemoryBackend::new();
        let outcome = backend
            .sign_up("new@example.com", "hunter2", "New User")
            .await
            .unwrap();
        let SignUpOutcome::SignedIn(session) = outcome else {
            panic!("expected immediate session");
        };
        let profile = backend.stored_profile(session.user_id).unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("New User"));
        assert_eq!(profile.role(), Role::Customer);
    }

    #[tokio::test]
    async fn test_delete_product_keeps_orders() {
        let backend = MemoryBackend::new();
        let user = backend.add_account("a@example.com", "pw", "A", Role::Customer);
        let product = backend.add_product("Hoodie", dec("40"), &["S", "M"]);
        backend
            .insert_order(&OrderInput {
                user_id: user,
                product_id: product,
                quantity: 1,
                size: "M".to_owned(),
                shipping: shipping(),
            })
            .await
            .unwrap();

        backend.delete_product(product).await.unwrap();

        assert!(backend.stored_products().is_empty());
        let orders = backend.orders_for_user(user).await.unwrap();
        assert_eq!(orders.len(), 1);
        // The join comes back empty, not the order itself
        assert!(orders[0].products.is_none());
    }

    #[tokio::test]
    async fn test_products_newest_first() {
        let backend = MemoryBackend::new();
        backend.add_product("First", dec("10"), &[]);
        backend.add_product("Second", dec("20"), &[]);

        let products = backend.products().await.unwrap();
        assert_eq!(products[0].name, "Second");
        assert_eq!(products[1].name, "First");
    }

    #[tokio::test]
    async fn test_failed_order_insert_counts_the_attempt() {
        let backend = MemoryBackend::new();
        let user = backend.add_account("a@example.com", "pw", "A", Role::Customer);
        backend.fail_order_inserts.store(true, Ordering::Relaxed);

        let result = backend
            .insert_order(&OrderInput {
                user_id: user,
                product_id: ProductId::new(1),
                quantity: 1,
                size: "M".to_owned(),
                shipping: shipping(),
            })
            .await;

        assert!(result.is_err());
        assert_eq!(backend.order_inserts.load(Ordering::Relaxed), 1);
        assert!(backend.stored_orders().is_empty());
    }

    #[tokio::test]
    async fn test_upload_records_the_object() {
        let backend = MemoryBackend::new();
        let url = backend
            .upload_product_image("abc.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap();

        assert!(url.ends_with("/product-images/abc.png"));
        let uploads = backend.stored_uploads();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].file_name, "abc.png");
        assert_eq!(uploads[0].content_type, "image/png");
        assert_eq!(uploads[0].size, 3);
    }

    #[tokio::test]
    async fn test_set_role_by_email() {
        let backend = MemoryBackend::new();
        let user = backend.add_account("a@example.com", "pw", "A", Role::Customer);

        let updated = backend
            .set_role_by_email("a@example.com", Role::Admin)
            .await
            .unwrap();
        assert_eq!(updated, 1);
        assert!(backend.stored_profile(user).unwrap().role().is_admin());

        let updated = backend
            .set_role_by_email("missing@example.com", Role::Admin)
            .await
            .unwrap();
        assert_eq!(updated, 0);
    }
}
