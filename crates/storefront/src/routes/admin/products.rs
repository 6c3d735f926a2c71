//! Admin product management route handlers.
//!
//! One page carries both the create/edit form and the full product list.
//! The form posts as multipart so an image file can ride along; a provided
//! file is uploaded to object storage under a randomized name and its
//! public URL replaces the image reference before the row is written.
//! Every mutation redirects back to the list, which refetches in full.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use hoodies_core::ProductId;

use crate::backend::Product;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{CurrentUser, Nav, ProductForm};
use crate::state::AppState;

/// Product display data for the admin list.
#[derive(Debug, Clone)]
pub struct AdminProductView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub sizes: String,
    pub image_url: Option<String>,
    pub in_stock: bool,
}

impl From<&Product> for AdminProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            price: product.display_price(),
            sizes: product.sizes.join(", "),
            image_url: product.image_url.clone(),
            in_stock: product.in_stock,
        }
    }
}

/// Query parameters for the list page.
#[derive(Debug, Deserialize)]
pub struct EditQuery {
    /// Product id to load into the form for editing.
    pub edit: Option<i64>,
}

/// Admin products page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct AdminProductsTemplate {
    pub nav: Nav,
    pub form: ProductForm,
    pub products: Vec<AdminProductView>,
    pub error: Option<String>,
}

/// An image file extracted from the multipart form.
struct ImageUpload {
    original_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Display the product management page.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<EditQuery>,
) -> Result<AdminProductsTemplate> {
    let products = state.store().products().await?;

    let form = query
        .edit
        .map(ProductId::new)
        .and_then(|id| products.iter().find(|p| p.id == id))
        .map(ProductForm::from_product)
        .unwrap_or_default();

    Ok(page(&admin, form, &products, None))
}

/// Handle the product form submission (create or update).
pub async fn save(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    multipart: Multipart,
) -> Result<Response> {
    let (mut form, upload) = read_product_form(multipart).await?;

    // Validate before touching the backend; a rejected form makes no
    // storage or table calls.
    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => {
            let products = state.store().products().await?;
            return Ok(page(&admin, form, &products, Some(e.to_string())).into_response());
        }
    };

    // A new file replaces the image reference before the row is written.
    let input = match upload {
        Some(upload) => {
            let file_name = randomized_file_name(&upload.original_name);
            match state
                .store()
                .upload_product_image(&file_name, &upload.content_type, upload.bytes)
                .await
            {
                Ok(url) => {
                    form.image_url.clone_from(&url);
                    crate::backend::ProductInput {
                        image_url: Some(url),
                        ..input
                    }
                }
                Err(e) => {
                    let products = state.store().products().await?;
                    return Ok(page(&admin, form, &products, Some(e.to_string())).into_response());
                }
            }
        }
        None => input,
    };

    let result = match form.id {
        Some(id) => state.store().update_product(id, &input).await,
        None => state.store().insert_product(&input).await,
    };

    match result {
        Ok(()) => Ok(Redirect::to("/admin/products").into_response()),
        Err(e) => {
            let products = state.store().products().await?;
            Ok(page(&admin, form, &products, Some(e.to_string())).into_response())
        }
    }
}

/// Handle a product delete.
///
/// Existing orders referencing the product keep their rows; only the
/// product disappears from the catalog.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response> {
    match state.store().delete_product(ProductId::new(id)).await {
        Ok(()) => Ok(Redirect::to("/admin/products").into_response()),
        Err(e) => {
            let products = state.store().products().await?;
            Ok(page(&admin, ProductForm::default(), &products, Some(e.to_string())).into_response())
        }
    }
}

fn page(
    admin: &CurrentUser,
    form: ProductForm,
    products: &[Product],
    error: Option<String>,
) -> AdminProductsTemplate {
    AdminProductsTemplate {
        nav: Nav::for_user(Some(admin)),
        form,
        products: products.iter().map(AdminProductView::from).collect(),
        error,
    }
}

/// Parse the multipart form into the typed form plus an optional image.
async fn read_product_form(
    mut multipart: Multipart,
) -> Result<(ProductForm, Option<ImageUpload>)> {
    let mut form = ProductForm::default();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "id" => {
                let text = text_field(field).await?;
                form.id = text.trim().parse::<i64>().ok().map(ProductId::new);
            }
            "name" => form.name = text_field(field).await?,
            "description" => form.description = text_field(field).await?,
            "price" => form.price = text_field(field).await?,
            "sizes" => form.sizes = text_field(field).await?,
            "image_url" => form.image_url = text_field(field).await?,
            "image" => {
                let original_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // An empty file input still posts a part; skip it
                if !original_name.is_empty() && !bytes.is_empty() {
                    upload = Some(ImageUpload {
                        original_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok((form, upload))
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Randomized storage name keeping the original extension.
fn randomized_file_name(original: &str) -> String {
    let ext = original.rsplit('.').next().unwrap_or("bin");
    format!("{}.{ext}", Uuid::new_v4())
}
