// src/handlers/products.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{AppError, AppJson, AppPath},
    config::AppState,
    models::{
        product::{NewProduct, Product, ProductChanges},
        response::ActionResponse,
    },
};

// ---
// Payload: CreateProduct
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    #[schema(example = "Iced Latte")]
    pub name: String,

    #[schema(example = 65.0)]
    pub price: Decimal,

    #[serde(default)]
    #[schema(example = 28.5)]
    pub cost: Decimal,

    #[serde(default)]
    #[schema(example = 40)]
    pub stock: i32,

    #[validate(length(min = 1, message = "Category is required."))]
    #[schema(example = "Beverages")]
    pub category: String,

    pub barcode: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl From<CreateProductPayload> for NewProduct {
    fn from(p: CreateProductPayload) -> Self {
        NewProduct {
            name: p.name,
            price: p.price,
            cost: p.cost,
            stock: p.stock,
            category: p.category,
            barcode: p.barcode,
            description: p.description,
            image: p.image,
        }
    }
}

// ---
// Payload: UpdateProduct (every field optional)
// ---
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "Name cannot be empty."))]
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub stock: Option<i32>,
    #[validate(length(min = 1, message = "Category cannot be empty."))]
    pub category: Option<String>,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl From<UpdateProductPayload> for ProductChanges {
    fn from(p: UpdateProductPayload) -> Self {
        ProductChanges {
            name: p.name,
            price: p.price,
            cost: p.cost,
            stock: p.stock,
            category: p.category,
            barcode: p.barcode,
            description: p.description,
            image: p.image,
        }
    }
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses(
        (status = 200, description = "All products", body = Vec<Product>)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.catalog_service.list_products().await?;
    Ok((StatusCode::OK, Json(products)))
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid data")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .catalog_service
        .create_product(payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 404, description = "Product not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Product id")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state
        .catalog_service
        .update_product(id, payload.into())
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    responses(
        (status = 200, description = "Product deleted", body = ActionResponse),
        (status = 404, description = "Product not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Product id")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_product(id).await?;
    Ok((StatusCode::OK, Json(ActionResponse::ok("Product deleted"))))
}
