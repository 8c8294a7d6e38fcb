// src/handlers/customers.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{AppError, AppJson, AppPath},
    config::AppState,
    models::{
        customer::{Customer, CustomerChanges, NewCustomer},
        response::ActionResponse,
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    #[schema(example = "Somchai Jaidee")]
    pub name: String,
    #[schema(example = "somchai@example.com")]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerPayload {
    #[validate(length(min = 1, message = "Name cannot be empty."))]
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    responses(
        (status = 200, description = "All customers", body = Vec<Customer>)
    )
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state.catalog_service.list_customers().await?;
    Ok((StatusCode::OK, Json(customers)))
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Invalid data")
    )
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state
        .catalog_service
        .create_customer(NewCustomer {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(customer)))
}

// PUT /api/customers/{id}
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "Customers",
    request_body = UpdateCustomerPayload,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 404, description = "Customer not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Customer id")
    )
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = app_state
        .catalog_service
        .update_customer(id, CustomerChanges {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
        })
        .await?;

    Ok((StatusCode::OK, Json(customer)))
}

// DELETE /api/customers/{id}
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Customers",
    responses(
        (status = 200, description = "Customer deleted", body = ActionResponse),
        (status = 404, description = "Customer not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Customer id")
    )
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_customer(id).await?;
    Ok((StatusCode::OK, Json(ActionResponse::ok("Customer deleted"))))
}
