// src/handlers/sales.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{AppError, AppJson, AppPath},
    config::AppState,
    handlers::validation::validate_not_negative,
    models::{
        analytics::SalesAnalytics,
        response::ActionResponse,
        sale::{NewSale, NewSaleItem, PaymentMethod, Sale},
    },
    services::analytics_service::parse_day,
};

// =============================================================================
//  PAYLOADS
// =============================================================================

// `Serialize` lets the cart's length rule report the offending value.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemPayload {
    pub product_id: Uuid,

    #[validate(length(min = 1, message = "Product name is required."))]
    #[schema(example = "Iced Latte")]
    pub product_name: String,

    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    #[schema(example = 2)]
    pub quantity: i32,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = 65.0)]
    pub price: Decimal,

    // Optional line total; quantity * price when absent.
    pub total: Option<Decimal>,
}

// Client-side subtotal/tax/total are ignored: the server recomputes them.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    #[validate(length(min = 1, message = "The cart is empty."))]
    #[validate(nested)]
    pub items: Vec<SaleItemPayload>,

    #[schema(example = "cash")]
    pub payment_method: PaymentMethod,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub discount: Decimal,

    #[validate(length(min = 1, message = "Cashier is required."))]
    #[schema(example = "cashier-01")]
    pub cashier_id: String,

    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
}

impl From<CreateSalePayload> for NewSale {
    fn from(p: CreateSalePayload) -> Self {
        NewSale {
            items: p
                .items
                .into_iter()
                .map(|item| NewSaleItem {
                    product_id: item.product_id,
                    product_name: item.product_name,
                    quantity: item.quantity,
                    price: item.price,
                    total: item.total,
                })
                .collect(),
            payment_method: p.payment_method,
            discount: p.discount,
            cashier_id: p.cashier_id,
            customer_id: p.customer_id,
            customer_name: p.customer_name,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    /// First day, `YYYY-MM-DD`
    pub from: Option<String>,
    /// Last day (inclusive), `YYYY-MM-DD`
    pub to: Option<String>,
}

// =============================================================================
//  HANDLERS
// =============================================================================

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    responses(
        (status = 200, description = "All sales, newest first", body = Vec<Sale>)
    )
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sale_service.list_sales().await?;
    Ok((StatusCode::OK, Json(sales)))
}

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Sales",
    request_body = CreateSalePayload,
    responses(
        (status = 201, description = "Sale recorded, stock decremented", body = Sale),
        (status = 400, description = "Invalid data")
    )
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CreateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let sale = app_state.sale_service.create_sale(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

// GET /api/sales/{id}
#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Sales",
    responses(
        (status = 200, description = "The sale", body = Sale),
        (status = 404, description = "Sale not found")
    ),
    params(
        ("id" = Uuid, Path, description = "Sale id")
    )
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sale_service.get_sale(id).await?;
    Ok((StatusCode::OK, Json(sale)))
}

// DELETE /api/sales/{id}
#[utoipa::path(
    delete,
    path = "/api/sales/{id}",
    tag = "Sales",
    responses(
        (status = 200, description = "Sale cancelled, stock restored", body = ActionResponse),
        (status = 404, description = "Sale not found"),
        (status = 500, description = "Sale could not be deleted")
    ),
    params(
        ("id" = Uuid, Path, description = "Sale id")
    )
)]
pub async fn cancel_sale(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.sale_service.cancel_sale(id).await?;
    Ok((StatusCode::OK, Json(ActionResponse::ok("Sale cancelled and stock restored"))))
}

// GET /api/sales/analytics?from=YYYY-MM-DD&to=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/api/sales/analytics",
    tag = "Sales",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Analytics for the date range", body = SalesAnalytics),
        (status = 400, description = "Missing or malformed date range")
    )
)]
pub async fn get_analytics(
    State(app_state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(from), Some(to)) = (
        query.from.filter(|s| !s.trim().is_empty()),
        query.to.filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(AppError::MissingDateRange);
    };

    let analytics = app_state
        .analytics_service
        .compute_analytics(parse_day(&from)?, parse_day(&to)?)
        .await?;

    Ok((StatusCode::OK, Json(analytics)))
}
