// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// Cards at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub today_sales: Decimal,
    pub total_sales: Decimal,
    pub total_products: i64,
    pub low_stock_products: i64,
    pub total_customers: i64,
}
