// src/models/analytics.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::sale::PaymentMethod;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesAnalytics {
    pub total_revenue: Decimal,
    pub total_transactions: u64,
    pub average_transaction: Decimal,
    pub top_products: Vec<TopProduct>,
    pub daily_sales: Vec<DailySales>,
    pub payment_methods: Vec<PaymentMethodStats>,
}

// Keyed by product name, not id: two products sharing a name are merged.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_name: String,
    pub quantity: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    #[schema(example = "2024-01-10")]
    pub date: String,
    pub revenue: Decimal,
    pub transactions: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodStats {
    pub method: PaymentMethod,
    pub count: u64,
    pub revenue: Decimal,
}
