// src/models/sale.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

// --- Embedded line item ---
// A snapshot: later catalog edits never change a recorded sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: Uuid,
    #[schema(example = "Iced Latte")]
    pub product_name: String,
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(example = 65.0)]
    pub price: Decimal,
    #[schema(example = 130.0)]
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    #[sqlx(json)]
    pub items: Vec<SaleItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    #[schema(example = "cashier-01")]
    pub cashier_id: String,
    pub created_at: DateTime<Utc>,
}

/// Line item as submitted by the register. `total` is optional and
/// defaults to `quantity * price`.
#[derive(Debug, Clone)]
pub struct NewSaleItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub total: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub items: Vec<NewSaleItem>,
    pub payment_method: PaymentMethod,
    pub discount: Decimal,
    pub cashier_id: String,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
}
