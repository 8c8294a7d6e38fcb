// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Stock at or below this counts as "low stock" on the dashboard.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Iced Latte")]
    pub name: String,
    #[schema(example = 65.0)]
    pub price: Decimal,
    #[schema(example = 28.5)]
    pub cost: Decimal,
    // No floor: sales decrement this unconditionally, so it can go negative.
    #[schema(example = 40)]
    pub stock: i32,
    #[schema(example = "Beverages")]
    pub category: String,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub cost: Decimal,
    pub stock: i32,
    pub category: String,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub barcode: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl ProductChanges {
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(cost) = self.cost {
            product.cost = cost;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if self.barcode.is_some() {
            product.barcode = self.barcode.clone();
        }
        if self.description.is_some() {
            product.description = self.description.clone();
        }
        if self.image.is_some() {
            product.image = self.image.clone();
        }
    }
}
