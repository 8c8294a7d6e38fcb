// src/models/one_touch.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// A top-level button on the quick-sale screen, with its second-level items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OneTouchMenu {
    pub id: Uuid,
    #[schema(example = 1)]
    pub seq_code: i32,
    #[schema(example = "Coffee")]
    pub description: String,
    pub image: Option<String>,
    #[sqlx(json)]
    pub level2: Vec<OneTouchItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OneTouchItem {
    pub id: i32,
    pub description: String,
    pub product_name: String,
    pub price: Decimal,
    pub cost: Decimal,
    pub qty: i32,
    pub category: String,
    pub image: Option<String>,
    #[serde(default)]
    pub addons: Vec<OneTouchAddon>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OneTouchAddon {
    pub name: String,
    pub price: Decimal,
    pub qty: i32,
}
