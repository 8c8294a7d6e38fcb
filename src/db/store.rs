// src/db/store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        customer::{Customer, CustomerChanges},
        one_touch::OneTouchMenu,
        product::{Product, ProductChanges},
        sale::Sale,
    },
};

/// Persistence boundary for the four collections (`products`, `customers`,
/// `sales`, `one-touch`).
///
/// Services receive an `Arc<dyn Store>` at construction time; the handle is
/// opened once at startup and closed on shutdown.
#[async_trait]
pub trait Store: Send + Sync {
    // ---
    // Products
    // ---

    /// All products in creation order.
    async fn list_products(&self) -> Result<Vec<Product>, AppError>;

    async fn insert_product(&self, product: &Product) -> Result<Product, AppError>;

    /// Applies `changes` and stamps `updated_at`. `None` when no product has `id`.
    async fn update_product(
        &self,
        id: Uuid,
        changes: &ProductChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Product>, AppError>;

    /// Number of products removed (0 or 1).
    async fn delete_product(&self, id: Uuid) -> Result<u64, AppError>;

    async fn count_products(&self) -> Result<i64, AppError>;

    async fn count_products_with_stock_at_most(&self, threshold: i32) -> Result<i64, AppError>;

    // ---
    // Customers
    // ---

    async fn list_customers(&self) -> Result<Vec<Customer>, AppError>;

    async fn insert_customer(&self, customer: &Customer) -> Result<Customer, AppError>;

    async fn update_customer(
        &self,
        id: Uuid,
        changes: &CustomerChanges,
    ) -> Result<Option<Customer>, AppError>;

    async fn delete_customer(&self, id: Uuid) -> Result<u64, AppError>;

    async fn count_customers(&self) -> Result<i64, AppError>;

    // ---
    // Sales
    // ---

    /// Newest first. Sales sharing a timestamp keep insertion order.
    async fn list_sales(&self) -> Result<Vec<Sale>, AppError>;

    async fn find_sale(&self, id: Uuid) -> Result<Option<Sale>, AppError>;

    /// Sales with `from <= created_at <= to`, oldest first.
    async fn find_sales_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Sale>, AppError>;

    /// Sum of `total` over sales with `since <= created_at < until`.
    /// Missing bounds are open.
    async fn sum_sales_total(
        &self,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Decimal, AppError>;

    /// Decrements the stock of every item's product, in item order, then
    /// inserts the sale. Both happen as one unit. Items pointing at unknown
    /// products are skipped.
    async fn record_sale(&self, sale: &Sale) -> Result<Sale, AppError>;

    /// Restores the stock taken by `sale` and deletes it, as one unit.
    /// Returns the number of sale records removed; on 0 nothing is applied.
    async fn cancel_sale(&self, sale: &Sale) -> Result<u64, AppError>;

    // ---
    // One-touch menu
    // ---

    /// Ordered by `seq_code`.
    async fn list_one_touch(&self) -> Result<Vec<OneTouchMenu>, AppError>;

    // ---
    // Lifecycle
    // ---

    async fn close(&self);
}
