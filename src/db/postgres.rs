// src/db/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::Config,
    db::Store,
    models::{
        customer::{Customer, CustomerChanges},
        one_touch::OneTouchMenu,
        product::{Product, ProductChanges},
        sale::Sale,
    },
};

/// PostgreSQL-backed store. Each collection is a table; embedded documents
/// (sale items, one-touch level-2 entries) are JSONB columns.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects the pool and brings the schema up to date.
    pub async fn open(config: &Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await?;

        tracing::info!("Database connection established");

        sqlx::migrate!().run(&pool).await?;

        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `numeric_value_out_of_range` on a stock update becomes `StockOutOfRange`;
/// the surrounding transaction is dropped, so nothing is applied.
fn stock_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("22003") => AppError::StockOutOfRange,
        _ => AppError::DatabaseError(err),
    }
}

#[async_trait]
impl Store for PgStore {
    // ---
    // Products
    // ---

    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products ORDER BY created_at ASC",
        )
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn insert_product(&self, product: &Product) -> Result<Product, AppError> {
        let saved = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products
                (id, name, price, cost, stock, category, barcode, description, image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
            .bind(product.id)
            .bind(&product.name)
            .bind(product.price)
            .bind(product.cost)
            .bind(product.stock)
            .bind(&product.category)
            .bind(&product.barcode)
            .bind(&product.description)
            .bind(&product.image)
            .bind(product.created_at)
            .bind(product.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(saved)
    }

    async fn update_product(
        &self,
        id: Uuid,
        changes: &ProductChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Product>, AppError> {
        // COALESCE keeps the stored value for every field left out of the request.
        let updated = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name        = COALESCE($2, name),
                price       = COALESCE($3, price),
                cost        = COALESCE($4, cost),
                stock       = COALESCE($5, stock),
                category    = COALESCE($6, category),
                barcode     = COALESCE($7, barcode),
                description = COALESCE($8, description),
                image       = COALESCE($9, image),
                updated_at  = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(&changes.name)
            .bind(changes.price)
            .bind(changes.cost)
            .bind(changes.stock)
            .bind(&changes.category)
            .bind(&changes.barcode)
            .bind(&changes.description)
            .bind(&changes.image)
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_product(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count_products(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_products_with_stock_at_most(&self, threshold: i32) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE stock <= $1")
            .bind(threshold)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // ---
    // Customers
    // ---

    async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers ORDER BY created_at ASC",
        )
            .fetch_all(&self.pool)
            .await?;
        Ok(customers)
    }

    async fn insert_customer(&self, customer: &Customer) -> Result<Customer, AppError> {
        let saved = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (id, name, email, phone, address, total_purchases, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(customer.id)
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(&customer.phone)
            .bind(&customer.address)
            .bind(customer.total_purchases)
            .bind(customer.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(saved)
    }

    async fn update_customer(
        &self,
        id: Uuid,
        changes: &CustomerChanges,
    ) -> Result<Option<Customer>, AppError> {
        let updated = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers SET
                name    = COALESCE($2, name),
                email   = COALESCE($3, email),
                phone   = COALESCE($4, phone),
                address = COALESCE($5, address)
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.email)
            .bind(&changes.phone)
            .bind(&changes.address)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_customer(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count_customers(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // ---
    // Sales
    // ---

    async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales ORDER BY created_at DESC, seq ASC",
        )
            .fetch_all(&self.pool)
            .await?;
        Ok(sales)
    }

    async fn find_sale(&self, id: Uuid) -> Result<Option<Sale>, AppError> {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(sale)
    }

    async fn find_sales_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT * FROM sales
            WHERE created_at >= $1 AND created_at <= $2
            ORDER BY created_at ASC, seq ASC
            "#,
        )
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;
        Ok(sales)
    }

    async fn sum_sales_total(
        &self,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total), 0)
            FROM sales
            WHERE ($1::timestamptz IS NULL OR created_at >= $1)
              AND ($2::timestamptz IS NULL OR created_at < $2)
            "#,
        )
            .bind(since)
            .bind(until)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn record_sale(&self, sale: &Sale) -> Result<Sale, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Stock out, one item at a time. No sufficiency check.
        for item in &sale.items {
            let result = sqlx::query("UPDATE products SET stock = stock - $1 WHERE id = $2")
                .bind(item.quantity)
                .bind(item.product_id)
                .execute(&mut *tx)
                .await
                .map_err(stock_error)?;

            if result.rows_affected() == 0 {
                tracing::warn!(
                    "Sale {} references unknown product {} ({}); stock not adjusted",
                    sale.id, item.product_id, item.product_name
                );
            }
        }

        // 2. The sale record itself
        let saved = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales
                (id, items, subtotal, tax, discount, total, payment_method,
                 customer_id, customer_name, cashier_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
            .bind(sale.id)
            .bind(Json(&sale.items))
            .bind(sale.subtotal)
            .bind(sale.tax)
            .bind(sale.discount)
            .bind(sale.total)
            .bind(sale.payment_method)
            .bind(sale.customer_id)
            .bind(&sale.customer_name)
            .bind(&sale.cashier_id)
            .bind(sale.created_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(saved)
    }

    async fn cancel_sale(&self, sale: &Sale) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Give the stock back
        for item in &sale.items {
            sqlx::query("UPDATE products SET stock = stock + $1 WHERE id = $2")
                .bind(item.quantity)
                .bind(item.product_id)
                .execute(&mut *tx)
                .await
                .map_err(stock_error)?;
        }

        // 2. Remove the record
        let deleted = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(sale.id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(0);
        }

        tx.commit().await?;
        Ok(deleted)
    }

    // ---
    // One-touch menu
    // ---

    async fn list_one_touch(&self) -> Result<Vec<OneTouchMenu>, AppError> {
        let menus = sqlx::query_as::<_, OneTouchMenu>(
            "SELECT * FROM one_touch ORDER BY seq_code ASC",
        )
            .fetch_all(&self.pool)
            .await?;
        Ok(menus)
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
