// src/db/memory.rs

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Store,
    models::{
        customer::{Customer, CustomerChanges},
        one_touch::OneTouchMenu,
        product::{Product, ProductChanges},
        sale::Sale,
    },
};

#[derive(Default)]
struct Collections {
    products: IndexMap<Uuid, Product>,
    customers: IndexMap<Uuid, Customer>,
    // Insertion order is kept so equal timestamps sort stably.
    sales: Vec<Sale>,
    one_touch: Vec<OneTouchMenu>,
}

/// In-process store for tests and local development.
///
/// Every operation takes the single lock once, so a sale's stock adjustment
/// and its insert (or delete) can never be observed half-applied.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the quick-sale menu. The one-touch collection has no write endpoint.
    pub fn with_one_touch(self, menus: Vec<OneTouchMenu>) -> Self {
        if let Ok(mut state) = self.inner.write() {
            state.one_touch = menus;
        }
        self
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, AppError> {
        self.inner
            .read()
            .map_err(|e| AppError::InternalServerError(anyhow!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, AppError> {
        self.inner
            .write()
            .map_err(|e| AppError::InternalServerError(anyhow!("Failed to acquire write lock: {}", e)))
    }
}

/// Computes every product's new stock level before any is written, so an
/// overflow leaves the collection untouched. Unknown products are skipped.
fn stage_stock(
    products: &IndexMap<Uuid, Product>,
    sale: &Sale,
    adjust: fn(i32, i32) -> Option<i32>,
) -> Result<IndexMap<Uuid, i32>, AppError> {
    let mut staged: IndexMap<Uuid, i32> = IndexMap::new();
    for item in &sale.items {
        let current = match staged.get(&item.product_id) {
            Some(stock) => *stock,
            None => match products.get(&item.product_id) {
                Some(product) => product.stock,
                None => {
                    tracing::warn!(
                        "Sale {} references unknown product {} ({}); stock not adjusted",
                        sale.id, item.product_id, item.product_name
                    );
                    continue;
                }
            },
        };
        let next = adjust(current, item.quantity).ok_or(AppError::StockOutOfRange)?;
        staged.insert(item.product_id, next);
    }
    Ok(staged)
}

fn apply_stock(products: &mut IndexMap<Uuid, Product>, staged: IndexMap<Uuid, i32>) {
    for (id, stock) in staged {
        if let Some(product) = products.get_mut(&id) {
            product.stock = stock;
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    async fn insert_product(&self, product: &Product) -> Result<Product, AppError> {
        self.write()?.products.insert(product.id, product.clone());
        Ok(product.clone())
    }

    async fn update_product(
        &self,
        id: Uuid,
        changes: &ProductChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Product>, AppError> {
        let mut state = self.write()?;
        Ok(state.products.get_mut(&id).map(|product| {
            changes.apply_to(product);
            product.updated_at = updated_at;
            product.clone()
        }))
    }

    async fn delete_product(&self, id: Uuid) -> Result<u64, AppError> {
        Ok(self.write()?.products.shift_remove(&id).map_or(0, |_| 1))
    }

    async fn count_products(&self) -> Result<i64, AppError> {
        Ok(self.read()?.products.len() as i64)
    }

    async fn count_products_with_stock_at_most(&self, threshold: i32) -> Result<i64, AppError> {
        let state = self.read()?;
        Ok(state.products.values().filter(|p| p.stock <= threshold).count() as i64)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        Ok(self.read()?.customers.values().cloned().collect())
    }

    async fn insert_customer(&self, customer: &Customer) -> Result<Customer, AppError> {
        self.write()?.customers.insert(customer.id, customer.clone());
        Ok(customer.clone())
    }

    async fn update_customer(
        &self,
        id: Uuid,
        changes: &CustomerChanges,
    ) -> Result<Option<Customer>, AppError> {
        let mut state = self.write()?;
        Ok(state.customers.get_mut(&id).map(|customer| {
            changes.apply_to(customer);
            customer.clone()
        }))
    }

    async fn delete_customer(&self, id: Uuid) -> Result<u64, AppError> {
        Ok(self.write()?.customers.shift_remove(&id).map_or(0, |_| 1))
    }

    async fn count_customers(&self) -> Result<i64, AppError> {
        Ok(self.read()?.customers.len() as i64)
    }

    async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        let mut sales = self.read()?.sales.clone();
        // sort_by is stable: ties stay in insertion order
        sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sales)
    }

    async fn find_sale(&self, id: Uuid) -> Result<Option<Sale>, AppError> {
        Ok(self.read()?.sales.iter().find(|s| s.id == id).cloned())
    }

    async fn find_sales_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Sale>, AppError> {
        let mut sales: Vec<Sale> = self
            .read()?
            .sales
            .iter()
            .filter(|s| s.created_at >= from && s.created_at <= to)
            .cloned()
            .collect();
        sales.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(sales)
    }

    async fn sum_sales_total(
        &self,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Decimal, AppError> {
        let state = self.read()?;
        Ok(state
            .sales
            .iter()
            .filter(|s| since.is_none_or(|t| s.created_at >= t))
            .filter(|s| until.is_none_or(|t| s.created_at < t))
            .map(|s| s.total)
            .sum())
    }

    async fn record_sale(&self, sale: &Sale) -> Result<Sale, AppError> {
        let mut state = self.write()?;

        let staged = stage_stock(&state.products, sale, i32::checked_sub)?;
        apply_stock(&mut state.products, staged);

        state.sales.push(sale.clone());
        Ok(sale.clone())
    }

    async fn cancel_sale(&self, sale: &Sale) -> Result<u64, AppError> {
        let mut state = self.write()?;

        let Some(position) = state.sales.iter().position(|s| s.id == sale.id) else {
            return Ok(0);
        };

        let staged = stage_stock(&state.products, sale, i32::checked_add)?;
        apply_stock(&mut state.products, staged);

        state.sales.remove(position);
        Ok(1)
    }

    async fn list_one_touch(&self) -> Result<Vec<OneTouchMenu>, AppError> {
        let mut menus = self.read()?.one_touch.clone();
        menus.sort_by_key(|m| m.seq_code);
        Ok(menus)
    }

    async fn close(&self) {}
}
