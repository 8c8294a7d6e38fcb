// src/services/sale_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Store,
    models::sale::{NewSale, Sale, SaleItem},
};

/// VAT applied to every sale: 7%.
pub const TAX_RATE: Decimal = Decimal::from_parts(7, 0, 0, false, 2);

#[derive(Clone)]
pub struct SaleService {
    store: Arc<dyn Store>,
}

impl SaleService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// `subtotal = Σ item.total`, `tax = subtotal * 7%`, `total = subtotal + tax - discount`.
    ///
    /// Amounts beyond what a `Decimal` holds are rejected with `AmountOutOfRange`.
    fn build_sale(input: NewSale, created_at: DateTime<Utc>) -> Result<Sale, AppError> {
        let items = input
            .items
            .into_iter()
            .map(|item| {
                let total = match item.total {
                    Some(total) => total,
                    None => item
                        .price
                        .checked_mul(Decimal::from(item.quantity))
                        .ok_or(AppError::AmountOutOfRange)?,
                };
                Ok(SaleItem {
                    total,
                    product_id: item.product_id,
                    product_name: item.product_name,
                    quantity: item.quantity,
                    price: item.price,
                })
            })
            .collect::<Result<Vec<SaleItem>, AppError>>()?;

        let subtotal = items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.total))
            .ok_or(AppError::AmountOutOfRange)?;
        let tax = subtotal.checked_mul(TAX_RATE).ok_or(AppError::AmountOutOfRange)?;
        let total = subtotal
            .checked_add(tax)
            .and_then(|gross| gross.checked_sub(input.discount))
            .ok_or(AppError::AmountOutOfRange)?;

        Ok(Sale {
            id: Uuid::new_v4(),
            items,
            subtotal,
            tax,
            discount: input.discount,
            total,
            payment_method: input.payment_method,
            customer_id: input.customer_id,
            customer_name: input.customer_name,
            cashier_id: input.cashier_id,
            created_at,
        })
    }

    // --- CREATE SALE ---
    pub async fn create_sale(&self, input: NewSale) -> Result<Sale, AppError> {
        self.create_sale_at(input, Utc::now()).await
    }

    /// Records a sale with an explicit timestamp (back-dated imports, tests).
    pub async fn create_sale_at(
        &self,
        input: NewSale,
        created_at: DateTime<Utc>,
    ) -> Result<Sale, AppError> {
        let sale = Self::build_sale(input, created_at)?;
        let saved = self.store.record_sale(&sale).await?;

        tracing::info!(
            "Sale {} recorded: {} item(s), total {} ({:?})",
            saved.id,
            saved.items.len(),
            saved.total,
            saved.payment_method
        );
        Ok(saved)
    }

    // --- CANCEL SALE ---
    pub async fn cancel_sale(&self, id: Uuid) -> Result<(), AppError> {
        let sale = self.store.find_sale(id).await?.ok_or(AppError::SaleNotFound)?;

        match self.store.cancel_sale(&sale).await? {
            0 => {
                tracing::error!("Sale {} disappeared before it could be deleted", id);
                Err(AppError::SaleDeleteFailed)
            }
            _ => {
                tracing::info!("Sale {} cancelled; stock restored for {} item(s)", id, sale.items.len());
                Ok(())
            }
        }
    }

    pub async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        self.store.list_sales().await
    }

    pub async fn get_sale(&self, id: Uuid) -> Result<Sale, AppError> {
        self.store.find_sale(id).await?.ok_or(AppError::SaleNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::product::Product;
    use crate::models::sale::{NewSaleItem, PaymentMethod};
    use chrono::{Duration, TimeZone};

    async fn store_with_product(stock: i32) -> (Arc<MemoryStore>, Product) {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: "Green Tea".into(),
            price: Decimal::new(40, 0),
            cost: Decimal::new(15, 0),
            stock,
            category: "Beverages".into(),
            barcode: None,
            description: None,
            image: None,
            created_at: now,
            updated_at: now,
        };
        store.insert_product(&product).await.unwrap();
        (store, product)
    }

    fn sale_of(product: &Product, quantity: i32) -> NewSale {
        NewSale {
            items: vec![NewSaleItem {
                product_id: product.id,
                product_name: product.name.clone(),
                quantity,
                price: product.price,
                total: None,
            }],
            payment_method: PaymentMethod::Cash,
            discount: Decimal::ZERO,
            cashier_id: "cashier-01".into(),
            customer_id: None,
            customer_name: None,
        }
    }

    async fn stock_of(store: &MemoryStore, id: Uuid) -> i32 {
        store
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.id == id)
            .map(|p| p.stock)
            .unwrap()
    }

    #[tokio::test]
    async fn totals_follow_subtotal_tax_and_discount() {
        let (store, product) = store_with_product(100).await;
        let service = SaleService::new(store);

        let mut input = sale_of(&product, 2);
        input.items.push(NewSaleItem {
            product_id: Uuid::new_v4(),
            product_name: "Croissant".into(),
            quantity: 1,
            price: Decimal::new(90, 0),
            total: Some(Decimal::new(90, 0)),
        });
        input.discount = Decimal::new(10, 0);

        let sale = service.create_sale(input).await.unwrap();

        let items_total: Decimal = sale.items.iter().map(|i| i.total).sum();
        assert_eq!(sale.subtotal, items_total);
        assert_eq!(sale.subtotal, Decimal::new(170, 0));
        assert_eq!(sale.tax, Decimal::new(1190, 2));
        assert_eq!(sale.total, sale.subtotal + sale.tax - sale.discount);
        assert_eq!(sale.total, Decimal::new(17190, 2));
    }

    #[tokio::test]
    async fn sale_then_cancel_restores_stock() {
        let (store, product) = store_with_product(5).await;
        let service = SaleService::new(store.clone());

        let sale = service.create_sale(sale_of(&product, 3)).await.unwrap();
        assert_eq!(stock_of(&store, product.id).await, 2);

        service.cancel_sale(sale.id).await.unwrap();
        assert_eq!(stock_of(&store, product.id).await, 5);
        assert!(matches!(service.get_sale(sale.id).await, Err(AppError::SaleNotFound)));
    }

    #[tokio::test]
    async fn stock_is_allowed_to_go_negative() {
        let (store, product) = store_with_product(1).await;
        let service = SaleService::new(store.clone());

        service.create_sale(sale_of(&product, 4)).await.unwrap();
        assert_eq!(stock_of(&store, product.id).await, -3);
    }

    #[tokio::test]
    async fn unknown_products_are_skipped_but_sale_is_recorded() {
        let (store, product) = store_with_product(10).await;
        let service = SaleService::new(store.clone());

        let mut ghost = product.clone();
        ghost.id = Uuid::new_v4();
        let sale = service.create_sale(sale_of(&ghost, 2)).await.unwrap();

        assert_eq!(stock_of(&store, product.id).await, 10);
        assert_eq!(service.get_sale(sale.id).await.unwrap(), sale);
    }

    #[tokio::test]
    async fn line_total_overflow_is_rejected_before_anything_is_written() {
        let (store, product) = store_with_product(5).await;
        let service = SaleService::new(store.clone());

        let mut input = sale_of(&product, 100);
        input.items[0].price = Decimal::from_i128_with_scale(10_i128.pow(27), 0);

        assert!(matches!(service.create_sale(input).await, Err(AppError::AmountOutOfRange)));
        assert_eq!(stock_of(&store, product.id).await, 5);
        assert!(service.list_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn subtotal_overflow_is_rejected() {
        let (store, product) = store_with_product(5).await;
        let service = SaleService::new(store);

        let mut input = sale_of(&product, 1);
        input.items[0].total = Some(Decimal::MAX);
        input.items.push(input.items[0].clone());

        assert!(matches!(service.create_sale(input).await, Err(AppError::AmountOutOfRange)));
    }

    #[tokio::test]
    async fn stock_overflow_leaves_every_product_untouched() {
        let (store, product) = store_with_product(i32::MIN + 1).await;
        let service = SaleService::new(store.clone());

        // The first line alone fits; the second pushes the same product past i32::MIN.
        let mut input = sale_of(&product, 1);
        input.items.push(input.items[0].clone());

        assert!(matches!(service.create_sale(input).await, Err(AppError::StockOutOfRange)));
        assert_eq!(stock_of(&store, product.id).await, i32::MIN + 1);
        assert!(service.list_sales().await.unwrap().is_empty());

        // The store is still usable afterwards.
        service.create_sale(sale_of(&product, 1)).await.unwrap();
        assert_eq!(stock_of(&store, product.id).await, i32::MIN);
    }

    #[tokio::test]
    async fn cancelling_unknown_sale_is_not_found() {
        let (store, _) = store_with_product(1).await;
        let service = SaleService::new(store);
        assert!(matches!(
            service.cancel_sale(Uuid::new_v4()).await,
            Err(AppError::SaleNotFound)
        ));
    }

    #[tokio::test]
    async fn list_sales_is_newest_first_for_any_insertion_order() {
        let (store, product) = store_with_product(100).await;
        let service = SaleService::new(store);
        let base = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();

        for offset in [3, 0, 5, 1, 4, 2] {
            service
                .create_sale_at(sale_of(&product, 1), base + Duration::minutes(offset))
                .await
                .unwrap();
        }

        let sales = service.list_sales().await.unwrap();
        assert_eq!(sales.len(), 6);
        assert!(sales.windows(2).all(|w| w[0].created_at > w[1].created_at));
    }
}
