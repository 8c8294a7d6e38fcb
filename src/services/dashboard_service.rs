// src/services/dashboard_service.rs

use std::sync::Arc;

use chrono::{Days, Local, NaiveDate, NaiveTime};

use crate::{
    common::error::AppError,
    db::Store,
    models::{dashboard::DashboardSummary, product::LOW_STOCK_THRESHOLD},
    services::analytics_service::local_to_utc,
};

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn Store>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn compute_summary(&self) -> Result<DashboardSummary, AppError> {
        self.compute_summary_for(Local::now().date_naive()).await
    }

    /// Summary with "today" being the local calendar day `today`.
    pub async fn compute_summary_for(&self, today: NaiveDate) -> Result<DashboardSummary, AppError> {
        let start_of_today = local_to_utc(today.and_time(NaiveTime::MIN), true);
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        let start_of_tomorrow = local_to_utc(tomorrow.and_time(NaiveTime::MIN), true);

        // Any failure fails the whole summary; no partial figures.
        let (today_sales, total_sales, total_products, low_stock_products, total_customers) = tokio::try_join!(
            self.store.sum_sales_total(Some(start_of_today), Some(start_of_tomorrow)),
            self.store.sum_sales_total(None, None),
            self.store.count_products(),
            self.store.count_products_with_stock_at_most(LOW_STOCK_THRESHOLD),
            self.store.count_customers(),
        )?;

        Ok(DashboardSummary {
            today_sales,
            total_sales,
            total_products,
            low_stock_products,
            total_customers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{
        customer::Customer,
        product::Product,
        sale::{PaymentMethod, Sale},
    };
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn product(stock: i32) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: format!("Stock {stock}"),
            price: Decimal::new(10, 0),
            cost: Decimal::new(4, 0),
            stock,
            category: "Misc".into(),
            barcode: None,
            description: None,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sale_at(total: i64, y: i32, m: u32, d: u32, h: u32) -> Sale {
        let created_at = Local
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        Sale {
            id: Uuid::new_v4(),
            items: vec![],
            subtotal: Decimal::new(total, 0),
            tax: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: Decimal::new(total, 0),
            payment_method: PaymentMethod::Cash,
            customer_id: None,
            customer_name: None,
            cashier_id: "cashier-01".into(),
            created_at,
        }
    }

    #[tokio::test]
    async fn summary_counts_today_and_all_time() {
        let store = Arc::new(MemoryStore::new());
        for stock in [0, 10, 11, 50] {
            store.insert_product(&product(stock)).await.unwrap();
        }
        store
            .insert_customer(&Customer {
                id: Uuid::new_v4(),
                name: "Walk-in".into(),
                email: None,
                phone: None,
                address: None,
                total_purchases: Decimal::ZERO,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        store.record_sale(&sale_at(100, 2024, 1, 9, 22)).await.unwrap();
        store.record_sale(&sale_at(40, 2024, 1, 10, 0)).await.unwrap();
        store.record_sale(&sale_at(60, 2024, 1, 10, 23)).await.unwrap();
        store.record_sale(&sale_at(5, 2024, 1, 11, 0)).await.unwrap();

        let service = DashboardService::new(store);
        let summary = service
            .compute_summary_for(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
            .await
            .unwrap();

        assert_eq!(
            summary,
            DashboardSummary {
                today_sales: Decimal::new(100, 0),
                total_sales: Decimal::new(205, 0),
                total_products: 4,
                low_stock_products: 2,
                total_customers: 1,
            }
        );
    }

    #[tokio::test]
    async fn empty_store_reports_zeros() {
        let service = DashboardService::new(Arc::new(MemoryStore::new()));
        let summary = service.compute_summary().await.unwrap();

        assert_eq!(summary.today_sales, Decimal::ZERO);
        assert_eq!(summary.total_sales, Decimal::ZERO);
        assert_eq!(summary.total_products, 0);
        assert_eq!(summary.low_stock_products, 0);
        assert_eq!(summary.total_customers, 0);
    }
}
