// src/services/analytics_service.rs

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::Store,
    models::{
        analytics::{DailySales, PaymentMethodStats, SalesAnalytics, TopProduct},
        sale::{PaymentMethod, Sale},
    },
};

const TOP_PRODUCTS_LIMIT: usize = 10;

#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn Store>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Analytics over every sale from local midnight of `from` through
    /// local 23:59:59.999 of `to`, both days included.
    pub async fn compute_analytics(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<SalesAnalytics, AppError> {
        let (start, end) = day_range(from, to);

        let sales = self.store.find_sales_between(start, end).await?;
        tracing::debug!("Analytics {} .. {}: {} sale(s) matched", start, end, sales.len());

        Ok(summarize(&sales))
    }
}

/// Parses a `YYYY-MM-DD` query value.
pub fn parse_day(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| AppError::InvalidDate(raw.to_string()))
}

/// Inclusive UTC bounds covering the local calendar days `from..=to`.
pub fn day_range(from: NaiveDate, to: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = from.and_time(NaiveTime::MIN);
    let end = to.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN));
    (local_to_utc(start, true), local_to_utc(end, false))
}

/// Local wall-clock time to UTC. In a DST gap the wall time does not exist
/// and is read as UTC; in an overlap the earliest (start) or latest (end)
/// instant is chosen so the range never shrinks.
pub(crate) fn local_to_utc(naive: NaiveDateTime, earliest: bool) -> DateTime<Utc> {
    let resolved = Local.from_local_datetime(&naive);
    let local = if earliest { resolved.earliest() } else { resolved.latest() };
    local
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

#[derive(Default)]
struct ProductAcc {
    quantity: i64,
    revenue: Decimal,
}

#[derive(Default)]
struct BucketAcc {
    count: u64,
    revenue: Decimal,
}

/// One fold over `sales` into the four aggregates.
pub fn summarize(sales: &[Sale]) -> SalesAnalytics {
    let mut total_revenue = Decimal::ZERO;
    let mut by_product: IndexMap<&str, ProductAcc> = IndexMap::new();
    let mut by_method: IndexMap<PaymentMethod, BucketAcc> = IndexMap::new();
    let mut by_day: BTreeMap<String, BucketAcc> = BTreeMap::new();

    for sale in sales {
        total_revenue += sale.total;

        for item in &sale.items {
            let acc = by_product.entry(item.product_name.as_str()).or_default();
            acc.quantity += i64::from(item.quantity);
            acc.revenue += item.total;
        }

        let method = by_method.entry(sale.payment_method).or_default();
        method.count += 1;
        method.revenue += sale.total;

        let date = sale.created_at.with_timezone(&Local).format("%Y-%m-%d").to_string();
        let day = by_day.entry(date).or_default();
        day.count += 1;
        day.revenue += sale.total;
    }

    let total_transactions = sales.len() as u64;
    let average_transaction = if total_transactions == 0 {
        Decimal::ZERO
    } else {
        total_revenue / Decimal::from(total_transactions)
    };

    let mut top_products: Vec<TopProduct> = by_product
        .into_iter()
        .map(|(name, acc)| TopProduct {
            product_name: name.to_string(),
            quantity: acc.quantity,
            revenue: acc.revenue,
        })
        .collect();
    // Stable sort: equal revenue keeps first-seen order.
    top_products.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    top_products.truncate(TOP_PRODUCTS_LIMIT);

    let payment_methods = by_method
        .into_iter()
        .map(|(method, acc)| PaymentMethodStats {
            method,
            count: acc.count,
            revenue: acc.revenue,
        })
        .collect();

    let daily_sales = by_day
        .into_iter()
        .map(|(date, acc)| DailySales {
            date,
            revenue: acc.revenue,
            transactions: acc.count,
        })
        .collect();

    SalesAnalytics {
        total_revenue,
        total_transactions,
        average_transaction,
        top_products,
        daily_sales,
        payment_methods,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::sale::SaleItem;
    use uuid::Uuid;

    fn at_local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn sale(total: i64, method: PaymentMethod, created_at: DateTime<Utc>, items: &[(&str, i32, i64)]) -> Sale {
        Sale {
            id: Uuid::new_v4(),
            items: items
                .iter()
                .map(|(name, quantity, line_total)| SaleItem {
                    product_id: Uuid::new_v4(),
                    product_name: name.to_string(),
                    quantity: *quantity,
                    price: Decimal::new(*line_total, 0) / Decimal::from(*quantity),
                    total: Decimal::new(*line_total, 0),
                })
                .collect(),
            subtotal: Decimal::new(total, 0),
            tax: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: Decimal::new(total, 0),
            payment_method: method,
            customer_id: None,
            customer_name: None,
            cashier_id: "cashier-01".into(),
            created_at,
        }
    }

    async fn service_with(sales: Vec<Sale>) -> AnalyticsService {
        let store = Arc::new(MemoryStore::new());
        for s in &sales {
            store.record_sale(s).await.unwrap();
        }
        AnalyticsService::new(store)
    }

    fn day(raw: &str) -> NaiveDate {
        parse_day(raw).unwrap()
    }

    #[tokio::test]
    async fn two_sales_on_one_day() {
        let service = service_with(vec![
            sale(100, PaymentMethod::Cash, at_local(2024, 1, 10, 9), &[("Latte", 1, 100)]),
            sale(150, PaymentMethod::Card, at_local(2024, 1, 10, 15), &[("Mocha", 2, 150)]),
        ])
        .await;

        let analytics = service
            .compute_analytics(day("2024-01-10"), day("2024-01-10"))
            .await
            .unwrap();

        assert_eq!(analytics.total_revenue, Decimal::new(250, 0));
        assert_eq!(analytics.total_transactions, 2);
        assert_eq!(analytics.average_transaction, Decimal::new(125, 0));
        assert_eq!(
            analytics.payment_methods,
            vec![
                PaymentMethodStats { method: PaymentMethod::Cash, count: 1, revenue: Decimal::new(100, 0) },
                PaymentMethodStats { method: PaymentMethod::Card, count: 1, revenue: Decimal::new(150, 0) },
            ]
        );
        assert_eq!(
            analytics.daily_sales,
            vec![DailySales {
                date: "2024-01-10".into(),
                revenue: Decimal::new(250, 0),
                transactions: 2,
            }]
        );
    }

    #[tokio::test]
    async fn range_covers_whole_days_on_both_ends() {
        let service = service_with(vec![
            sale(10, PaymentMethod::Cash, at_local(2024, 1, 9, 23), &[("A", 1, 10)]),
            sale(20, PaymentMethod::Cash, at_local(2024, 1, 10, 0), &[("A", 1, 20)]),
            sale(30, PaymentMethod::Cash, at_local(2024, 1, 11, 23), &[("A", 1, 30)]),
            sale(40, PaymentMethod::Cash, at_local(2024, 1, 12, 0), &[("A", 1, 40)]),
        ])
        .await;

        let analytics = service
            .compute_analytics(day("2024-01-10"), day("2024-01-11"))
            .await
            .unwrap();

        assert_eq!(analytics.total_transactions, 2);
        assert_eq!(analytics.total_revenue, Decimal::new(50, 0));
        let dates: Vec<_> = analytics.daily_sales.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-10", "2024-01-11"]);
    }

    #[tokio::test]
    async fn empty_range_averages_to_zero() {
        let service = service_with(vec![]).await;
        let analytics = service
            .compute_analytics(day("2024-02-01"), day("2024-02-29"))
            .await
            .unwrap();

        assert_eq!(analytics.total_transactions, 0);
        assert_eq!(analytics.average_transaction, Decimal::ZERO);
        assert!(analytics.top_products.is_empty());
        assert!(analytics.daily_sales.is_empty());
        assert!(analytics.payment_methods.is_empty());
    }

    #[test]
    fn top_products_merge_by_name_and_keep_ten_best() {
        let when = at_local(2024, 3, 1, 12);
        let mut sales: Vec<Sale> = (1..=12)
            .map(|n| {
                let name = format!("Item {n:02}");
                sale(n, PaymentMethod::Transfer, when, &[(name.as_str(), 1, n)])
            })
            .collect();
        // Same name, different product id: merged into one entry.
        sales.push(sale(5, PaymentMethod::Cash, when, &[("Item 01", 2, 5)]));

        let analytics = summarize(&sales);

        assert_eq!(analytics.top_products.len(), 10);
        assert!(analytics
            .top_products
            .windows(2)
            .all(|w| w[0].revenue >= w[1].revenue));
        assert_eq!(analytics.top_products[0].product_name, "Item 12");
        // Item 01: 1 + 5 = 6 revenue over 3 units; seen first, so it ranks ahead of Item 06.
        let merged = analytics
            .top_products
            .iter()
            .find(|p| p.product_name == "Item 01")
            .unwrap();
        assert_eq!(merged.quantity, 3);
        assert_eq!(merged.revenue, Decimal::new(6, 0));
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let when = at_local(2024, 3, 1, 12);
        let sales = vec![
            sale(10, PaymentMethod::Cash, when, &[("Banana", 1, 10)]),
            sale(10, PaymentMethod::Cash, when, &[("Apple", 1, 10)]),
        ];

        let names: Vec<_> = summarize(&sales)
            .top_products
            .into_iter()
            .map(|p| p.product_name)
            .collect();
        assert_eq!(names, ["Banana", "Apple"]);
    }

    #[test]
    fn parse_day_rejects_garbage() {
        assert!(matches!(parse_day("10/01/2024"), Err(AppError::InvalidDate(_))));
        assert_eq!(parse_day("2024-01-10").unwrap(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }
}
