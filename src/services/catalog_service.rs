// src/services/catalog_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Store,
    models::{
        customer::{Customer, CustomerChanges, NewCustomer},
        one_touch::OneTouchMenu,
        product::{NewProduct, Product, ProductChanges},
    },
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // =========================================================================
    //  1. PRODUCTS
    // =========================================================================

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.store.list_products().await
    }

    pub async fn create_product(&self, input: NewProduct) -> Result<Product, AppError> {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: input.name,
            price: input.price,
            cost: input.cost,
            stock: input.stock,
            category: input.category,
            barcode: input.barcode,
            description: input.description,
            image: input.image,
            created_at: now,
            updated_at: now,
        };

        let saved = self.store.insert_product(&product).await?;
        tracing::info!("Product {} created ({})", saved.id, saved.name);
        Ok(saved)
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> Result<Product, AppError> {
        self.store
            .update_product(id, &changes, Utc::now())
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        match self.store.delete_product(id).await? {
            0 => Err(AppError::ProductNotFound),
            _ => {
                tracing::info!("Product {} deleted", id);
                Ok(())
            }
        }
    }

    // =========================================================================
    //  2. CUSTOMERS
    // =========================================================================

    pub async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        self.store.list_customers().await
    }

    pub async fn create_customer(&self, input: NewCustomer) -> Result<Customer, AppError> {
        let customer = Customer {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            total_purchases: Decimal::ZERO,
            created_at: Utc::now(),
        };

        self.store.insert_customer(&customer).await
    }

    pub async fn update_customer(
        &self,
        id: Uuid,
        changes: CustomerChanges,
    ) -> Result<Customer, AppError> {
        self.store
            .update_customer(id, &changes)
            .await?
            .ok_or(AppError::CustomerNotFound)
    }

    pub async fn delete_customer(&self, id: Uuid) -> Result<(), AppError> {
        match self.store.delete_customer(id).await? {
            0 => Err(AppError::CustomerNotFound),
            _ => Ok(()),
        }
    }

    // =========================================================================
    //  3. ONE-TOUCH MENU
    // =========================================================================

    pub async fn list_one_touch(&self) -> Result<Vec<OneTouchMenu>, AppError> {
        self.store.list_one_touch().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::one_touch::OneTouchItem;

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(MemoryStore::new()))
    }

    fn latte() -> NewProduct {
        NewProduct {
            name: "Iced Latte".into(),
            price: Decimal::new(6500, 2),
            cost: Decimal::new(2850, 2),
            stock: 40,
            category: "Beverages".into(),
            barcode: None,
            description: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn create_product_stamps_id_and_timestamps() {
        let service = service();
        let product = service.create_product(latte()).await.unwrap();

        assert_eq!(product.name, "Iced Latte");
        assert_eq!(product.created_at, product.updated_at);
        assert_eq!(service.list_products().await.unwrap(), vec![product]);
    }

    #[tokio::test]
    async fn update_product_changes_only_given_fields() {
        let service = service();
        let product = service.create_product(latte()).await.unwrap();

        let changes = ProductChanges {
            price: Some(Decimal::new(7000, 2)),
            ..Default::default()
        };
        let updated = service.update_product(product.id, changes).await.unwrap();

        assert_eq!(updated.price, Decimal::new(7000, 2));
        assert_eq!(updated.name, product.name);
        assert_eq!(updated.stock, 40);
        assert!(updated.updated_at >= product.updated_at);
    }

    #[tokio::test]
    async fn update_unknown_product_is_not_found() {
        let result = service()
            .update_product(Uuid::new_v4(), ProductChanges::default())
            .await;
        assert!(matches!(result, Err(AppError::ProductNotFound)));
    }

    #[tokio::test]
    async fn delete_product_twice_reports_not_found() {
        let service = service();
        let product = service.create_product(latte()).await.unwrap();

        service.delete_product(product.id).await.unwrap();
        assert!(matches!(
            service.delete_product(product.id).await,
            Err(AppError::ProductNotFound)
        ));
        assert!(service.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_customers_start_with_zero_purchases() {
        let service = service();
        let customer = service
            .create_customer(NewCustomer {
                name: "Somchai".into(),
                email: Some("somchai@example.com".into()),
                phone: None,
                address: None,
            })
            .await
            .unwrap();

        assert_eq!(customer.total_purchases, Decimal::ZERO);

        let renamed = service
            .update_customer(customer.id, CustomerChanges {
                name: Some("Somchai J.".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(renamed.name, "Somchai J.");
        assert_eq!(renamed.email.as_deref(), Some("somchai@example.com"));

        service.delete_customer(customer.id).await.unwrap();
        assert!(matches!(
            service.update_customer(customer.id, CustomerChanges::default()).await,
            Err(AppError::CustomerNotFound)
        ));
    }

    #[tokio::test]
    async fn one_touch_menu_is_ordered_by_seq_code() {
        let menu = |seq_code: i32, description: &str| OneTouchMenu {
            id: Uuid::new_v4(),
            seq_code,
            description: description.into(),
            image: None,
            level2: vec![OneTouchItem {
                id: 1,
                description: "Hot".into(),
                product_name: format!("{description} hot"),
                price: Decimal::new(50, 0),
                cost: Decimal::new(20, 0),
                qty: 1,
                category: description.into(),
                image: None,
                addons: vec![],
            }],
        };
        let store = MemoryStore::new().with_one_touch(vec![menu(2, "Tea"), menu(1, "Coffee")]);
        let service = CatalogService::new(Arc::new(store));

        let menus = service.list_one_touch().await.unwrap();
        let order: Vec<_> = menus.iter().map(|m| m.description.as_str()).collect();
        assert_eq!(order, ["Coffee", "Tea"]);
    }
}
