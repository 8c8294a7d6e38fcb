// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "POS Backend", description = "Catalog, customers, sales and analytics for the point-of-sale dashboard"),
    paths(
        // --- Products ---
        handlers::products::list_products,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Customers ---
        handlers::customers::list_customers,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,

        // --- Sales ---
        handlers::sales::list_sales,
        handlers::sales::create_sale,
        handlers::sales::get_sale,
        handlers::sales::cancel_sale,
        handlers::sales::get_analytics,

        // --- Dashboard ---
        handlers::dashboard::get_status,

        // --- One-touch ---
        handlers::one_touch::list_one_touch,
    ),
    components(
        schemas(
            // --- Products ---
            models::product::Product,
            handlers::products::CreateProductPayload,
            handlers::products::UpdateProductPayload,

            // --- Customers ---
            models::customer::Customer,
            handlers::customers::CreateCustomerPayload,
            handlers::customers::UpdateCustomerPayload,

            // --- Sales ---
            models::sale::PaymentMethod,
            models::sale::SaleItem,
            models::sale::Sale,
            handlers::sales::SaleItemPayload,
            handlers::sales::CreateSalePayload,

            // --- Analytics ---
            models::analytics::SalesAnalytics,
            models::analytics::TopProduct,
            models::analytics::DailySales,
            models::analytics::PaymentMethodStats,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,

            // --- One-touch ---
            models::one_touch::OneTouchMenu,
            models::one_touch::OneTouchItem,
            models::one_touch::OneTouchAddon,

            models::response::ActionResponse,
        )
    ),
    tags(
        (name = "Products", description = "Product catalog"),
        (name = "Customers", description = "Customer records"),
        (name = "Sales", description = "Sale recording, cancellation and analytics"),
        (name = "Dashboard", description = "Summary figures"),
        (name = "One-touch", description = "Quick-sale menu")
    )
)]
pub struct ApiDoc;
