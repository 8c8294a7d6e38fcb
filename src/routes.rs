// src/routes.rs

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

/// The full application router, state applied.
pub fn app_router(app_state: AppState) -> Router {
    let product_routes = Router::new()
        .route("/"
               ,get(handlers::products::list_products)
               .post(handlers::products::create_product)
        )
        .route("/{id}"
               ,put(handlers::products::update_product)
               .delete(handlers::products::delete_product)
        );

    let customer_routes = Router::new()
        .route("/"
               ,get(handlers::customers::list_customers)
               .post(handlers::customers::create_customer)
        )
        .route("/{id}"
               ,put(handlers::customers::update_customer)
               .delete(handlers::customers::delete_customer)
        );

    let sale_routes = Router::new()
        .route("/"
               ,get(handlers::sales::list_sales)
               .post(handlers::sales::create_sale)
        )
        // Static segment wins over "/{id}" in the matcher.
        .route("/analytics", get(handlers::sales::get_analytics))
        .route("/{id}"
               ,get(handlers::sales::get_sale)
               .delete(handlers::sales::cancel_sale)
        );

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/dashboard/status", get(handlers::dashboard::get_status))
        .route("/api/one-touch", get(handlers::one_touch::list_one_touch))
        .nest("/api/products", product_routes)
        .nest("/api/customers", customer_routes)
        .nest("/api/sales", sale_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
