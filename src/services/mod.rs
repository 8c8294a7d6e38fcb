pub mod analytics_service;
pub mod catalog_service;
pub mod dashboard_service;
pub mod sale_service;
