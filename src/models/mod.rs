pub mod analytics;
pub mod customer;
pub mod dashboard;
pub mod one_touch;
pub mod product;
pub mod response;
pub mod sale;
