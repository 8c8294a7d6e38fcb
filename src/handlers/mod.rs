pub mod customers;
pub mod dashboard;
pub mod one_touch;
pub mod products;
pub mod sales;
pub mod validation;
