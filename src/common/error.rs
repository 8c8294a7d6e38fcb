// src/common/error.rs

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Invalid path parameter: {0}")]
    InvalidPath(String),

    #[error("Date range is required")]
    MissingDateRange,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Product not found")]
    ProductNotFound,

    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Sale not found")]
    SaleNotFound,

    #[error("Sale amounts are out of range")]
    AmountOutOfRange,

    #[error("Stock adjustment is out of range")]
    StockOutOfRange,

    // The sale was found but the delete matched nothing (removed concurrently).
    #[error("Failed to delete sale")]
    SaleDeleteFailed,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidBody(ref reason) => {
                tracing::debug!("Rejected request body: {}", reason);
                (StatusCode::BAD_REQUEST, "Invalid request body.")
            }
            AppError::InvalidPath(ref reason) => {
                tracing::debug!("Rejected path parameter: {}", reason);
                (StatusCode::BAD_REQUEST, "Invalid path parameter.")
            }
            AppError::MissingDateRange => (StatusCode::BAD_REQUEST, "Date range is required"),
            AppError::InvalidDate(_) => (StatusCode::BAD_REQUEST, "Dates must use the YYYY-MM-DD format"),
            AppError::ProductNotFound => (StatusCode::NOT_FOUND, "Product not found"),
            AppError::CustomerNotFound => (StatusCode::NOT_FOUND, "Customer not found"),
            AppError::SaleNotFound => (StatusCode::NOT_FOUND, "Sale not found"),
            AppError::AmountOutOfRange => (StatusCode::BAD_REQUEST, "Sale amounts are out of range"),
            AppError::StockOutOfRange => (StatusCode::BAD_REQUEST, "Stock adjustment is out of range"),

            // Everything else is a 500. The detailed message goes to the log only.
            ref e => {
                tracing::error!("Internal server error: {}", e);
                let message = match e {
                    AppError::SaleDeleteFailed => "Failed to delete sale",
                    _ => "An unexpected error occurred.",
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

/// JSON body extractor whose rejection is reported as an `AppError`,
/// so malformed bodies get the same `{ "error": ... }` shape as everything else.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(AppError::InvalidBody(rejection.body_text())),
        }
    }
}

/// Path extractor with the same `{ "error": ... }` rejection as `AppJson`.
pub struct AppPath<T>(pub T);

impl<S, T> FromRequestParts<S> for AppPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(AppPath(value)),
            Err(rejection) => Err(AppError::InvalidPath(rejection.body_text())),
        }
    }
}
